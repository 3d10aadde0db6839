pub mod lookup;
pub mod summary;

use std::{sync::mpsc, thread, time::Instant};

use anyhow::Result;
use zctamap::{
    io::{load_boundaries, load_points},
    BoundaryCollection, Config, HeadlessMap, MapSurface, PointCollection,
};

use crate::cli::SourceArgs;

/// Config file (or defaults) with command-line source overrides applied.
pub fn resolve_config(sources: &SourceArgs) -> Result<Config> {
    let mut config = match &sources.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    if let Some(boundaries) = &sources.boundaries {
        config.boundaries = boundaries.parse()?;
    }
    if let Some(plants) = &sources.plants {
        config.plants = plants.parse()?;
    }
    Ok(config)
}

enum Loaded {
    Boundaries(Result<BoundaryCollection>),
    Plants(Result<PointCollection>),
}

/// Fetch both collections concurrently and hand each to the surface as soon
/// as it arrives, running any search retry that has come due in between.
pub fn load_into(surface: &mut MapSurface<HeadlessMap>) {
    let config = surface.config().clone();

    thread::scope(|s| {
        let (tx, rx) = mpsc::channel();

        let boundaries_tx = tx.clone();
        let (source, keys) = (&config.boundaries, &config.code_keys);
        s.spawn(move || {
            let _ = boundaries_tx.send(Loaded::Boundaries(load_boundaries(source, keys)));
        });

        let plants_tx = tx;
        let source = &config.plants;
        s.spawn(move || {
            let _ = plants_tx.send(Loaded::Plants(load_points(source)));
        });

        for loaded in rx {
            match loaded {
                Loaded::Boundaries(result) => surface.on_boundaries_loaded(result),
                Loaded::Plants(result) => surface.on_points_loaded(result),
            }
            surface.poll(Instant::now());
        }
    });
}

/// Sleep until each scheduled retry is due and run it, until none is left.
pub fn drive_retries(surface: &mut MapSurface<HeadlessMap>) {
    while let Some(due) = surface.next_retry_at() {
        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }
        surface.poll(Instant::now());
    }
}

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use tracing::info;
use zctamap::{index::build_index, HeadlessMap, MapSurface};

use super::{load_into, resolve_config};

pub fn run(args: &crate::cli::SummaryArgs) -> Result<()> {
    let config = resolve_config(&args.sources)?;
    let kind = config.index;

    let mut surface = MapSurface::new(config);
    surface.mount(HeadlessMap::new());
    load_into(&mut surface);

    let (Some(boundaries), Some(points)) = (surface.boundaries().cloned(), surface.points().cloned()) else {
        bail!("boundary or plant data failed to load (run with -v for details)");
    };

    info!("summary: {} ZCTAs, {} plants, {kind:?} index", boundaries.len(), points.len());

    let index = build_index(kind, &points);
    let mut rows = Vec::new();
    for boundary in boundaries.features() {
        let plants = index.points_within(boundary);
        if plants.is_empty() && !args.all {
            continue;
        }
        let mut by_source: BTreeMap<String, usize> = BTreeMap::new();
        for plant in &plants {
            let label = plant.source().map_or_else(|| "Unknown".to_string(), |s| s.label().to_string());
            *by_source.entry(label).or_default() += 1;
        }
        rows.push((boundary.display_code().to_string(), plants.len(), by_source));
    }
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    for (code, count, by_source) in rows {
        let breakdown = by_source.iter()
            .map(|(source, n)| format!("{source}: {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{code}\t{count}\t{breakdown}");
    }

    surface.unmount();
    Ok(())
}

use std::time::Instant;

use anyhow::{bail, Result};
use tracing::info;
use zctamap::{DashboardState, HeadlessMap, MapSurface, SearchStatus, ZipForm};

use super::{drive_retries, load_into, resolve_config};

pub fn run(args: &crate::cli::LookupArgs) -> Result<()> {
    let config = resolve_config(&args.sources)?;

    let mut form = ZipForm::default();
    form.set_input(args.query.as_str());
    let Some(query) = form.submit() else {
        bail!("empty query");
    };

    info!("lookup {query:?}: boundaries={} plants={}", config.boundaries, config.plants);

    let mut surface = MapSurface::new(config);
    surface.mount(HeadlessMap::new());

    // The search goes out before the data lands, as it does from the welcome form.
    let first = surface.highlight(&query, Instant::now());
    if let SearchStatus::Failed(e) = &first {
        bail!("{e}");
    }

    load_into(&mut surface);
    drive_retries(&mut surface);

    let mut dashboard = DashboardState::new();
    let events = surface.drain_events();
    dashboard.apply_all(&events);
    if let Some(index) = args.details {
        dashboard.toggle_plant(index);
    }
    print!("{}", dashboard.render_text());

    if let Some(view) = surface.host().and_then(|h| h.view()) {
        if let Some((bounds, _)) = view.fitted {
            println!("View: fit to [{:.5}, {:.5}] - [{:.5}, {:.5}]",
                bounds.min().y, bounds.min().x, bounds.max().y, bounds.max().x);
        }
    }

    surface.unmount();
    if let Some(notice) = dashboard.notice() {
        bail!("{notice}");
    }
    Ok(())
}

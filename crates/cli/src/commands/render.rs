use std::{fs, rc::Rc, time::Duration};

use anyhow::{bail, Context, Result};
use futures::executor::block_on;
use tracing::info;

use choromap::{GeoId, GeoJsonSource, KeyEventTarget, ListenerId, MapConfig, MapOrchestrator, StaticMetricProvider};

use crate::cli::{Cli, RenderArgs};

/// Nothing delivers key events to a one-shot render.
struct Headless;

impl KeyEventTarget for Headless {
    fn add_key_listener(&self, _id: ListenerId) {}
    fn remove_key_listener(&self, _id: ListenerId) {}
}

pub fn run(_cli: &Cli, args: &RenderArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => MapConfig::from_json_file(path)?,
        None => MapConfig::default(),
    };
    if let Some(year) = &args.year {
        config.label.year = year.clone();
    }

    let records = fs::read(&args.metrics)
        .with_context(|| format!("Failed to read metrics {}", args.metrics.display()))?;
    let provider = StaticMetricProvider::from_json_records(&records, &config.label.year)?;
    info!(records = provider.len(), year = %config.label.year, "loaded metrics");

    let source = GeoJsonSource::new(&args.states, &args.counties);
    let mut map = MapOrchestrator::new(&source, Rc::new(provider), config)?;
    map.mount(Rc::new(Headless));
    block_on(map.settle());

    if let Some(state) = &args.drill {
        let state = GeoId::from(state.as_str());
        if !map.select_state(&state) {
            bail!("Unknown state {state}");
        }
        block_on(map.settle());
    }
    // Jump to the end of any transition.
    map.tick(Duration::from_secs(3600));

    let svg = map.to_svg_string()?;
    fs::write(&args.output, svg)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(output = %args.output.display(), "wrote snapshot");

    Ok(())
}

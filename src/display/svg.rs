//! SVG output: render once, or keep rendering as the input changes.

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::chart::PolarChartModel;
use crate::cli::Args;
use crate::config::Config;
use crate::events::{PointerHub, PointerTarget};
use crate::series::{twa_tag, tws_tag};
use crate::surface::SvgSurface;
use crate::vpp::VppDataset;
use crate::watch;

/// Read a dataset from `input`, or stdin when it is absent or "-".
pub fn read_dataset(input: Option<&Path>) -> Result<VppDataset> {
    match input {
        Some(path) if path != Path::new("-") => VppDataset::load(path)
            .with_context(|| format!("Failed to load dataset {}", path.display())),
        _ => VppDataset::from_reader(std::io::stdin().lock()).context("Failed to read dataset from stdin"),
    }
}

/// The pointer target a hover over table entry (twa, tws) would produce.
pub fn table_entry_target(twa: f64, tws: f64) -> PointerTarget {
    PointerTarget::new(&[tws_tag(tws).as_str()], &[twa_tag(twa).as_str()])
}

/// Render `dataset` to an SVG document.
pub fn render_document(config: &Config, dataset: VppDataset, highlight: Option<(f64, f64)>) -> String {
    let mut hub = PointerHub::new();
    let mut chart = PolarChartModel::new(
        SvgSurface::new(),
        config.viewport.viewport(),
        config,
        &mut hub,
    );
    chart.render(dataset);

    if let Some((twa, tws)) = highlight {
        hub.publish(table_entry_target(twa, tws));
        chart.pump_pointer_events();
        if chart.highlight().is_none() {
            tracing::warn!("No table entry at {}°, {} kts to highlight", twa, tws);
        }
    }

    chart.teardown(&mut hub).to_svg_string()
}

fn write_output(output: Option<&PathBuf>, svg: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(svg.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

pub async fn run(config: Config, args: &Args) -> Result<()> {
    if !args.watch {
        let dataset = read_dataset(args.input.as_deref())?;
        let svg = render_document(&config, dataset, args.highlight);
        return write_output(args.output.as_ref(), &svg);
    }

    let Some(input) = args.input.clone().filter(|p| p != Path::new("-")) else {
        bail!("--watch needs an input file");
    };
    run_watch(config, input, args.output.clone(), args.highlight).await
}

/// Keep one chart alive and re-render it on every new dataset, the way a
/// page bound to live data would.
async fn run_watch(
    config: Config,
    input: PathBuf,
    output: Option<PathBuf>,
    highlight: Option<(f64, f64)>,
) -> Result<()> {
    let mut datasets = watch::start_watcher(input.clone(), config.watch.poll_interval());
    let mut hub = PointerHub::new();
    let mut chart = PolarChartModel::new(
        SvgSurface::new(),
        config.viewport.viewport(),
        &config,
        &mut hub,
    );
    info!("Watching {} for changes", input.display());

    loop {
        tokio::select! {
            changed = datasets.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = datasets.borrow_and_update().clone();
                let Some(dataset) = latest else {
                    continue;
                };
                chart.render((*dataset).clone());
                if let Some((twa, tws)) = highlight {
                    hub.publish(table_entry_target(twa, tws));
                    chart.pump_pointer_events();
                }
                write_output(output.as_ref(), &chart.surface().to_svg_string())?;
                chart.surface_mut().take_transitions();
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping watch");
                break;
            }
        }
    }

    chart.teardown(&mut hub);
    Ok(())
}

use anyhow::{bail, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::braille::{BrailleCanvas, Rgb};
use super::table::TableView;
use crate::chart::PolarChartModel;
use crate::cli::Args;
use crate::config::Config;
use crate::events::{PointerHub, PointerTarget};
use crate::geometry::{deg_to_rad, polar_to_cartesian};
use crate::surface::SvgSurface;
use crate::viewport::Viewport;
use crate::vpp::VppDataset;
use crate::watch::{self, DatasetReceiver};

/// Chart pixels per braille dot. Keeps the pixel-based layout rules readable
/// at terminal resolution.
const PIXELS_PER_DOT: f64 = 4.0;
const AXIS_COLOR: Rgb = (70, 70, 70);
const HIGHLIGHT_COLOR: Rgb = (255, 255, 255);
const FRAME_TIME: Duration = Duration::from_millis(50);

pub async fn run(config: Config, args: &Args) -> Result<()> {
    let Some(input) = args.input.clone().filter(|p| p != Path::new("-")) else {
        bail!("Terminal mode needs an input file");
    };
    // Load before touching the terminal so errors print normally
    let dataset = VppDataset::load(&input)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config, args, input, dataset).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Screen regions: status line on top, chart left, table right.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Regions {
    status: Rect,
    chart: Rect,
    table: Rect,
}

impl Regions {
    fn split(area: Rect, table_width: u16) -> Self {
        let [status, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
        let [chart, table] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(table_width)]).areas(body);
        Self {
            status,
            chart,
            table,
        }
    }
}

/// Viewport whose computed layout fills `chart` at `PIXELS_PER_DOT`.
fn chart_viewport(chart: Rect, config: &Config) -> Viewport {
    let dots_w = chart.width as f64 * 2.0 * PIXELS_PER_DOT;
    let dots_h = chart.height as f64 * 4.0 * PIXELS_PER_DOT;
    Viewport::new(
        dots_w + 20.0,
        dots_w.max(config.viewport.mobile_breakpoint),
        dots_h + 60.0,
    )
}

struct App {
    config: Config,
    config_path: Option<PathBuf>,
    input: PathBuf,
    hub: PointerHub,
    chart: PolarChartModel<SvgSurface>,
    regions: Regions,
    /// Whole terminal area the regions were split from.
    screen: Rect,
    last_target: PointerTarget,
    message: Option<String>,
}

impl App {
    fn new(
        config: Config,
        config_path: Option<PathBuf>,
        input: PathBuf,
        dataset: VppDataset,
        screen: Rect,
    ) -> Self {
        let regions = Regions::split(screen, TableView::width(&dataset).min(screen.width / 2));
        let mut hub = PointerHub::new();
        let chart = PolarChartModel::new(
            SvgSurface::new(),
            chart_viewport(regions.chart, &config),
            &config,
            &mut hub,
        );
        let mut app = Self {
            config,
            config_path,
            input,
            hub,
            chart,
            regions,
            screen,
            last_target: PointerTarget::none(),
            message: None,
        };
        app.show_dataset(dataset);
        app
    }

    fn draw(&self, frame: &mut Frame) {
        // Reset background for terminal transparency support
        let area = frame.area();
        let block = ratatui::widgets::Block::default().style(Style::default().bg(Color::Reset));
        frame.render_widget(block, area);

        self.draw_chart(frame);
        if let Some(dataset) = self.chart.dataset() {
            let hovered = self.chart.highlight().map(|h| (h.twa, h.tws));
            TableView::render(
                frame,
                self.regions.table,
                dataset,
                hovered,
                self.chart.color_scheme(),
            );
        }
        self.draw_status(frame);
    }

    fn draw_chart(&self, frame: &mut Frame) {
        let area = self.regions.chart;
        let mut canvas = BrailleCanvas::new(area.width as usize, area.height as usize);
        let layout = self.chart.layout();
        let scale = self.chart.scale();
        let (ox, oy) = layout.origin;
        let to_dot = |(x, y): (f64, f64)| ((ox + x) / PIXELS_PER_DOT, (oy + y) / PIXELS_PER_DOT);

        for &speed in &self.config.chart.speed_rings {
            let r = scale.apply(speed);
            let ring: Vec<(f64, f64)> = (0..=72)
                .map(|i| to_dot(polar_to_cartesian(deg_to_rad(i as f64 * 5.0), r)))
                .collect();
            canvas.polyline(&ring, AXIS_COLOR);
        }
        for &angle in &self.config.chart.wind_angles {
            let a = deg_to_rad(angle);
            let from = to_dot(polar_to_cartesian(a, scale.apply(1.0)));
            let to = to_dot(polar_to_cartesian(a, layout.radius));
            canvas.line(from, to, AXIS_COLOR);
        }

        let scheme = self.chart.color_scheme();
        let count = self.chart.series().len();
        for series in self.chart.series() {
            let color = scheme.series_color(series.index, count);
            if let Some(path) = self.chart.series_path(series) {
                for line in path.flatten(8) {
                    let dots: Vec<(f64, f64)> = line.into_iter().map(to_dot).collect();
                    canvas.polyline(&dots, color);
                }
            }
            if let Some(run) = series.run {
                let (x, y) = to_dot(run.project(scale));
                canvas.blot(x, y, 1, color);
            }
        }

        if let Some(highlight) = self.chart.highlight() {
            let (x, y) = to_dot(highlight.point.project(scale));
            canvas.blot(x, y, 2, HIGHLIGHT_COLOR);
        }

        canvas.render(frame, area);
    }

    fn draw_status(&self, frame: &mut Frame) {
        let mut status = format!(
            " {} | [c]olor: {} | [r]eload | [w]rite | [q]uit ",
            self.input.display(),
            self.chart.color_scheme().name()
        );
        if let Some(h) = self.chart.highlight() {
            status.push_str(&format!(
                "| {}° @ {}kts: {:.2}kts ",
                h.twa, h.tws, h.point.sog
            ));
        }
        if let Some(message) = &self.message {
            status.push_str(&format!("| {} ", message));
        }

        let area = self.regions.status;
        frame.buffer_mut().set_stringn(
            area.x,
            area.y,
            &status,
            area.width as usize,
            Style::default().fg(Color::DarkGray),
        );
    }

    fn relayout(&mut self, area: Rect) {
        self.screen = area;
        let table_width = self
            .chart
            .dataset()
            .map(TableView::width)
            .unwrap_or(0)
            .min(area.width / 2);
        let regions = Regions::split(area, table_width);
        if regions == self.regions {
            return;
        }
        self.regions = regions;
        let viewport = chart_viewport(regions.chart, &self.config);
        if self.chart.resize(viewport) {
            debug!("Chart area now {}x{} cells", regions.chart.width, regions.chart.height);
        }
    }

    fn hover(&mut self, column: u16, row: u16) {
        let target = match self.chart.dataset() {
            Some(dataset) => TableView::hit_test(self.regions.table, dataset, column, row),
            None => PointerTarget::none(),
        };
        if target == self.last_target {
            return;
        }
        self.last_target = target.clone();
        self.hub.publish(target);
        self.chart.pump_pointer_events();
    }

    fn reload(&mut self) {
        match VppDataset::load(&self.input) {
            Ok(dataset) => {
                self.show_dataset(dataset);
                self.message = Some("reloaded".to_string());
            }
            Err(e) => {
                warn!("Reload failed: {}", e);
                self.message = Some(format!("reload failed: {}", e));
            }
        }
    }

    fn show_dataset(&mut self, dataset: VppDataset) {
        self.chart.render(dataset);
        self.chart.surface_mut().take_transitions();
        // The table width follows the number of wind speeds
        self.relayout(self.screen);
    }

    fn cycle_colors(&mut self) {
        let next = self.chart.color_scheme().next();
        self.chart.set_color_scheme(next);
        self.config.style.color_scheme = next;
        self.message = None;
    }

    fn save_colors(&mut self) {
        let path = self.config_path.clone().or_else(Config::default_path);
        self.message = Some(match path {
            Some(path) => match Config::persist_color_scheme(&path, self.config.style.color_scheme) {
                Ok(()) => {
                    info!("Saved color scheme to {}", path.display());
                    format!("saved to {}", path.display())
                }
                Err(e) => format!("save failed: {:#}", e),
            },
            None => "no config directory".to_string(),
        });
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Config,
    args: &Args,
    input: PathBuf,
    dataset: VppDataset,
) -> Result<()> {
    let size = terminal.size()?;
    let screen = Rect::new(0, 0, size.width, size.height);
    let mut updates: Option<DatasetReceiver> = args
        .watch
        .then(|| watch::start_watcher(input.clone(), config.watch.poll_interval()));

    let mut app = App::new(config, args.config.clone(), input, dataset, screen);

    loop {
        if let Some(rx) = updates.as_mut() {
            if rx.has_changed().unwrap_or(false) {
                let latest = rx.borrow_and_update().clone();
                if let Some(dataset) = latest {
                    app.show_dataset((*dataset).clone());
                    app.message = Some("file changed".to_string());
                }
            }
        }

        terminal.draw(|frame| app.draw(frame))?;

        // Handle input
        if !event::poll(FRAME_TIME)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => match key {
                KeyEvent {
                    code: KeyCode::Char('q'),
                    ..
                }
                | KeyEvent {
                    code: KeyCode::Char('c'),
                    modifiers: KeyModifiers::CONTROL,
                    ..
                } => {
                    break;
                }
                KeyEvent {
                    code: KeyCode::Char('c'),
                    ..
                } => app.cycle_colors(),
                KeyEvent {
                    code: KeyCode::Char('r'),
                    ..
                } => app.reload(),
                KeyEvent {
                    code: KeyCode::Char('w'),
                    ..
                } => app.save_colors(),
                _ => {}
            },
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Moved,
                column,
                row,
                ..
            }) => app.hover(column, row),
            Event::Resize(width, height) => app.relayout(Rect::new(0, 0, width, height)),
            _ => {}
        }
    }

    let App { chart, mut hub, .. } = app;
    chart.teardown(&mut hub);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::table::COLUMN_WIDTH;
    use crate::viewport::ChartLayout;

    fn dataset(speeds: &[f64]) -> VppDataset {
        let row: Vec<f64> = speeds.iter().map(|s| s * 0.8).collect();
        VppDataset::new(vec![45.0, 90.0], speeds.to_vec(), vec![row.clone(), row]).unwrap()
    }

    #[test]
    fn table_region_follows_new_dataset() {
        let screen = Rect::new(0, 0, 160, 40);
        let mut app = App::new(
            Config::default(),
            None,
            PathBuf::from("polar.json"),
            dataset(&[6.0]),
            screen,
        );
        assert_eq!(app.regions.table.width, 2 * COLUMN_WIDTH);
        let old_radius = app.chart.layout().radius;

        app.show_dataset(dataset(&[6.0, 8.0, 10.0, 12.0]));
        assert_eq!(app.regions.table.width, 5 * COLUMN_WIDTH);
        assert_eq!(app.regions.chart.width, 160 - 5 * COLUMN_WIDTH);
        assert_eq!(app.screen, screen);
        assert!(app.chart.layout().radius <= old_radius);
    }

    #[test]
    fn chart_fits_its_region() {
        let config = Config::default();
        let regions = Regions::split(Rect::new(0, 0, 120, 40), 35);
        assert_eq!(regions.status.height, 1);
        assert_eq!(regions.table.width, 35);
        assert_eq!(regions.chart.width, 85);

        let layout = ChartLayout::compute(
            &chart_viewport(regions.chart, &config),
            &config.viewport.rules(),
        );
        let dots_h = regions.chart.height as f64 * 4.0 * PIXELS_PER_DOT;
        assert_eq!(layout.height, dots_h);
        assert!(layout.radius > 0.0);
        assert!(layout.origin.1 + layout.radius <= dots_h);
    }
}

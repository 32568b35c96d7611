//! The polar chart model.
//!
//! Owns the current dataset, the radial scale and the highlight state, and
//! drives a [`Surface`] through three entry points: [`PolarChartModel::render`],
//! [`PolarChartModel::on_highlight`] and [`PolarChartModel::resize`]. Every
//! render is reconciled against what the surface already shows, keyed by wind
//! speed, so nothing from a previous dataset is left behind.

mod axes;

use serde_json::Value;
use tracing::{debug, info};

use crate::color::{hex, ColorScheme};
use crate::config::{AnimationConfig, ChartConfig, Config, MarkerConfig, StyleConfig};
use crate::error::Result;
use crate::events::{PointerHub, PointerSubscription, PointerTarget};
use crate::geometry::{fmt_num, LinearScale, PathData, PolarPoint, RadialLine, Symbol};
use crate::series::{build_series, tws_tag, PlottedSeries};
use crate::surface::reconcile::summarize;
use crate::surface::{reconcile, Attrs, Element, Layer, Patch, Surface, Tag};
use crate::viewport::{ChartLayout, LayoutRules, Viewport};
use crate::vpp::VppDataset;

const HIGHLIGHT_KEY: &str = "highlight";

/// The table entry currently under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    /// True wind angle in degrees, as tagged on the hovered row.
    pub twa: f64,
    pub tws: f64,
    pub point: PolarPoint,
}

pub struct PolarChartModel<S: Surface> {
    surface: S,
    chart: ChartConfig,
    animation: AnimationConfig,
    markers: MarkerConfig,
    style: StyleConfig,
    rules: LayoutRules,
    layout: ChartLayout,
    scale: LinearScale,
    line: RadialLine,
    dataset: Option<VppDataset>,
    series: Vec<PlottedSeries>,
    highlight: Option<Highlight>,
    pointer: Option<PointerSubscription>,
}

impl<S: Surface> PolarChartModel<S> {
    /// Lay out the chart on `surface`, draw the axes and start listening for
    /// pointer events on `hub`.
    pub fn new(mut surface: S, viewport: Viewport, config: &Config, hub: &mut PointerHub) -> Self {
        let rules = config.viewport.rules();
        let layout = ChartLayout::compute(&viewport, &rules);
        let scale = LinearScale::new((0.0, config.chart.sog_domain_max), (0.0, layout.radius));

        surface.resize(layout.width, layout.height);
        surface.set_origin(layout.origin.0, layout.origin.1);
        axes::draw(&mut surface, &config.chart, &scale, layout.radius);

        info!(
            "Chart laid out at {}x{} with radius {:.1}",
            layout.width, layout.height, layout.radius
        );

        Self {
            surface,
            chart: config.chart.clone(),
            animation: config.animation.clone(),
            markers: config.markers.clone(),
            style: config.style.clone(),
            rules,
            layout,
            scale,
            line: RadialLine::new(config.chart.curve_tension),
            dataset: None,
            series: Vec::new(),
            highlight: None,
            pointer: Some(hub.subscribe()),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    pub fn dataset(&self) -> Option<&VppDataset> {
        self.dataset.as_ref()
    }

    pub fn series(&self) -> &[PlottedSeries] {
        &self.series
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.style.color_scheme
    }

    /// Switch series colors. Only visible on the SVG when inline styling is on.
    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.style.color_scheme = scheme;
        if self.style.inline {
            self.restyle();
        }
    }

    /// Parse a JSON payload, bare or wrapped as `{"vpp": ...}`, and render it.
    pub fn render_value(&mut self, value: Value) -> Result<()> {
        let dataset = VppDataset::from_value(value)?;
        self.render(dataset);
        Ok(())
    }

    /// Replace the plotted data with `dataset`.
    pub fn render(&mut self, dataset: VppDataset) {
        let series = build_series(&dataset);
        let duration = self.animation.render();

        // Run markers
        let runs: Vec<(String, PolarPoint)> = series
            .iter()
            .filter_map(|s| s.run.map(|point| (s.tag(), point)))
            .collect();
        let patches = reconcile(&self.surface.keys(Layer::RunMarkers), runs);
        let (created, updated, deleted) = summarize(&patches);
        debug!(
            "Run markers: {} created, {} updated, {} removed",
            created, updated, deleted
        );
        for patch in patches {
            match patch {
                Patch::Delete { key } => {
                    self.surface.remove(Layer::RunMarkers, &key);
                }
                Patch::Create { key, item } => {
                    let mut marker = Element::new(Tag::Path).class("vmg-run").class(key.clone());
                    marker.apply(&self.fill_style(&series, &key));
                    self.surface.append(Layer::RunMarkers, &key, marker);
                    let attrs = self.marker_attrs(&item, Symbol::Diamond, self.markers.run_size);
                    self.surface.transition(Layer::RunMarkers, &key, attrs, duration);
                }
                Patch::Update { key, item } => {
                    let attrs = self.marker_attrs(&item, Symbol::Diamond, self.markers.run_size);
                    self.surface.transition(Layer::RunMarkers, &key, attrs, duration);
                }
            }
        }

        // Series curves
        let lines: Vec<(String, &PlottedSeries)> = series.iter().map(|s| (s.tag(), s)).collect();
        let patches = reconcile(&self.surface.keys(Layer::Series), lines);
        let (created, updated, deleted) = summarize(&patches);
        debug!(
            "Series: {} created, {} updated, {} removed",
            created, updated, deleted
        );
        for patch in patches {
            match patch {
                Patch::Delete { key } => {
                    self.surface.remove(Layer::Series, &key);
                }
                Patch::Create { key, item } => {
                    let mut path = Element::new(Tag::Path).class("line").class(key.clone());
                    path.apply(&legend_attrs(item));
                    path.apply(&self.stroke_style(item.index, series.len()));
                    self.surface.append(Layer::Series, &key, path);
                    let attrs = self.line_attrs(item);
                    self.surface.transition(Layer::Series, &key, attrs, duration);
                }
                Patch::Update { key, item } => {
                    self.surface.update(Layer::Series, &key, legend_attrs(item));
                    if self.style.inline {
                        let style = self.stroke_style(item.index, series.len());
                        self.surface.update(Layer::Series, &key, style);
                    }
                    let attrs = self.line_attrs(item);
                    self.surface.transition(Layer::Series, &key, attrs, duration);
                }
            }
        }

        self.dataset = Some(dataset);
        self.series = series;

        // A standing highlight follows the new data or goes away
        let standing = self.highlight.map(|h| (h.twa, h.tws));
        if let Some((twa, tws)) = standing {
            let target = self.lookup(twa, tws);
            self.show_highlight(target);
        }
    }

    /// Pointer-over callback: highlight the table entry under the pointer, if any.
    pub fn on_highlight(&mut self, target: &PointerTarget) {
        let entry = match (
            target.tagged_value("tws-"),
            target.parent_tagged_value("twa-"),
        ) {
            (Some(tws), Some(twa)) => self.lookup(twa, tws),
            _ => None,
        };
        self.show_highlight(entry);
    }

    /// Apply every pointer event queued on this chart's subscription.
    /// Returns how many were handled.
    pub fn pump_pointer_events(&mut self) -> usize {
        let events = match self.pointer.as_mut() {
            Some(subscription) => subscription.drain(),
            None => return 0,
        };
        for target in &events {
            self.on_highlight(target);
        }
        events.len()
    }

    /// Re-project onto a new viewport. Returns false when the rendering
    /// width did not change, in which case nothing is touched.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let layout = ChartLayout::compute(&viewport, &self.rules);
        if layout.width == self.layout.width {
            return false;
        }
        debug!(
            "Resizing chart: width {} -> {}, radius {:.1} -> {:.1}",
            self.layout.width, layout.width, self.layout.radius, layout.radius
        );

        self.layout = layout;
        self.scale.set_range((0.0, layout.radius));
        self.surface.resize(layout.width, layout.height);
        self.surface.set_origin(layout.origin.0, layout.origin.1);
        axes::resize(&mut self.surface, &self.chart, &self.scale, layout.radius);

        let duration = self.animation.render();
        for series in &self.series {
            let attrs = self.line_attrs(series);
            self.surface.transition(Layer::Series, &series.tag(), attrs, duration);
            if let Some(run) = series.run {
                let attrs = self.marker_attrs(&run, Symbol::Diamond, self.markers.run_size);
                self.surface.transition(Layer::RunMarkers, &series.tag(), attrs, duration);
            }
        }
        if let Some(highlight) = self.highlight {
            let attrs = self.marker_attrs(&highlight.point, Symbol::Circle, self.markers.highlight_size);
            self.surface.transition(Layer::Highlight, HIGHLIGHT_KEY, attrs, duration);
        }
        true
    }

    /// Stop listening for pointer events and hand the surface back.
    pub fn teardown(mut self, hub: &mut PointerHub) -> S {
        if let Some(subscription) = self.pointer.take() {
            hub.unsubscribe(subscription);
        }
        self.surface
    }

    fn lookup(&self, twa: f64, tws: f64) -> Option<Highlight> {
        let dataset = self.dataset.as_ref()?;
        let sog = dataset.sog(twa, dataset.speed_index(tws)?)?;
        Some(Highlight {
            twa,
            tws,
            point: PolarPoint::from_degrees(twa, sog),
        })
    }

    fn show_highlight(&mut self, highlight: Option<Highlight>) {
        let incoming: Vec<(String, Highlight)> = highlight
            .into_iter()
            .map(|h| (HIGHLIGHT_KEY.to_string(), h))
            .collect();
        let duration = self.animation.highlight();

        for patch in reconcile(&self.surface.keys(Layer::Highlight), incoming) {
            match patch {
                Patch::Delete { key } => {
                    self.surface.remove(Layer::Highlight, &key);
                }
                Patch::Create { key, item } | Patch::Update { key, item } => {
                    if self.surface.element(Layer::Highlight, &key).is_none() {
                        self.surface.append(Layer::Highlight, &key, Element::new(Tag::Path));
                    }
                    let classes = vec!["highlight".to_string(), tws_tag(item.tws)];
                    self.surface.set_classes(Layer::Highlight, &key, classes);
                    if self.style.inline {
                        let style = vec![("fill", "#ffffff".to_string()), ("stroke", "#000000".to_string())];
                        self.surface.update(Layer::Highlight, &key, style);
                    }
                    let attrs =
                        self.marker_attrs(&item.point, Symbol::Circle, self.markers.highlight_size);
                    self.surface.transition(Layer::Highlight, &key, attrs, duration);
                }
            }
        }
        self.highlight = highlight;
    }

    fn restyle(&mut self) {
        let count = self.series.len();
        for series in &self.series {
            let tag = series.tag();
            let stroke = self.stroke_style(series.index, count);
            self.surface.update(Layer::Series, &tag, stroke);
            if series.run.is_some() {
                let fill = self.fill_style(&self.series, &tag);
                self.surface.update(Layer::RunMarkers, &tag, fill);
            }
        }
    }

    /// Curve of `series` in chart coordinates, `None` when it has no points.
    pub fn series_path(&self, series: &PlottedSeries) -> Option<PathData> {
        self.line.path(&series.points, &self.scale)
    }

    fn line_attrs(&self, series: &PlottedSeries) -> Attrs {
        let d = self
            .series_path(series)
            .map(|path| path.to_string())
            .unwrap_or_default();
        vec![("d", d)]
    }

    fn marker_attrs(&self, point: &PolarPoint, symbol: Symbol, size: f64) -> Attrs {
        let (x, y) = point.project(&self.scale);
        vec![
            ("transform", format!("translate({}, {})", fmt_num(x), fmt_num(y))),
            ("d", symbol.path(size).to_string()),
        ]
    }

    fn stroke_style(&self, index: usize, count: usize) -> Attrs {
        if !self.style.inline {
            return Vec::new();
        }
        let color = self.style.color_scheme.series_color(index, count);
        vec![("stroke", hex(color)), ("fill", "none".to_string())]
    }

    fn fill_style(&self, series: &[PlottedSeries], tag: &str) -> Attrs {
        if !self.style.inline {
            return Vec::new();
        }
        let index = series.iter().position(|s| s.tag() == tag).unwrap_or(0);
        let color = self.style.color_scheme.series_color(index, series.len());
        vec![("fill", hex(color))]
    }
}

fn legend_attrs(series: &PlottedSeries) -> Attrs {
    vec![
        ("data-legend", format!("{}kts", fmt_num(series.speed))),
        ("data-legend-pos", series.index.to_string()),
    ]
}

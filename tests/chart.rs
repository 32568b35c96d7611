use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

use vpp_polar::config::Config;
use vpp_polar::events::{PointerHub, PointerTarget};
use vpp_polar::surface::{Layer, Surface, SvgSurface};
use vpp_polar::viewport::Viewport;
use vpp_polar::{PolarChartModel, VppDataset};

fn viewport(container_width: f64) -> Viewport {
    Viewport::new(container_width, 1280.0, 900.0)
}

fn chart(hub: &mut PointerHub) -> PolarChartModel<SvgSurface> {
    PolarChartModel::new(SvgSurface::new(), viewport(820.0), &Config::default(), hub)
}

fn three_speeds() -> VppDataset {
    VppDataset::from_json_str(
        r#"{
            "angles": [0, 45, 90, 135],
            "speeds": [6, 8, 10],
            "0": [0, 0, 0],
            "45": [5.5, 6.2, 6.8],
            "90": [6.1, 7.0, 7.6],
            "135": [5.0, 6.4, 7.3],
            "beat_angle": [40, 39, 38],
            "beat_vmg": [4.0, 4.6, 5.0],
            "run_angle": [150, 155, 160],
            "run_vmg": [4.2, 5.3, 6.2]
        }"#,
    )
    .unwrap()
}

fn element_attr(surface: &SvgSurface, layer: Layer, key: &str, attr: &str) -> Option<String> {
    surface.element(layer, key)?.get(attr).map(str::to_string)
}

#[test]
fn one_curve_per_wind_speed() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(three_speeds());

    assert_eq!(
        chart.surface().keys(Layer::Series),
        vec!["tws-6", "tws-8", "tws-10"]
    );
    assert_eq!(
        chart.surface().keys(Layer::RunMarkers),
        vec!["tws-6", "tws-8", "tws-10"]
    );
    let legend = element_attr(chart.surface(), Layer::Series, "tws-8", "data-legend");
    assert_eq!(legend.as_deref(), Some("8kts"));
}

#[test]
fn series_points_are_sorted_and_positive() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(three_speeds());

    for series in chart.series() {
        assert!(series.points.windows(2).all(|w| w[0].angle <= w[1].angle));
        assert!(series.points.iter().all(|p| p.sog > 0.0));
        // zero row dropped, beat and run added
        assert_eq!(series.points.len(), 5);
    }
}

#[test]
fn beat_point_is_projected_from_vmg() {
    let dataset = VppDataset::from_json_str(
        r#"{"angles": [45, 90], "speeds": [6], "45": [6], "90": [5],
            "beat_angle": [30], "beat_vmg": [4]}"#,
    )
    .unwrap();
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(dataset);

    let beat = chart.series()[0].beat.unwrap();
    assert!((beat.sog - 4.0 / 30f64.to_radians().cos()).abs() < 1e-9);
    assert!((beat.sog - 4.62).abs() < 0.01);
    assert_eq!(chart.series()[0].points[0], beat);
}

#[test]
fn rendering_the_same_data_twice_changes_nothing() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(three_speeds());
    let first = chart.surface().to_svg_string();
    chart.render(three_speeds());
    assert_eq!(chart.surface().to_svg_string(), first);
}

#[test]
fn stale_wind_speeds_are_removed() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(three_speeds());

    let smaller = VppDataset::from_json_str(
        r#"{"angles": [45, 90], "speeds": [8, 12], "45": [6, 7], "90": [7, 8]}"#,
    )
    .unwrap();
    chart.render(smaller);

    assert_eq!(chart.surface().keys(Layer::Series), vec!["tws-8", "tws-12"]);
    assert!(chart.surface().keys(Layer::RunMarkers).is_empty());
}

#[test]
fn curve_reaches_the_plot_edge_at_domain_max() {
    let dataset =
        VppDataset::from_json_str(r#"{"angles": [90], "speeds": [6], "90": [10]}"#).unwrap();
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(dataset);

    let radius = chart.layout().radius;
    let d = element_attr(chart.surface(), Layer::Series, "tws-6", "d").unwrap();
    let expected = format!("M{},0Z", vpp_polar::geometry::fmt_num(radius));
    assert_eq!(d, expected);
}

#[test]
fn all_zero_series_draws_nothing() {
    let dataset =
        VppDataset::from_json_str(r#"{"angles": [0, 45], "speeds": [6], "0": [0], "45": [0]}"#)
            .unwrap();
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(dataset);

    assert_eq!(chart.series().len(), 1);
    assert!(chart.series()[0].is_empty());
    let d = element_attr(chart.surface(), Layer::Series, "tws-6", "d");
    assert_eq!(d.as_deref(), Some(""));
}

#[test]
fn hover_over_table_entry_highlights_it() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(three_speeds());

    hub.publish(PointerTarget::new(&["tws-6"], &["twa-45"]));
    assert_eq!(chart.pump_pointer_events(), 1);

    let highlight = chart.highlight().copied().unwrap();
    assert_eq!(highlight.point.angle, 45f64.to_radians());
    assert_eq!(highlight.point.sog, 5.5);
    assert_eq!(chart.surface().keys(Layer::Highlight), vec!["highlight"]);
    let marker = chart.surface().element(Layer::Highlight, "highlight").unwrap();
    assert!(marker.has_class("highlight"));
    assert!(marker.has_class("tws-6"));

    // moving to another cell keeps a single marker
    hub.publish(PointerTarget::new(&["tws-10"], &["twa-90"]));
    chart.pump_pointer_events();
    assert_eq!(chart.surface().keys(Layer::Highlight).len(), 1);
    let marker = chart.surface().element(Layer::Highlight, "highlight").unwrap();
    assert!(marker.has_class("tws-10"));
    assert!(!marker.has_class("tws-6"));
}

#[test]
fn leaving_the_table_clears_the_highlight() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(three_speeds());

    chart.on_highlight(&PointerTarget::new(&["tws-8"], &["twa-90"]));
    assert!(chart.highlight().is_some());
    chart.on_highlight(&PointerTarget::none());
    assert!(chart.highlight().is_none());
    assert!(chart.surface().keys(Layer::Highlight).is_empty());
}

#[test]
fn hover_on_unknown_entry_shows_nothing() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(three_speeds());

    chart.on_highlight(&PointerTarget::new(&["tws-7"], &["twa-45"]));
    assert!(chart.highlight().is_none());
    chart.on_highlight(&PointerTarget::new(&["tws-6"], &[]));
    assert!(chart.highlight().is_none());
}

#[test]
fn standing_highlight_follows_new_data() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(three_speeds());
    chart.on_highlight(&PointerTarget::new(&["tws-6"], &["twa-45"]));

    let faster = VppDataset::from_json_str(
        r#"{"angles": [45], "speeds": [6], "45": [7.25]}"#,
    )
    .unwrap();
    chart.render(faster);
    assert_eq!(chart.highlight().map(|h| h.point.sog), Some(7.25));

    let without = VppDataset::from_json_str(r#"{"angles": [90], "speeds": [6], "90": [7]}"#)
        .unwrap();
    chart.render(without);
    assert!(chart.highlight().is_none());
}

#[test]
fn resize_with_same_width_is_a_no_op() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(three_speeds());
    chart.surface_mut().take_transitions();

    assert!(!chart.resize(Viewport::new(820.0, 600.0, 400.0)));
    assert!(chart.surface().transitions().is_empty());
}

#[test]
fn resize_rescales_geometry() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(three_speeds());
    chart.surface_mut().take_transitions();

    let old_radius = chart.layout().radius;
    assert!(chart.resize(viewport(420.0)));
    let new_radius = chart.layout().radius;
    assert!(new_radius < old_radius);
    assert_eq!(chart.scale().apply(10.0), new_radius);
    assert_eq!(chart.surface().size(), (400.0, 800.0));

    let ring = element_attr(chart.surface(), Layer::Rings, "sog-5", "r");
    assert_eq!(ring, None);
    let ring = element_attr(chart.surface(), Layer::Rings, "sog-10", "r").unwrap();
    assert_eq!(ring, vpp_polar::geometry::fmt_num(new_radius));

    let transitions = chart.surface_mut().take_transitions();
    assert!(transitions
        .iter()
        .any(|t| t.layer == Layer::Series && t.key == "tws-8" && t.duration == Duration::from_millis(200)));
}

#[test]
fn envelope_payload_renders() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart
        .render_value(json!({
            "vpp": {"angles": [45, 90], "speeds": [6], "45": [6], "90": [5]}
        }))
        .unwrap();
    assert_eq!(chart.surface().keys(Layer::Series), vec!["tws-6"]);
}

#[test]
fn malformed_payload_is_rejected_without_touching_the_chart() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart.render(three_speeds());

    let result = chart.render_value(json!({"angles": [45], "speeds": [6], "45": [6, 7]}));
    assert!(result.is_err());
    assert_eq!(chart.series().len(), 3);
}

#[test]
fn teardown_stops_pointer_delivery() {
    let mut hub = PointerHub::new();
    let chart = chart(&mut hub);
    assert_eq!(hub.listener_count(), 1);

    let surface = chart.teardown(&mut hub);
    assert_eq!(hub.listener_count(), 0);
    hub.publish(PointerTarget::new(&["tws-6"], &["twa-45"]));
    assert_eq!(surface.keys(Layer::Highlight), Vec::<String>::new());
}

#[test]
fn every_wind_speed_gets_its_own_key() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart
        .render_value(json!({"angles": [45], "speeds": [6, 6.5], "45": [5, 5.5]}))
        .unwrap();
    assert_eq!(chart.surface().keys(Layer::Series), vec!["tws-6", "tws-6.5"]);

    let clashing = json!({"angles": [45], "speeds": [6.0001, 6.0004], "45": [5, 5.5]});
    assert!(chart.render_value(clashing).is_err());
    assert_eq!(chart.series().len(), chart.surface().keys(Layer::Series).len());
}

#[test]
fn hover_finds_rows_with_fractional_angles() {
    let mut hub = PointerHub::new();
    let mut chart = chart(&mut hub);
    chart
        .render_value(json!({"angles": [52.0004], "speeds": [6], "52.0004": [6.4]}))
        .unwrap();

    chart.on_highlight(&PointerTarget::new(&["tws-6"], &["twa-52"]));
    assert_eq!(chart.highlight().map(|h| h.point.sog), Some(6.4));
}

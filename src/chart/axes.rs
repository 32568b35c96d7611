//! Static axis furniture: speed rings and true wind angle spokes.

use crate::config::ChartConfig;
use crate::geometry::{fmt_num, LinearScale};
use crate::surface::{Attrs, Element, Layer, Surface, Tag};

/// Spokes past the beam get their label flipped to stay upright.
const FLIP_LABEL_PAST: f64 = 90.0;

fn ring_key(speed: f64) -> String {
    format!("sog-{}", fmt_num(speed))
}

fn ring_label_key(speed: f64) -> String {
    format!("sog-{}-label", fmt_num(speed))
}

fn spoke_key(angle: f64) -> String {
    format!("twa-{}", fmt_num(angle))
}

fn spoke_label_key(angle: f64) -> String {
    format!("twa-{}-label", fmt_num(angle))
}

fn ring_attrs(speed: f64, scale: &LinearScale) -> Attrs {
    vec![("r", fmt_num(scale.apply(speed)))]
}

fn ring_label_attrs(speed: f64, scale: &LinearScale) -> Attrs {
    vec![("y", fmt_num(-scale.apply(speed) - 4.0))]
}

fn spoke_attrs(scale: &LinearScale, radius: f64) -> Attrs {
    vec![("x1", fmt_num(scale.apply(1.0))), ("x2", fmt_num(radius))]
}

fn spoke_label_attrs(angle: f64, radius: f64) -> Attrs {
    let x = radius + 6.0;
    let mut transform = format!("rotate({})", fmt_num(angle - 90.0));
    if angle > FLIP_LABEL_PAST {
        transform.push_str(&format!(" rotate(180 {}, 0)", fmt_num(x)));
    }
    vec![("x", fmt_num(x)), ("transform", transform)]
}

/// Append rings and spokes. Called once when the chart is created.
pub fn draw<S: Surface>(surface: &mut S, chart: &ChartConfig, scale: &LinearScale, radius: f64) {
    for &speed in &chart.speed_rings {
        let key = ring_key(speed);
        let mut ring = Element::new(Tag::Circle)
            .class("r")
            .class("axis")
            .class(key.clone());
        ring.apply(&ring_attrs(speed, scale));
        surface.append(Layer::Rings, &key, ring);

        if speed <= chart.ring_label_max {
            let mut label = Element::new(Tag::Text)
                .class("r")
                .class("axis")
                .attr("transform", "rotate(20)")
                .attr("text-anchor", "middle")
                .text(format!("{}kts", fmt_num(speed)));
            label.apply(&ring_label_attrs(speed, scale));
            surface.append(Layer::Rings, &ring_label_key(speed), label);
        }
    }

    for &angle in &chart.wind_angles {
        let mut line = Element::new(Tag::Line)
            .class("a")
            .class("axis")
            .attr("transform", format!("rotate({})", fmt_num(angle - 90.0)));
        line.apply(&spoke_attrs(scale, radius));
        surface.append(Layer::Spokes, &spoke_key(angle), line);

        let mut label = Element::new(Tag::Text)
            .class("xlabel")
            .attr("dy", ".35em")
            .text(format!("{}°", fmt_num(angle)));
        label.apply(&spoke_label_attrs(angle, radius));
        surface.append(Layer::Spokes, &spoke_label_key(angle), label);
    }
}

/// Move rings, spokes and labels onto a new radius.
pub fn resize<S: Surface>(surface: &mut S, chart: &ChartConfig, scale: &LinearScale, radius: f64) {
    for &speed in &chart.speed_rings {
        surface.update(Layer::Rings, &ring_key(speed), ring_attrs(speed, scale));
        if speed <= chart.ring_label_max {
            surface.update(
                Layer::Rings,
                &ring_label_key(speed),
                ring_label_attrs(speed, scale),
            );
        }
    }
    for &angle in &chart.wind_angles {
        surface.update(Layer::Spokes, &spoke_key(angle), spoke_attrs(scale, radius));
        surface.update(
            Layer::Spokes,
            &spoke_label_key(angle),
            spoke_label_attrs(angle, radius),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SvgSurface;

    fn drawn(radius: f64) -> SvgSurface {
        let mut surface = SvgSurface::new();
        let scale = LinearScale::new((0.0, 10.0), (0.0, radius));
        draw(&mut surface, &ChartConfig::default(), &scale, radius);
        surface
    }

    #[test]
    fn labels_only_rings_up_to_ten_knots() {
        let surface = drawn(200.0);
        let labels: Vec<&str> = surface
            .elements(Layer::Rings)
            .filter_map(|(_, e)| e.text.as_deref())
            .collect();
        assert_eq!(labels, vec!["2kts", "4kts", "6kts", "8kts", "10kts"]);
        assert_eq!(surface.element(Layer::Rings, "sog-16").unwrap().get("r"), Some("320"));
    }

    #[test]
    fn spoke_labels_flip_past_the_beam() {
        let surface = drawn(200.0);
        let upwind = surface.element(Layer::Spokes, "twa-45-label").unwrap();
        assert_eq!(upwind.get("transform"), Some("rotate(-45)"));
        let downwind = surface.element(Layer::Spokes, "twa-135-label").unwrap();
        assert_eq!(downwind.get("transform"), Some("rotate(45) rotate(180 206, 0)"));
        let beam = surface.element(Layer::Spokes, "twa-90-label").unwrap();
        assert_eq!(beam.get("transform"), Some("rotate(0)"));
    }

    #[test]
    fn resize_moves_spokes_and_rings() {
        let mut surface = drawn(200.0);
        let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        resize(&mut surface, &ChartConfig::default(), &scale, 100.0);
        let spoke = surface.element(Layer::Spokes, "twa-0").unwrap();
        assert_eq!(spoke.get("x1"), Some("10"));
        assert_eq!(spoke.get("x2"), Some("100"));
        assert_eq!(surface.element(Layer::Rings, "sog-4-label").unwrap().get("y"), Some("-44"));
    }
}

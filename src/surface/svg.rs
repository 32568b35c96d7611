//! Retained SVG document implementing [`Surface`].

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use super::{Attrs, Element, Layer, Surface};
use crate::geometry::fmt_num;

/// A transition the surface was asked to run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTransition {
    pub layer: Layer,
    pub key: String,
    pub duration: Duration,
    pub attrs: Vec<&'static str>,
}

/// Keeps the final state of every element; transitions are recorded in a
/// journal rather than interpolated, since a static document only shows
/// where each animation ends.
#[derive(Debug, Default)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    origin: (f64, f64),
    layers: BTreeMap<Layer, Vec<(String, Element)>>,
    transitions: Vec<ScheduledTransition>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    pub fn elements(&self, layer: Layer) -> impl Iterator<Item = (&str, &Element)> {
        self.layers
            .get(&layer)
            .into_iter()
            .flatten()
            .map(|(key, element)| (key.as_str(), element))
    }

    pub fn transitions(&self) -> &[ScheduledTransition] {
        &self.transitions
    }

    /// Drain the transition journal.
    pub fn take_transitions(&mut self) -> Vec<ScheduledTransition> {
        std::mem::take(&mut self.transitions)
    }

    fn find_mut(&mut self, layer: Layer, key: &str) -> Option<&mut Element> {
        self.layers
            .get_mut(&layer)?
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, element)| element)
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            fmt_num(self.width),
            fmt_num(self.height)
        );
        let _ = writeln!(
            out,
            r#"  <g transform="translate({}, {})">"#,
            fmt_num(self.origin.0),
            fmt_num(self.origin.1)
        );
        for layer in Layer::ALL {
            let Some(elements) = self.layers.get(&layer) else {
                continue;
            };
            let _ = writeln!(out, r#"    <g class="{}">"#, layer.name());
            for (_, element) in elements {
                write_element(&mut out, element);
            }
            let _ = writeln!(out, "    </g>");
        }
        out.push_str("  </g>\n</svg>\n");
        out
    }
}

fn write_element(out: &mut String, element: &Element) {
    let _ = write!(out, "      <{}", element.tag);
    if !element.classes.is_empty() {
        let _ = write!(out, r#" class="{}""#, escape(&element.classes.join(" ")));
    }
    for (name, value) in &element.attrs {
        let _ = write!(out, r#" {}="{}""#, name, escape(value));
    }
    match &element.text {
        Some(text) => {
            let _ = writeln!(out, ">{}</{}>", escape(text), element.tag);
        }
        None => out.push_str("/>\n"),
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

impl Surface for SvgSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn set_origin(&mut self, x: f64, y: f64) {
        self.origin = (x, y);
    }

    fn append(&mut self, layer: Layer, key: &str, element: Element) {
        let elements = self.layers.entry(layer).or_default();
        match elements.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = element,
            None => elements.push((key.to_string(), element)),
        }
    }

    fn set_classes(&mut self, layer: Layer, key: &str, classes: Vec<String>) {
        if let Some(element) = self.find_mut(layer, key) {
            element.classes = classes;
        }
    }

    fn update(&mut self, layer: Layer, key: &str, attrs: Attrs) {
        if let Some(element) = self.find_mut(layer, key) {
            element.apply(&attrs);
        }
    }

    fn transition(&mut self, layer: Layer, key: &str, attrs: Attrs, duration: Duration) {
        let Some(element) = self.find_mut(layer, key) else {
            return;
        };
        element.apply(&attrs);
        let names = attrs.iter().map(|(name, _)| *name).collect();

        // Retarget an in-flight transition instead of queueing a second one
        match self
            .transitions
            .iter_mut()
            .find(|t| t.layer == layer && t.key == key)
        {
            Some(pending) => {
                pending.duration = duration;
                pending.attrs = names;
            }
            None => self.transitions.push(ScheduledTransition {
                layer,
                key: key.to_string(),
                duration,
                attrs: names,
            }),
        }
    }

    fn remove(&mut self, layer: Layer, key: &str) -> bool {
        self.transitions.retain(|t| !(t.layer == layer && t.key == key));
        let Some(elements) = self.layers.get_mut(&layer) else {
            return false;
        };
        let before = elements.len();
        elements.retain(|(k, _)| k != key);
        elements.len() != before
    }

    fn keys(&self, layer: Layer) -> Vec<String> {
        self.elements(layer).map(|(key, _)| key.to_string()).collect()
    }

    fn element(&self, layer: Layer, key: &str) -> Option<&Element> {
        self.elements(layer)
            .find(|(k, _)| *k == key)
            .map(|(_, element)| element)
    }
}

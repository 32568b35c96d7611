//! Drawing surface abstraction.
//!
//! The chart model never touches output primitives directly. It asks a
//! [`Surface`] to append keyed elements into a layer, to move their attributes
//! to a new target over a duration, and to remove them. [`SvgSurface`] is a
//! retained implementation that serializes to an SVG document.

pub mod reconcile;
pub mod svg;

pub use reconcile::{reconcile, Patch};
pub use svg::SvgSurface;

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Drawing order, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Rings,
    Spokes,
    Series,
    RunMarkers,
    Highlight,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::Rings,
        Layer::Spokes,
        Layer::Series,
        Layer::RunMarkers,
        Layer::Highlight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Layer::Rings => "rings",
            Layer::Spokes => "spokes",
            Layer::Series => "series",
            Layer::RunMarkers => "run-markers",
            Layer::Highlight => "highlight",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Circle,
    Line,
    Path,
    Text,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Circle => "circle",
            Tag::Line => "line",
            Tag::Path => "path",
            Tag::Text => "text",
        };
        f.write_str(name)
    }
}

pub type Attrs = Vec<(&'static str, String)>;

/// A shape with class tags and attributes, like a DOM node without children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: Tag,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<&'static str, String>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: None,
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.insert(name, value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn apply(&mut self, attrs: &Attrs) {
        for (name, value) in attrs {
            self.attrs.insert(*name, value.clone());
        }
    }
}

/// Output target for the chart model.
pub trait Surface {
    /// Set the outer size of the drawing.
    fn resize(&mut self, width: f64, height: f64);

    /// Translate the plot origin.
    fn set_origin(&mut self, x: f64, y: f64);

    /// Add `element` under `key`, replacing any element already bound to it.
    fn append(&mut self, layer: Layer, key: &str, element: Element);

    /// Replace the class tags of an element.
    fn set_classes(&mut self, layer: Layer, key: &str, classes: Vec<String>);

    /// Set attributes immediately.
    fn update(&mut self, layer: Layer, key: &str, attrs: Attrs);

    /// Move attributes to a new target over `duration`. A newer target for
    /// the same element supersedes one still in flight.
    fn transition(&mut self, layer: Layer, key: &str, attrs: Attrs, duration: Duration);

    /// Remove the element bound to `key`. Returns false when there was none.
    fn remove(&mut self, layer: Layer, key: &str) -> bool;

    /// Keys bound in `layer`, in insertion order.
    fn keys(&self, layer: Layer) -> Vec<String>;

    fn element(&self, layer: Layer, key: &str) -> Option<&Element>;
}

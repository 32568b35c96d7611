//! Chart layout derived from the containing surface and window size.

/// Dimensions the chart is laid out against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width of the element the chart is drawn into.
    pub container_width: f64,
    pub window_width: f64,
    pub window_height: f64,
}

impl Viewport {
    pub fn new(container_width: f64, window_width: f64, window_height: f64) -> Self {
        Self {
            container_width,
            window_width,
            window_height,
        }
    }
}

/// Layout constants. Defaults reproduce the web plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRules {
    /// Windows narrower than this are treated as mobile and get full height.
    pub mobile_breakpoint: f64,
    /// Horizontal offset of the origin from the left edge.
    pub margin_left: f64,
}

impl Default for LayoutRules {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            margin_left: 10.0,
        }
    }
}

/// Pixel geometry of the chart for one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    /// Origin translation: the plot is a half disc anchored at mid height.
    pub origin: (f64, f64),
}

impl ChartLayout {
    pub fn compute(viewport: &Viewport, rules: &LayoutRules) -> Self {
        let width = viewport.container_width - 20.0;
        let height = if viewport.window_width < rules.mobile_breakpoint {
            viewport.window_height
        } else {
            (viewport.window_height - 60.0).min(width * 2.0)
        };
        let radius = ((height / 2.2 - 20.0).min(width) - 40.0).max(0.0);

        Self {
            width,
            height,
            radius,
            origin: (rules.margin_left, height / 2.0),
        }
    }
}

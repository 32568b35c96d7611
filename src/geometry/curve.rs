//! Path data and the radial cardinal-spline line generator.

use std::fmt;

use super::{fmt_num, LinearScale, PolarPoint};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    /// Cubic Bézier: two control points then the end point.
    CubicTo(f64, f64, f64, f64, f64, f64),
    /// Elliptical arc with the SVG flag set `large-arc=1, sweep=1`.
    ArcTo { radius: f64, x: f64, y: f64 },
    Close,
}

/// An SVG path under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo(x, y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::LineTo(x, y));
    }

    pub fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.commands.push(PathCommand::CubicTo(x1, y1, x2, y2, x, y));
    }

    pub fn arc_to(&mut self, radius: f64, x: f64, y: f64) {
        self.commands.push(PathCommand::ArcTo { radius, x, y });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Approximate the path with polylines, `steps` samples per curve.
    /// Arcs are replaced by straight chords.
    pub fn flatten(&self, steps: usize) -> Vec<Vec<(f64, f64)>> {
        let steps = steps.max(1);
        let mut lines: Vec<Vec<(f64, f64)>> = Vec::new();
        let mut start = (0.0, 0.0);
        let mut cursor = (0.0, 0.0);

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(x, y) => {
                    lines.push(vec![(x, y)]);
                    start = (x, y);
                    cursor = (x, y);
                }
                PathCommand::LineTo(x, y) | PathCommand::ArcTo { x, y, .. } => {
                    push_point(&mut lines, cursor, (x, y));
                    cursor = (x, y);
                }
                PathCommand::CubicTo(x1, y1, x2, y2, x, y) => {
                    let (x0, y0) = cursor;
                    for step in 1..=steps {
                        let t = step as f64 / steps as f64;
                        let mt = 1.0 - t;
                        let a = mt * mt * mt;
                        let b = 3.0 * mt * mt * t;
                        let c = 3.0 * mt * t * t;
                        let d = t * t * t;
                        push_point(
                            &mut lines,
                            cursor,
                            (
                                a * x0 + b * x1 + c * x2 + d * x,
                                a * y0 + b * y1 + c * y2 + d * y,
                            ),
                        );
                    }
                    cursor = (x, y);
                }
                PathCommand::Close => {
                    push_point(&mut lines, cursor, start);
                    cursor = start;
                }
            }
        }
        lines
    }
}

fn push_point(lines: &mut Vec<Vec<(f64, f64)>>, cursor: (f64, f64), point: (f64, f64)) {
    match lines.last_mut() {
        Some(line) => line.push(point),
        None => lines.push(vec![cursor, point]),
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(x, y) => write!(f, "M{},{}", fmt_num(x), fmt_num(y))?,
                PathCommand::LineTo(x, y) => write!(f, "L{},{}", fmt_num(x), fmt_num(y))?,
                PathCommand::CubicTo(x1, y1, x2, y2, x, y) => write!(
                    f,
                    "C{},{},{},{},{},{}",
                    fmt_num(x1),
                    fmt_num(y1),
                    fmt_num(x2),
                    fmt_num(y2),
                    fmt_num(x),
                    fmt_num(y)
                )?,
                PathCommand::ArcTo { radius, x, y } => {
                    let r = fmt_num(radius);
                    write!(f, "A{},{},0,1,1,{},{}", r, r, fmt_num(x), fmt_num(y))?
                }
                PathCommand::Close => write!(f, "Z")?,
            }
        }
        Ok(())
    }
}

/// Cardinal spline through `points`.
///
/// `tension` 0 gives a Catmull-Rom-like curve, 1 gives straight segments.
/// The outer control points sit on the first and last data points, so the
/// curve leaves and enters the ends without a tangent.
pub fn cardinal(points: &[(f64, f64)], tension: f64) -> PathData {
    let k = (1.0 - tension) / 6.0;
    let mut path = PathData::new();

    match points {
        [] => {}
        [(x, y)] => {
            path.move_to(*x, *y);
            path.close();
        }
        [(x0, y0), (x1, y1)] => {
            path.move_to(*x0, *y0);
            path.line_to(*x1, *y1);
        }
        _ => {
            let n = points.len();
            let (fx, fy) = points[0];
            path.move_to(fx, fy);
            for i in 0..n - 1 {
                let from = points[i];
                let to = points[i + 1];
                let prev = if i == 0 { to } else { points[i - 1] };
                let next = if i + 2 < n { points[i + 2] } else { from };
                path.cubic_to(
                    from.0 + k * (to.0 - prev.0),
                    from.1 + k * (to.1 - prev.1),
                    to.0 + k * (from.0 - next.0),
                    to.1 + k * (from.1 - next.1),
                    to.0,
                    to.1,
                );
            }
        }
    }
    path
}

/// Line generator over polar points: angle from the point, radius through a scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialLine {
    pub tension: f64,
}

impl Default for RadialLine {
    fn default() -> Self {
        Self { tension: 0.0 }
    }
}

impl RadialLine {
    pub fn new(tension: f64) -> Self {
        Self { tension }
    }

    /// Path through `points`, or `None` when there is nothing to draw.
    pub fn path(&self, points: &[PolarPoint], scale: &LinearScale) -> Option<PathData> {
        if points.is_empty() {
            return None;
        }
        let projected: Vec<(f64, f64)> = points.iter().map(|p| p.project(scale)).collect();
        Some(cardinal(&projected, self.tension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_has_no_path() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        assert!(RadialLine::default().path(&[], &scale).is_none());
    }

    #[test]
    fn single_point_closes() {
        let path = cardinal(&[(1.0, 2.0)], 0.0);
        assert_eq!(path.to_string(), "M1,2Z");
    }

    #[test]
    fn two_points_are_a_straight_line() {
        let path = cardinal(&[(0.0, 0.0), (3.0, 4.0)], 0.0);
        assert_eq!(path.to_string(), "M0,0L3,4");
    }

    #[test]
    fn spline_passes_through_every_point() {
        let points = [(0.0, 0.0), (10.0, 5.0), (20.0, -5.0), (30.0, 0.0)];
        let path = cardinal(&points, 0.0);
        let ends: Vec<(f64, f64)> = path
            .commands()
            .iter()
            .filter_map(|c| match *c {
                PathCommand::MoveTo(x, y) | PathCommand::CubicTo(_, _, _, _, x, y) => Some((x, y)),
                _ => None,
            })
            .collect();
        assert_eq!(ends, points.to_vec());
    }

    #[test]
    fn first_segment_control_point_mirrors_neighbours() {
        let path = cardinal(&[(0.0, 0.0), (6.0, 0.0), (12.0, 6.0)], 0.0);
        match path.commands()[1] {
            PathCommand::CubicTo(x1, y1, x2, y2, x, y) => {
                assert_eq!((x1, y1), (0.0, 0.0));
                assert_eq!((x2, y2), (4.0, -1.0));
                assert_eq!((x, y), (6.0, 0.0));
            }
            other => panic!("expected cubic, got {:?}", other),
        }
    }

    #[test]
    fn flatten_samples_curves() {
        let path = cardinal(&[(0.0, 0.0), (6.0, 0.0), (12.0, 6.0)], 0.0);
        let lines = path.flatten(4);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 1 + 2 * 4);
        assert_eq!(lines[0].last(), Some(&(12.0, 6.0)));
    }
}

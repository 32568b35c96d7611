use std::f64::consts::PI;

use super::PathData;

/// Marker shapes centred on the origin, sized by area in square pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Symbol {
    Diamond,
    Circle,
}

impl Symbol {
    pub fn path(&self, area: f64) -> PathData {
        let area = area.max(0.0);
        let mut path = PathData::new();
        match self {
            Symbol::Diamond => {
                // Rhombus with a 60° waist, half-diagonals y and x = y·tan(30°)
                let tan30 = (1.0f64 / 3.0).sqrt();
                let y = (area / (2.0 * tan30)).sqrt();
                let x = y * tan30;
                path.move_to(0.0, -y);
                path.line_to(x, 0.0);
                path.line_to(0.0, y);
                path.line_to(-x, 0.0);
                path.close();
            }
            Symbol::Circle => {
                let r = (area / PI).sqrt();
                path.move_to(r, 0.0);
                path.arc_to(r, -r, 0.0);
                path.arc_to(r, r, 0.0);
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::curve::PathCommand;

    #[test]
    fn diamond_area_matches_request() {
        let path = Symbol::Diamond.path(32.0);
        let (x, y) = match (path.commands()[1], path.commands()[2]) {
            (PathCommand::LineTo(x, _), PathCommand::LineTo(_, y)) => (x, y),
            other => panic!("unexpected commands {:?}", other),
        };
        // Rhombus area is half the product of its diagonals
        let area = (2.0 * x) * (2.0 * y) / 2.0;
        assert!((area - 32.0).abs() < 1e-9);
    }

    #[test]
    fn circle_is_two_arcs() {
        let path = Symbol::Circle.path(80.0);
        let r = (80.0 / PI).sqrt();
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(r, 0.0),
                PathCommand::ArcTo { radius: r, x: -r, y: 0.0 },
                PathCommand::ArcTo { radius: r, x: r, y: 0.0 },
            ]
        );
    }
}

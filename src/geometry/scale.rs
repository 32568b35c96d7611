/// Linear mapping from a data domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        // A collapsed domain maps everything to the start of the range
        if span == 0.0 {
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_linearly() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 200.0));
        assert_eq!(scale.apply(0.0), 0.0);
        assert_eq!(scale.apply(5.0), 100.0);
        // Values past the domain extrapolate
        assert_eq!(scale.apply(16.0), 320.0);
    }

    #[test]
    fn range_update_rescales_proportionally() {
        let mut scale = LinearScale::new((0.0, 10.0), (0.0, 200.0));
        let before = scale.apply(7.0);
        scale.set_range((0.0, 300.0));
        assert!((scale.apply(7.0) / before - 1.5).abs() < 1e-12);
    }

    #[test]
    fn collapsed_domain_does_not_divide_by_zero() {
        let scale = LinearScale::new((3.0, 3.0), (0.0, 100.0));
        assert_eq!(scale.apply(3.0), 0.0);
    }
}

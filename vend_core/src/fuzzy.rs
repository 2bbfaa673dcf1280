//! Three-term linguistic partitions and the fuzzy AND.

/// Degrees of one input in its three linguistic terms, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Degrees {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

/// Piecewise-linear partition of an axis into low / mid / high terms.
///
/// `low` is 1 up to `low_edge` and ramps to 0 at `center`; `mid` ramps up
/// from `low_edge` to `center` and down to `high_edge`; `high` ramps up from
/// `center` and saturates at 1 from `high_edge` on. Both ramps are `ramp`
/// wide. The width is stored instead of derived so that e.g. `0.3 - 0.1`
/// (which is not `0.2` in binary64) never leaks into the slopes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partition {
    pub low_edge: f64,
    pub center: f64,
    pub high_edge: f64,
    pub ramp: f64,
}

impl Partition {
    pub const fn new(low_edge: f64, center: f64, high_edge: f64, ramp: f64) -> Self {
        Self {
            low_edge,
            center,
            high_edge,
            ramp,
        }
    }

    #[inline]
    pub fn low(&self, x: f64) -> f64 {
        if x <= self.low_edge {
            1.0
        } else if x <= self.center {
            (self.center - x) / self.ramp
        } else {
            0.0
        }
    }

    #[inline]
    pub fn mid(&self, x: f64) -> f64 {
        if x <= self.low_edge {
            0.0
        } else if x <= self.center {
            (x - self.low_edge) / self.ramp
        } else if x <= self.high_edge {
            (self.high_edge - x) / self.ramp
        } else {
            0.0
        }
    }

    #[inline]
    pub fn high(&self, x: f64) -> f64 {
        if x <= self.center {
            0.0
        } else if x <= self.high_edge {
            (x - self.center) / self.ramp
        } else {
            1.0
        }
    }

    pub fn degrees(&self, x: f64) -> Degrees {
        Degrees {
            low: self.low(x),
            mid: self.mid(x),
            high: self.high(x),
        }
    }
}

/// Fuzzy conjunction (minimum t-norm).
#[inline]
pub fn and(a: f64, b: f64) -> f64 {
    a.min(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIB: Partition = Partition::new(5.0, 15.0, 25.0, 10.0);

    #[test]
    fn shoulders_saturate_outside_the_ramps() {
        assert_eq!(VIB.degrees(0.0), Degrees { low: 1.0, mid: 0.0, high: 0.0 });
        assert_eq!(VIB.degrees(5.0), Degrees { low: 1.0, mid: 0.0, high: 0.0 });
        assert_eq!(VIB.degrees(25.0), Degrees { low: 0.0, mid: 0.0, high: 1.0 });
        assert_eq!(VIB.degrees(1e6), Degrees { low: 0.0, mid: 0.0, high: 1.0 });
    }

    #[test]
    fn ramps_overlap_linearly() {
        let d = VIB.degrees(10.0);
        assert_eq!(d.low, 0.5);
        assert_eq!(d.mid, 0.5);
        assert_eq!(d.high, 0.0);

        let d = VIB.degrees(15.0);
        assert_eq!(d, Degrees { low: 0.0, mid: 1.0, high: 0.0 });

        let d = VIB.degrees(20.0);
        assert_eq!(d.mid, 0.5);
        assert_eq!(d.high, 0.5);
    }

    #[test]
    fn stored_ramp_keeps_reference_arithmetic() {
        let w = Partition::new(0.1, 0.3, 0.5, 0.2);
        assert_eq!(w.low(0.25), (0.3 - 0.25) / 0.2);
        assert_eq!(w.mid(0.25), (0.25 - 0.1) / 0.2);
        assert_eq!(w.high(0.25), 0.0);
    }

    #[test]
    fn and_is_minimum() {
        assert_eq!(and(0.25, 1.0), 0.25);
        assert_eq!(and(0.0, 0.7), 0.0);
    }
}

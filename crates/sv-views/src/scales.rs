//! Value-to-pixel mappings used by the bubble and scatter views

/// `sqrt` scale from `[0, domain_max]` onto `[range_min, range_max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    domain_max: f64,
    range: (f32, f32),
}

impl SqrtScale {
    pub fn new(domain_max: f64, range_min: f32, range_max: f32) -> Self {
        let domain_max = if domain_max.is_finite() && domain_max > 0.0 { domain_max } else { 1.0 };
        Self {
            domain_max,
            range: (range_min, range_max),
        }
    }

    /// Map `value`, clamping to the output range.
    pub fn map(&self, value: f64) -> f32 {
        let t = (value.max(0.0) / self.domain_max).sqrt().clamp(0.0, 1.0) as f32;
        self.range.0 + (self.range.1 - self.range.0) * t
    }
}

/// Piecewise-linear scale from `(low, mid, high)` onto `[0, 1]` with 0.5 at `mid`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergingScale {
    low: f64,
    mid: f64,
    high: f64,
}

impl DivergingScale {
    pub fn new(low: f64, mid: f64, high: f64) -> Self {
        Self { low, mid, high }
    }

    /// Domain centred on the midpoint of `low` and `high`.
    pub fn symmetric(low: f64, high: f64) -> Self {
        Self::new(low, (low + high) / 2.0, high)
    }

    pub fn domain(&self) -> (f64, f64, f64) {
        (self.low, self.mid, self.high)
    }

    pub fn ratio(&self, value: f64) -> f32 {
        if !value.is_finite() {
            return 0.5;
        }
        let t = if value <= self.mid {
            let span = self.mid - self.low;
            if span <= 0.0 { 0.5 } else { 0.5 * (value - self.low) / span }
        } else {
            let span = self.high - self.mid;
            if span <= 0.0 { 0.5 } else { 0.5 + 0.5 * (value - self.mid) / span }
        };
        t.clamp(0.0, 1.0) as f32
    }
}

/// Target horizontal position (fraction of the panel width) for a review
/// ratio, splitting `[low, high]` into five equal bands.
pub fn five_band_position(ratio: f64, low: f64, high: f64) -> f32 {
    let step = (high - low) / 5.0;
    if ratio > high - step {
        0.9
    } else if ratio > high - 2.0 * step {
        0.7
    } else if ratio < low + step {
        0.1
    } else if ratio < low + 2.0 * step {
        0.3
    } else {
        0.5
    }
}

/// Target horizontal position for an individual game's review ratio.
pub fn three_band_position(ratio: f64, low_cut: f64, high_cut: f64) -> f32 {
    if ratio > high_cut {
        0.75
    } else if ratio < low_cut {
        0.25
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_scale() {
        let scale = SqrtScale::new(400.0, 20.0, 60.0);
        assert_eq!(scale.map(0.0), 20.0);
        assert_eq!(scale.map(100.0), 40.0);
        assert_eq!(scale.map(400.0), 60.0);
        assert_eq!(scale.map(1000.0), 60.0);
    }

    #[test]
    fn test_sqrt_scale_degenerate_domain() {
        let scale = SqrtScale::new(0.0, 20.0, 50.0);
        assert_eq!(scale.map(0.0), 20.0);
    }

    #[test]
    fn test_diverging_midpoint() {
        let scale = DivergingScale::new(0.5, 0.75, 0.992);
        assert_eq!(scale.ratio(0.75), 0.5);
        assert_eq!(scale.ratio(0.5), 0.0);
        assert_eq!(scale.ratio(0.992), 1.0);
        assert_eq!(scale.ratio(0.1), 0.0);
        assert_eq!(scale.ratio(f64::NAN), 0.5);
    }

    #[test]
    fn test_five_bands() {
        let (low, high) = (0.5, 0.992);
        assert_eq!(five_band_position(0.99, low, high), 0.9);
        assert_eq!(five_band_position(0.85, low, high), 0.7);
        assert_eq!(five_band_position(0.75, low, high), 0.5);
        assert_eq!(five_band_position(0.65, low, high), 0.3);
        assert_eq!(five_band_position(0.55, low, high), 0.1);
    }

    #[test]
    fn test_three_bands() {
        assert_eq!(three_band_position(0.9, 0.666, 0.83), 0.75);
        assert_eq!(three_band_position(0.7, 0.666, 0.83), 0.5);
        assert_eq!(three_band_position(0.2, 0.666, 0.83), 0.25);
    }
}

//! Colour ramps and the value-to-colour scales used by the panels.

/// Chlorophyll colorbar ticks (mg/m³).
pub const CHLOROPHYLL_TICKS: [f64; 5] = [0.01, 0.1, 1.0, 10.0, 100.0];

/// A piecewise-linear colour ramp over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colormap {
    stops: &'static [(u8, u8, u8)],
}

/// Dark blue through purple and orange to pale yellow, for temperature.
pub const THERMAL: Colormap = Colormap {
    stops: &[
        (4, 35, 51),
        (23, 51, 122),
        (85, 59, 157),
        (129, 79, 143),
        (175, 95, 130),
        (222, 112, 101),
        (249, 146, 66),
        (246, 196, 65),
        (232, 250, 91),
    ],
};

/// Pale green to dark green, for chlorophyll.
pub const ALGAE: Colormap = Colormap {
    stops: &[
        (215, 249, 208),
        (170, 221, 160),
        (121, 196, 113),
        (71, 170, 76),
        (22, 142, 54),
        (15, 111, 55),
        (24, 81, 45),
        (25, 52, 30),
        (18, 36, 20),
    ],
};

impl Colormap {
    /// Colour at `t`, clamped to the ends of the ramp.
    pub fn color(&self, t: f64) -> (u8, u8, u8) {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = (self.stops.len() - 1) as f64;
        let position = t * segments;
        let lower = (position.floor() as usize).min(self.stops.len() - 2);
        let frac = position - lower as f64;

        let (r0, g0, b0) = self.stops[lower];
        let (r1, g1, b1) = self.stops[lower + 1];
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;

        (lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
    }
}

/// Maps data values onto `[0, 1]` before a colour is looked up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorScale {
    Linear { min: f64, max: f64 },
    Log { min: f64, max: f64 },
}

impl ColorScale {
    /// Position of `value` on the scale, clipped to `[0, 1]`. Values a log scale cannot
    /// represent (non-positive) and NaN yield `None`.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        match *self {
            ColorScale::Linear { .. } => Some(self.position(value).clamp(0.0, 1.0)),
            ColorScale::Log { .. } if value <= 0.0 => None,
            ColorScale::Log { .. } => Some(self.position(value).clamp(0.0, 1.0)),
        }
    }

    /// Unclipped position of `value` on the scale.
    pub fn position(&self, value: f64) -> f64 {
        match *self {
            ColorScale::Linear { min, max } => (value - min) / (max - min),
            ColorScale::Log { min, max } => (value / min).log10() / (max / min).log10(),
        }
    }
}

/// Upper bound on the ticks of one colorbar.
pub const MAX_TICKS: usize = 100;

/// Number of ticks `linear_ticks` yields before the cap.
pub fn linear_tick_count(min: f64, max: f64, step: f64) -> f64 {
    ((max + 0.01 - min) / step).ceil()
}

/// Ticks from `min` up to `max` (inclusive, with a 0.01 tolerance) every `step`, at most
/// [`MAX_TICKS`] of them.
pub fn linear_ticks(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || max < min {
        return Vec::new();
    }
    let count = linear_tick_count(min, max, step).min(MAX_TICKS as f64) as usize;
    (0..count).map(|i| min + i as f64 * step).collect()
}

/// Tick label text; whole numbers print without a fraction.
pub fn format_tick(value: f64) -> String {
    format!("{}", value)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_span_sst_range_in_steps_of_two() {
        let ticks = linear_ticks(16.0, 30.0, 2.0);

        assert_eq!(
            ticks,
            vec![16.0, 18.0, 20.0, 22.0, 24.0, 26.0, 28.0, 30.0]
        );
    }

    #[test]
    fn should_not_overshoot_uneven_range() {
        assert_eq!(linear_ticks(16.0, 29.0, 2.0).last(), Some(&28.0));
        assert!(linear_ticks(16.0, 30.0, 0.0).is_empty());
    }

    #[test]
    fn should_cap_tick_count_for_tiny_steps() {
        let ticks = linear_ticks(16.0, 30.0, 1e-15);

        assert_eq!(ticks.len(), MAX_TICKS);
        assert_eq!(ticks[0], 16.0);
    }

    #[test]
    fn should_place_chlorophyll_ticks_evenly_on_log_scale() {
        let scale = ColorScale::Log { min: 0.01, max: 100.0 };
        let positions: Vec<f64> = CHLOROPHYLL_TICKS.iter().map(|&t| scale.position(t)).collect();

        for (position, expected) in positions.iter().zip([0.0, 0.25, 0.5, 0.75, 1.0]) {
            assert!((position - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn should_clip_and_reject_values() {
        let sst = ColorScale::Linear { min: 16.0, max: 30.0 };
        assert_eq!(sst.normalize(23.0), Some(0.5));
        assert_eq!(sst.normalize(40.0), Some(1.0));
        assert_eq!(sst.normalize(f64::NAN), None);

        let chl = ColorScale::Log { min: 0.01, max: 100.0 };
        assert_eq!(chl.normalize(0.0), None);
        assert_eq!(chl.normalize(0.001), Some(0.0));
    }

    #[test]
    fn should_interpolate_ramp_ends() {
        assert_eq!(THERMAL.color(0.0), (4, 35, 51));
        assert_eq!(THERMAL.color(1.0), (232, 250, 91));
        assert_eq!(ALGAE.color(-2.0), (215, 249, 208));
        assert_eq!(ALGAE.color(0.0625), (193, 235, 184));
    }

    #[test]
    fn should_format_ticks() {
        let labels: Vec<String> = CHLOROPHYLL_TICKS.iter().map(|&t| format_tick(t)).collect();

        assert_eq!(labels, vec!["0.01", "0.1", "1", "10", "100"]);
        assert_eq!(format_tick(16.0), "16");
    }
}

//! Measured quantity and its physical validity threshold.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The quantity a dataset measures.
pub enum FieldKind {
    /// Sea-surface temperature in °C.
    SeaSurfaceTemperature,
    /// Chlorophyll-a concentration in mg/m³.
    Chlorophyll,
}

impl FieldKind {
    /// Smallest physically plausible value; anything below is masked.
    pub fn threshold(&self) -> f64 {
        match self {
            FieldKind::SeaSurfaceTemperature => -5.0,
            FieldKind::Chlorophyll => 0.0,
        }
    }

    pub fn is_valid(&self, value: f64) -> bool {
        !value.is_nan() && value >= self.threshold()
    }

    pub fn units(&self) -> &'static str {
        match self {
            FieldKind::SeaSurfaceTemperature => "°C",
            FieldKind::Chlorophyll => "mg/m³",
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_apply_thresholds() {
        let sst = FieldKind::SeaSurfaceTemperature;
        assert!(sst.is_valid(-5.0));
        assert!(!sst.is_valid(-5.01));
        assert!(!sst.is_valid(f64::NAN));

        let chl = FieldKind::Chlorophyll;
        assert!(chl.is_valid(0.0));
        assert!(!chl.is_valid(-0.001));
    }
}

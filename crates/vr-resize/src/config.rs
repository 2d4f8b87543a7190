use vr_core::{Error, Result};

use crate::tier::Tier;

/// Cubic convolution coefficient used unless configured otherwise.
pub const DEFAULT_CUBIC_A: f32 = -0.5;

/// Tuning knobs for resampler construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResizeConfig {
    /// Most specialized tier the dispatcher may select. Tiers listed before
    /// it in [`Tier::ORDER`] are skipped.
    pub max_tier: Tier,
    /// Keys cubic kernel coefficient, in `[-0.75, 0.0]`.
    pub cubic_a: f32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            max_tier: Tier::Avx2,
            cubic_a: DEFAULT_CUBIC_A,
        }
    }
}

impl ResizeConfig {
    pub fn with_max_tier(mut self, tier: Tier) -> Self {
        self.max_tier = tier;
        self
    }

    pub fn with_cubic_a(mut self, a: f32) -> Self {
        self.cubic_a = a;
        self
    }

    /// The fixed-point bicubic accumulator is 32-bit; coefficients more
    /// negative than -0.75 can overflow it.
    pub(crate) fn validate(&self) -> Result<()> {
        if !(-0.75..=0.0).contains(&self.cubic_a) {
            return Err(Error::InvalidConfiguration(
                "cubic coefficient must be in [-0.75, 0.0]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_CUBIC_A, ResizeConfig};
    use crate::tier::Tier;

    #[test]
    fn default_allows_every_tier() {
        let cfg = ResizeConfig::default();
        assert_eq!(cfg.max_tier, Tier::Avx2);
        assert_eq!(cfg.cubic_a, DEFAULT_CUBIC_A);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn cubic_coefficient_range_is_enforced() {
        assert!(ResizeConfig::default().with_cubic_a(-0.75).validate().is_ok());
        assert!(ResizeConfig::default().with_cubic_a(-1.0).validate().is_err());
        assert!(ResizeConfig::default().with_cubic_a(0.1).validate().is_err());
        assert!(ResizeConfig::default().with_cubic_a(f32::NAN).validate().is_err());
    }
}

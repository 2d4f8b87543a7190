//! Tier selection.
//!
//! Tiers are tried most specialized first. A tier is taken when the probe
//! reports it, it does not precede [`ResizeConfig::max_tier`] in
//! [`Tier::ORDER`], and its geometry preconditions hold for the parameters
//! tagged with its width.
//! Scalar accepts everything, so selection only fails on a bad config.

use tracing::{debug, trace};
use vr_core::{Error, Result};

use crate::config::ResizeConfig;
use crate::param::{ResizeParams, Variant};
use crate::resampler::Resampler;
use crate::tier::{CapabilityProbe, HostProbe, Tier};

struct TierEntry {
    tier: Tier,
    accepts: fn(&ResizeParams) -> bool,
}

// Tiers only change the lane width of the vertical blend. The width checks
// mirror the original engine's kernel preconditions, even where the code run
// is the same on every tier.
const TIERS: &[TierEntry] = &[
    TierEntry {
        tier: Tier::Avx2,
        accepts: wide_accepts,
    },
    TierEntry {
        tier: Tier::Sse41,
        accepts: narrow_accepts,
    },
    TierEntry {
        tier: Tier::Neon,
        accepts: narrow_accepts,
    },
    TierEntry {
        tier: Tier::Scalar,
        accepts: |_| true,
    },
];

/// 256-bit kernels need at least one full vector of destination samples.
fn wide_accepts(p: &ResizeParams) -> bool {
    match p.variant() {
        Variant::Nearest | Variant::ShortBilinear => p.dst_width() >= p.f(),
        Variant::ByteBilinear | Variant::ByteBilinearCompat => p.dst_width() >= p.a(),
        _ => true,
    }
}

/// 128-bit kernels only constrain the byte bilinear paths.
fn narrow_accepts(p: &ResizeParams) -> bool {
    match p.variant() {
        Variant::ByteBilinear | Variant::ByteBilinearCompat => p.dst_width() >= p.a(),
        _ => true,
    }
}

/// Builds a resampler for the host with the default configuration.
pub fn create_resampler(params: ResizeParams) -> Result<Resampler> {
    create_resampler_with(params, &HostProbe, &ResizeConfig::default())
}

/// Builds a resampler with an explicit capability probe and configuration.
pub fn create_resampler_with(
    params: ResizeParams,
    probe: &dyn CapabilityProbe,
    config: &ResizeConfig,
) -> Result<Resampler> {
    config.validate()?;

    for entry in TIERS {
        let tier = entry.tier;
        if tier.rank() < config.max_tier.rank() {
            trace!(tier = tier.name(), "tier above configured maximum");
            continue;
        }
        if !probe.supports(tier) {
            trace!(tier = tier.name(), "tier not supported by host");
            continue;
        }
        let tagged = params.with_align(tier.align());
        if !(entry.accepts)(&tagged) {
            trace!(
                tier = tier.name(),
                variant = ?tagged.variant(),
                dst_width = tagged.dst_width(),
                "tier preconditions not met"
            );
            continue;
        }

        debug!(
            tier = tier.name(),
            variant = ?tagged.variant(),
            element = tagged.element_type().name(),
            channels = tagged.channels(),
            src = ?(tagged.src_width(), tagged.src_height()),
            dst = ?(tagged.dst_width(), tagged.dst_height()),
            "resampler created"
        );
        return Ok(Resampler::new(tagged, tier, config));
    }

    Err(Error::InvalidConfiguration("no capability tier accepts the geometry"))
}

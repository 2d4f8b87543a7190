//! Capability tiers and the runtime probe that gates them.

/// One hardware-capability-gated execution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tier {
    /// 256-bit lanes, x86_64 AVX2.
    Avx2,
    /// 128-bit lanes, x86_64 SSE4.1.
    Sse41,
    /// 128-bit lanes, aarch64 NEON.
    Neon,
    /// Portable scalar code. Always available and accepts every geometry.
    Scalar,
}

impl Tier {
    /// Dispatch order, most specialized first.
    pub const ORDER: [Tier; 4] = [Self::Avx2, Self::Sse41, Self::Neon, Self::Scalar];

    /// Position in [`Tier::ORDER`].
    pub const fn rank(self) -> usize {
        match self {
            Self::Avx2 => 0,
            Self::Sse41 => 1,
            Self::Neon => 2,
            Self::Scalar => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Avx2 => "avx2",
            Self::Sse41 => "sse4.1",
            Self::Neon => "neon",
            Self::Scalar => "scalar",
        }
    }

    /// Vector width in bytes.
    pub const fn align(self) -> usize {
        match self {
            Self::Avx2 => 32,
            Self::Sse41 | Self::Neon => 16,
            Self::Scalar => 1,
        }
    }

    pub(crate) const fn lanes(self) -> Lanes {
        match self {
            Self::Avx2 => Lanes::X8,
            Self::Sse41 | Self::Neon => Lanes::X4,
            Self::Scalar => Lanes::Scalar,
        }
    }
}

/// Number of 32-bit lanes a kernel processes per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lanes {
    Scalar,
    X4,
    X8,
}

/// Answers "is this capability tier usable on this machine".
pub trait CapabilityProbe {
    fn supports(&self, tier: Tier) -> bool;
}

/// Probe backed by the standard library's runtime feature detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProbe;

impl CapabilityProbe for HostProbe {
    fn supports(&self, tier: Tier) -> bool {
        match tier {
            Tier::Avx2 => has_avx2(),
            Tier::Sse41 => has_sse41(),
            Tier::Neon => has_neon(),
            Tier::Scalar => true,
        }
    }
}

/// Probe that reports a fixed set of tiers. Scalar is always reported.
#[derive(Debug, Clone, Default)]
pub struct FixedProbe {
    tiers: Vec<Tier>,
}

impl FixedProbe {
    pub fn new(tiers: &[Tier]) -> Self {
        Self {
            tiers: tiers.to_vec(),
        }
    }

    /// Every tier, regardless of the host. Vector tiers fall back to
    /// portable lane code when the matching instructions are missing, so
    /// this is safe on any machine.
    pub fn all() -> Self {
        Self::new(&Tier::ORDER)
    }
}

impl CapabilityProbe for FixedProbe {
    fn supports(&self, tier: Tier) -> bool {
        tier == Tier::Scalar || self.tiers.contains(&tier)
    }
}

#[cfg(target_arch = "x86_64")]
pub(crate) fn has_avx2() -> bool {
    std::arch::is_x86_feature_detected!("avx2")
}

#[cfg(not(target_arch = "x86_64"))]
pub(crate) fn has_avx2() -> bool {
    false
}

#[cfg(target_arch = "x86_64")]
fn has_sse41() -> bool {
    std::arch::is_x86_feature_detected!("sse4.1")
}

#[cfg(not(target_arch = "x86_64"))]
fn has_sse41() -> bool {
    false
}

#[cfg(target_arch = "aarch64")]
fn has_neon() -> bool {
    std::arch::is_aarch64_feature_detected!("neon")
}

#[cfg(not(target_arch = "aarch64"))]
fn has_neon() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::{CapabilityProbe, FixedProbe, HostProbe, Lanes, Tier};

    #[test]
    fn host_probe_always_supports_scalar() {
        assert!(HostProbe.supports(Tier::Scalar));
        #[cfg(not(target_arch = "x86_64"))]
        {
            assert!(!HostProbe.supports(Tier::Avx2));
            assert!(!HostProbe.supports(Tier::Sse41));
        }
        #[cfg(not(target_arch = "aarch64"))]
        assert!(!HostProbe.supports(Tier::Neon));
    }

    #[test]
    fn fixed_probe_reports_listed_tiers_plus_scalar() {
        let probe = FixedProbe::new(&[Tier::Sse41]);
        assert!(probe.supports(Tier::Sse41));
        assert!(probe.supports(Tier::Scalar));
        assert!(!probe.supports(Tier::Avx2));
        assert!(!probe.supports(Tier::Neon));
    }

    #[test]
    fn rank_follows_dispatch_order() {
        for (i, tier) in Tier::ORDER.into_iter().enumerate() {
            assert_eq!(tier.rank(), i);
        }
    }

    #[test]
    fn widths_and_lanes_agree() {
        for tier in Tier::ORDER {
            let lanes = match tier.lanes() {
                Lanes::Scalar => 1,
                Lanes::X4 => 4,
                Lanes::X8 => 8,
            };
            assert_eq!(lanes * 4, tier.align().max(4));
        }
    }
}

const DEFAULT_LODGEMENT_THRESHOLD: u8 = 90;
const DEFAULT_VARIATION_WEIGHT_PCT: u8 = 50;
const DEFAULT_TARGET_DAYS: u32 = 40;

/// Tunable dials for stage gating and compliance scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    lodgement_threshold: u8,
    variation_weight_pct: u8,
    default_target_days: u32,
}

impl LifecyclePolicy {
    pub fn new(
        lodgement_threshold: u8,
        variation_weight_pct: u8,
        default_target_days: u32,
    ) -> Self {
        Self {
            lodgement_threshold: lodgement_threshold.min(100),
            variation_weight_pct: variation_weight_pct.min(100),
            default_target_days,
        }
    }

    /// Minimum compliance score required before a project may be lodged.
    pub fn lodgement_threshold(&self) -> u8 {
        self.lodgement_threshold
    }

    /// Credit granted to a `variation` compliance item, as a percentage of a
    /// fully compliant one.
    pub fn variation_weight_pct(&self) -> u8 {
        self.variation_weight_pct
    }

    /// Statutory assessment window given to newly created projects.
    pub fn default_target_days(&self) -> u32 {
        self.default_target_days
    }
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_LODGEMENT_THRESHOLD,
            DEFAULT_VARIATION_WEIGHT_PCT,
            DEFAULT_TARGET_DAYS,
        )
    }
}

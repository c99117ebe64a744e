#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use walkbox_nav::ScanOrder;

use crate::policy::{PolicyKind, WalkSpeed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WalkConfig {
    /// Walk arithmetic used by new actors.
    pub policy: PolicyKind,
    /// Initial walk speed (pixels per tick at full scale).
    pub speed: WalkSpeed,
    /// Box scan order used when clamping destinations and placements.
    pub scan_order: ScanOrder,
    /// Cap on box-to-box resolution steps taken within one tick.
    pub max_resolve_iterations: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::ScaledStep,
            speed: WalkSpeed::default(),
            scan_order: ScanOrder::Thresholded,
            max_resolve_iterations: 64,
        }
    }
}

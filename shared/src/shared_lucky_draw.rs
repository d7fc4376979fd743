use serde::{Serialize, Deserialize};

/// A promotional voucher as supplied by the catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Voucher {
    pub id: String,
    /// Discount magnitude (percentage or currency amount) shown on the segment.
    pub display_value: f64,
    pub valid_from_epoch_ms: i64,
    pub valid_to_epoch_ms: i64,
    pub status: VoucherStatus,
    /// Remaining stock; None means stock is not tracked.
    pub stock: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum VoucherStatus {
    Active,
    Inactive,
}

impl Voucher {
    /// Whether this voucher may participate in a draw right now.
    /// The validity window is inclusive on both ends.
    pub fn is_eligible(&self, now_epoch_ms: i64) -> bool {
        self.status == VoucherStatus::Active
            && self.valid_from_epoch_ms <= now_epoch_ms
            && now_epoch_ms <= self.valid_to_epoch_ms
            && self.stock.map_or(true, |s| s > 0)
    }
}

/// Rotation parameters handed to the animation driver for one spin.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinPlan {
    pub winner_index: usize,
    pub segment_angle_deg: f64,
    /// Center of the winning segment, measured from the segment-0 reference.
    pub target_angle_deg: f64,
    pub full_rotation_count: u32,
    /// Total clockwise rotation that parks the winning segment under the pointer.
    pub final_angle_deg: f64,
    pub duration_ms: u32,
}

/// The committed outcome of a completed spin.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinResult {
    pub voucher: Voucher,
    pub won_at_epoch_ms: i64,
}

/// Snapshot of the cooldown for UI polling.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct CooldownStatus {
    pub in_cooldown: bool,
    pub remaining_ms: i64,
}

// Constants for the spin animation and the play limit
pub const SPIN_DURATION_MS: u32 = 3000; // Duration of spin animation in milliseconds
pub const MIN_FULL_ROTATIONS: u32 = 5;  // Minimum number of full rotations
pub const MAX_FULL_ROTATIONS: u32 = 7;  // Maximum number of full rotations
pub const DRAW_COOLDOWN_MS: i64 = 86_400_000; // 24 hour cooldown between draws

// Format remaining cooldown time for display
pub fn format_cooldown_time(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

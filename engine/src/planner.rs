use rand::Rng;
use shared::shared_lucky_draw::{
    SpinPlan, MAX_FULL_ROTATIONS, MIN_FULL_ROTATIONS, SPIN_DURATION_MS,
};

/// Computes the rotation parameters that land the pointer on the winning
/// segment. The full-rotation count is the one random input; it adds suspense
/// without affecting which segment wins.
pub fn plan_spin(winner_index: usize, candidate_count: usize, rng: &mut impl Rng) -> SpinPlan {
    let rotations = rng.gen_range(MIN_FULL_ROTATIONS..=MAX_FULL_ROTATIONS);
    plan_with_rotations(winner_index, candidate_count, rotations)
}

fn plan_with_rotations(winner_index: usize, candidate_count: usize, rotations: u32) -> SpinPlan {
    let segment_angle_deg = 360.0 / candidate_count as f64;
    let target_angle_deg = winner_index as f64 * segment_angle_deg + segment_angle_deg / 2.0;
    // The wheel turns while the pointer stays fixed at 0 degrees: rotating by
    // theta moves the segment at target to (target - theta) mod 360, so the
    // pointer lands on it at theta = 360 - target.
    let final_angle_deg = rotations as f64 * 360.0 + (360.0 - target_angle_deg);

    SpinPlan {
        winner_index,
        segment_angle_deg,
        target_angle_deg,
        full_rotation_count: rotations,
        final_angle_deg,
        duration_ms: SPIN_DURATION_MS,
    }
}

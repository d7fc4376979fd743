/// Maps a voucher's discount magnitude to a draw weight.
/// Bigger discounts are rarer, so the weight is inversely tiered on value.
/// Every input lands in exactly one tier; NaN falls through to the last.
pub fn weight_for(display_value: f64) -> u32 {
    if display_value >= 50.0 {
        5
    } else if display_value >= 30.0 {
        10
    } else if display_value >= 20.0 {
        15
    } else if display_value >= 10.0 {
        25
    } else {
        45
    }
}

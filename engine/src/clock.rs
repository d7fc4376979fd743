use time::OffsetDateTime;

/// Current wall-clock time in epoch milliseconds. The engine never reads the
/// clock itself; every operation takes an explicit `now_epoch_ms` so tests can
/// supply their own. Callers use this at the boundary.
pub fn now_epoch_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

use shared::shared_lucky_draw::{CooldownStatus, SpinResult, DRAW_COOLDOWN_MS};

use crate::store::{CooldownStore, DrawRecord, StoreError};

/// Once-per-window play limit. Ready when no prior draw exists or the window
/// has fully elapsed; Waiting otherwise. The gate owns the persisted record:
/// it is read once at construction and written only through `commit`.
pub struct CooldownGate<S: CooldownStore> {
    store: S,
    record: Option<DrawRecord>,
    cooldown_ms: i64,
    /// Set when the in-memory record is ahead of the durable copy.
    dirty: bool,
}

impl<S: CooldownStore> CooldownGate<S> {
    /// Loads the persisted record (if any) with the standard 24h window.
    pub fn load(store: S) -> Result<Self, StoreError> {
        Self::with_cooldown(store, DRAW_COOLDOWN_MS)
    }

    pub fn with_cooldown(store: S, cooldown_ms: i64) -> Result<Self, StoreError> {
        let record = store.load()?;
        Ok(Self {
            store,
            record,
            cooldown_ms,
            dirty: false,
        })
    }

    pub fn can_draw(&self, now_epoch_ms: i64) -> bool {
        self.remaining_ms(now_epoch_ms) == 0
    }

    /// Milliseconds until the next draw is allowed; 0 when ready. The UI
    /// re-derives this on a periodic tick rather than being pushed updates.
    pub fn remaining_ms(&self, now_epoch_ms: i64) -> i64 {
        match &self.record {
            None => 0,
            Some(record) => {
                (self.cooldown_ms - (now_epoch_ms - record.last_draw_at_epoch_ms)).max(0)
            }
        }
    }

    pub fn status(&self, now_epoch_ms: i64) -> CooldownStatus {
        let remaining_ms = self.remaining_ms(now_epoch_ms);
        CooldownStatus {
            in_cooldown: remaining_ms > 0,
            remaining_ms,
        }
    }

    pub fn draw_count(&self) -> u32 {
        self.record.as_ref().map_or(0, |r| r.draw_count)
    }

    /// The most recently won voucher, surviving restarts, so the user still
    /// sees their prize while the cooldown runs.
    pub fn last_result(&self) -> Option<&SpinResult> {
        self.record.as_ref().map(|r| &r.last_result)
    }

    /// Records a completed draw. The in-memory record transitions first; if
    /// the durable save then fails, the gate stays dirty and the error is
    /// surfaced so the caller can retry via `flush`.
    pub fn commit(&mut self, now_epoch_ms: i64, result: SpinResult) -> Result<(), StoreError> {
        let draw_count = self.draw_count() + 1;
        self.record = Some(DrawRecord {
            last_draw_at_epoch_ms: now_epoch_ms,
            draw_count,
            last_result: result,
        });
        self.dirty = true;
        self.flush()
    }

    /// Retries a pending durable write. No-op when the store is up to date.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(record) = &self.record {
            self.store.save(record)?;
        }
        self.dirty = false;
        Ok(())
    }

    pub fn has_pending_write(&self) -> bool {
        self.dirty
    }

    /// Wipes all draw state, durable copy included. Only for explicit
    /// logout/reset flows.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.store.clear()?;
        self.record = None;
        self.dirty = false;
        Ok(())
    }
}

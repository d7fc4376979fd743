use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::shared_lucky_draw::{SpinPlan, SpinResult, Voucher};

use crate::cooldown::CooldownGate;
use crate::error::DrawError;
use crate::planner::plan_spin;
use crate::selector::{select, DrawCandidateSet};
use crate::store::CooldownStore;

enum Phase {
    Idle,
    Spinning { winner: Voucher, plan: SpinPlan },
}

/// Orchestrates one draw end to end: gate check, weighted selection, spin
/// planning, and the commit once the animation resolves.
///
/// The caller drives the animation with the returned `SpinPlan` and reports
/// the driver's single completion callback through `complete_spin`, on the
/// engine's control thread. At most one draw is in flight per session; while
/// spinning, further draw requests are rejected rather than queued.
///
/// The persisted state changes only in `complete_spin`. If the app dies while
/// a spin is in flight, the gate was never committed and the user may
/// legitimately draw again; that ordering is intentional.
pub struct DrawSession<S: CooldownStore> {
    gate: CooldownGate<S>,
    rng: StdRng,
    phase: Phase,
}

impl<S: CooldownStore> DrawSession<S> {
    pub fn new(gate: CooldownGate<S>) -> Self {
        Self {
            gate,
            rng: StdRng::from_entropy(),
            phase: Phase::Idle,
        }
    }

    /// Deterministic session for tests and replays.
    pub fn with_seed(gate: CooldownGate<S>, seed: u64) -> Self {
        Self {
            gate,
            rng: StdRng::seed_from_u64(seed),
            phase: Phase::Idle,
        }
    }

    /// Starts a draw against the current catalog. On success the session is
    /// spinning and the returned plan goes straight to the animation driver.
    pub fn start_draw(
        &mut self,
        catalog: &[Voucher],
        now_epoch_ms: i64,
    ) -> Result<SpinPlan, DrawError> {
        if matches!(self.phase, Phase::Spinning { .. }) {
            return Err(DrawError::AlreadySpinning);
        }
        if !self.gate.can_draw(now_epoch_ms) {
            return Err(DrawError::CooldownActive {
                remaining_ms: self.gate.remaining_ms(now_epoch_ms),
            });
        }

        let candidates = DrawCandidateSet::build(catalog, now_epoch_ms);
        if candidates.is_empty() {
            return Err(DrawError::NoEligibleVouchers);
        }

        let winner_index = select(&candidates, &mut self.rng)?;
        let plan = plan_spin(winner_index, candidates.len(), &mut self.rng);
        let winner = candidates[winner_index].voucher.clone();

        tracing::info!(
            "🎡 LUCKY DRAW: voucher {} (value {}) selected at index {} of {}",
            winner.id,
            winner.display_value,
            winner_index,
            candidates.len()
        );

        self.phase = Phase::Spinning { winner, plan: plan.clone() };
        Ok(plan)
    }

    /// The animation driver's completion callback, exactly once per spin.
    /// Commits the cooldown and the won voucher as one durable record. A
    /// duplicate callback is rejected and cannot double-count the draw.
    ///
    /// On a persistence failure the in-memory gate has still transitioned and
    /// keeps the result; the error is surfaced so the caller can retry with
    /// `gate_mut().flush()`.
    pub fn complete_spin(&mut self, now_epoch_ms: i64) -> Result<SpinResult, DrawError> {
        let winner = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Spinning { winner, .. } => winner,
            Phase::Idle => return Err(DrawError::InvalidState("no spin in progress")),
        };

        let result = SpinResult {
            voucher: winner,
            won_at_epoch_ms: now_epoch_ms,
        };
        match self.gate.commit(now_epoch_ms, result.clone()) {
            Ok(()) => {
                tracing::info!(
                    "🎡 LUCKY DRAW: committed win of voucher {} (draw #{})",
                    result.voucher.id,
                    self.gate.draw_count()
                );
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(
                    "failed to persist draw of voucher {}: {} (kept in memory, flush to retry)",
                    result.voucher.id,
                    e
                );
                Err(DrawError::Persistence(e))
            }
        }
    }

    /// Abandons an in-flight spin without recording a draw. The gate is left
    /// untouched, so the user keeps their attempt.
    pub fn cancel_spin(&mut self) -> Result<(), DrawError> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Spinning { .. } => Ok(()),
            Phase::Idle => Err(DrawError::InvalidState("no spin in progress")),
        }
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, Phase::Spinning { .. })
    }

    pub fn current_plan(&self) -> Option<&SpinPlan> {
        match &self.phase {
            Phase::Spinning { plan, .. } => Some(plan),
            Phase::Idle => None,
        }
    }

    pub fn gate(&self) -> &CooldownGate<S> {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut CooldownGate<S> {
        &mut self.gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::io;
    use std::rc::Rc;

    use crate::store::{DrawRecord, MemoryStore, StoreError};
    use shared::shared_lucky_draw::{VoucherStatus, DRAW_COOLDOWN_MS};

    fn voucher(id: &str, display_value: f64) -> Voucher {
        Voucher {
            id: id.to_string(),
            display_value,
            valid_from_epoch_ms: 0,
            valid_to_epoch_ms: i64::MAX,
            status: VoucherStatus::Active,
            stock: None,
        }
    }

    fn catalog() -> Vec<Voucher> {
        vec![
            voucher("a", 5.0),
            voucher("b", 15.0),
            voucher("c", 25.0),
            voucher("d", 35.0),
            voucher("e", 55.0),
        ]
    }

    fn session() -> DrawSession<MemoryStore> {
        let gate = CooldownGate::load(MemoryStore::default()).unwrap();
        DrawSession::with_seed(gate, 7)
    }

    /// Store whose saves can be failed on demand from outside the gate.
    #[derive(Clone, Default)]
    struct FlakyStore {
        record: Rc<RefCell<Option<DrawRecord>>>,
        fail_saves: Rc<Cell<bool>>,
    }

    impl CooldownStore for FlakyStore {
        fn load(&self) -> Result<Option<DrawRecord>, StoreError> {
            Ok(self.record.borrow().clone())
        }

        fn save(&mut self, record: &DrawRecord) -> Result<(), StoreError> {
            if self.fail_saves.get() {
                return Err(StoreError::Io(io::Error::new(
                    io::ErrorKind::Other,
                    "disk full",
                )));
            }
            *self.record.borrow_mut() = Some(record.clone());
            Ok(())
        }

        fn clear(&mut self) -> Result<(), StoreError> {
            *self.record.borrow_mut() = None;
            Ok(())
        }
    }

    #[test]
    fn test_full_draw_flow() {
        let mut session = session();
        let plan = session.start_draw(&catalog(), 1_000).unwrap();
        assert!(session.is_spinning());
        assert_eq!(session.current_plan(), Some(&plan));
        assert_eq!(plan.segment_angle_deg, 72.0);
        assert_eq!(plan.duration_ms, 3000);
        assert!(plan.winner_index < 5);

        let result = session.complete_spin(4_000).unwrap();
        assert!(!session.is_spinning());
        assert_eq!(result.won_at_epoch_ms, 4_000);
        assert_eq!(
            result.voucher.id,
            catalog()[plan.winner_index].id
        );
        assert_eq!(session.gate().draw_count(), 1);
        assert_eq!(session.gate().last_result(), Some(&result));
    }

    #[test]
    fn test_rejects_draw_while_spinning() {
        let mut session = session();
        session.start_draw(&catalog(), 1_000).unwrap();
        assert!(matches!(
            session.start_draw(&catalog(), 1_001),
            Err(DrawError::AlreadySpinning)
        ));
        // The in-flight spin is unaffected.
        assert!(session.is_spinning());
    }

    #[test]
    fn test_rejects_draw_during_cooldown() {
        let mut session = session();
        session.start_draw(&catalog(), 1_000).unwrap();
        session.complete_spin(4_000).unwrap();

        match session.start_draw(&catalog(), 5_000) {
            Err(DrawError::CooldownActive { remaining_ms }) => {
                assert_eq!(remaining_ms, DRAW_COOLDOWN_MS - 1_000);
            }
            other => panic!("expected CooldownActive, got {:?}", other.map(|p| p.winner_index)),
        }

        // Once the window elapses the next draw goes through.
        let reopened = 4_000 + DRAW_COOLDOWN_MS;
        assert!(session.start_draw(&catalog(), reopened).is_ok());
    }

    #[test]
    fn test_empty_catalog_leaves_gate_untouched() {
        let mut session = session();
        assert!(matches!(
            session.start_draw(&[], 1_000),
            Err(DrawError::NoEligibleVouchers)
        ));
        assert!(!session.is_spinning());
        assert_eq!(session.gate().draw_count(), 0);
        assert!(session.gate().can_draw(1_000));
    }

    #[test]
    fn test_duplicate_completion_does_not_double_count() {
        let mut session = session();
        session.start_draw(&catalog(), 1_000).unwrap();
        session.complete_spin(4_000).unwrap();

        assert!(matches!(
            session.complete_spin(4_001),
            Err(DrawError::InvalidState(_))
        ));
        assert_eq!(session.gate().draw_count(), 1);
    }

    #[test]
    fn test_completion_without_spin_is_invalid() {
        let mut session = session();
        assert!(matches!(
            session.complete_spin(1_000),
            Err(DrawError::InvalidState(_))
        ));
    }

    #[test]
    fn test_cancel_does_not_commit() {
        let mut session = session();
        session.start_draw(&catalog(), 1_000).unwrap();
        session.cancel_spin().unwrap();

        assert!(!session.is_spinning());
        assert_eq!(session.gate().draw_count(), 0);
        // The attempt was not consumed.
        assert!(session.start_draw(&catalog(), 2_000).is_ok());
    }

    #[test]
    fn test_persistence_failure_keeps_memory_state() {
        let store = FlakyStore::default();
        let fail_saves = store.fail_saves.clone();
        let record = store.record.clone();
        let gate = CooldownGate::load(store).unwrap();
        let mut session = DrawSession::with_seed(gate, 7);

        session.start_draw(&catalog(), 1_000).unwrap();
        fail_saves.set(true);
        let err = session.complete_spin(4_000);
        assert!(matches!(err, Err(DrawError::Persistence(_))));

        // Memory is authoritative: the draw counts and the gate is closed,
        // but nothing reached the store yet.
        assert_eq!(session.gate().draw_count(), 1);
        assert!(!session.gate().can_draw(5_000));
        assert!(session.gate().has_pending_write());
        assert!(record.borrow().is_none());

        // The retry lands the same record.
        fail_saves.set(false);
        session.gate_mut().flush().unwrap();
        assert!(!session.gate().has_pending_write());
        let saved = record.borrow().clone().unwrap();
        assert_eq!(saved.draw_count, 1);
        assert_eq!(saved.last_draw_at_epoch_ms, 4_000);
    }

    #[test]
    fn test_seeded_sessions_agree() {
        let mut a = session();
        let mut b = session();
        let plan_a = a.start_draw(&catalog(), 1_000).unwrap();
        let plan_b = b.start_draw(&catalog(), 1_000).unwrap();
        assert_eq!(plan_a, plan_b);
    }
}

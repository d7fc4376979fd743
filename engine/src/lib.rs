pub mod clock;
pub mod cooldown;
pub mod error;
pub mod planner;
pub mod selector;
pub mod session;
pub mod store;

pub use cooldown::CooldownGate;
pub use error::DrawError;
pub use selector::{DrawCandidateSet, WeightedVoucher};
pub use session::DrawSession;
pub use store::{CooldownStore, DrawRecord, JsonFileStore, MemoryStore, StoreError};

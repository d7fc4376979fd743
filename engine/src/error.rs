use std::fmt;

use crate::store::StoreError;

/// Errors surfaced synchronously by the draw engine's entry points.
/// Presentation (alert, toast, disabled button) is the UI layer's call.
#[derive(Debug)]
pub enum DrawError {
    /// Programmer error: an operation was invoked in a phase that forbids it.
    InvalidState(&'static str),
    /// A draw was requested before the cooldown window elapsed.
    CooldownActive { remaining_ms: i64 },
    /// A draw was requested while a spin is already in flight.
    AlreadySpinning,
    /// The catalog produced no draw candidates.
    NoEligibleVouchers,
    /// The durable write failed; in-memory state is still authoritative.
    Persistence(StoreError),
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::InvalidState(detail) => write!(f, "invalid state: {}", detail),
            DrawError::CooldownActive { remaining_ms } => {
                write!(f, "cooldown active, {} ms remaining", remaining_ms)
            }
            DrawError::AlreadySpinning => write!(f, "a spin is already in progress"),
            DrawError::NoEligibleVouchers => write!(f, "no vouchers are eligible for a draw"),
            DrawError::Persistence(e) => write!(f, "failed to persist draw state: {}", e),
        }
    }
}

impl std::error::Error for DrawError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DrawError::Persistence(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for DrawError {
    fn from(err: StoreError) -> Self {
        DrawError::Persistence(err)
    }
}

use rand::Rng;
use shared::shared_lucky_draw::Voucher;
use shared::weight_table::weight_for;

use crate::error::DrawError;

/// A draw candidate: an eligible voucher plus its weight, derived once per draw.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedVoucher {
    pub voucher: Voucher,
    pub weight: u32,
}

/// The ordered candidates for a single draw. The order must match the order
/// the segments are rendered in, because the winner travels to the animation
/// purely as an index. Immutable for the duration of one draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCandidateSet(Vec<WeightedVoucher>);

impl DrawCandidateSet {
    /// Filters the catalog down to eligible vouchers and derives their
    /// weights, preserving catalog order. A candidate whose derived weight is
    /// not positive is excluded rather than carried with weight zero.
    pub fn build(catalog: &[Voucher], now_epoch_ms: i64) -> Self {
        let candidates = catalog
            .iter()
            .filter(|v| v.is_eligible(now_epoch_ms))
            .filter_map(|v| {
                let weight = weight_for(v.display_value);
                (weight > 0).then(|| WeightedVoucher {
                    voucher: v.clone(),
                    weight,
                })
            })
            .collect();
        Self(candidates)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedVoucher> {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for DrawCandidateSet {
    type Output = WeightedVoucher;

    fn index(&self, index: usize) -> &WeightedVoucher {
        &self.0[index]
    }
}

/// Weighted-random selection of exactly one winner. Draws a uniform roll in
/// `[0, total)` and walks the candidates in order until the running sum covers
/// it, so candidate i wins with probability weight(i)/total.
pub fn select(candidates: &DrawCandidateSet, rng: &mut impl Rng) -> Result<usize, DrawError> {
    if candidates.is_empty() {
        return Err(DrawError::InvalidState("empty candidate set"));
    }
    let total: f64 = candidates.iter().map(|c| c.weight as f64).sum();
    let roll = rng.gen_range(0.0..total);
    Ok(pick_index(candidates, roll))
}

fn pick_index(candidates: &DrawCandidateSet, roll: f64) -> usize {
    let mut acc = 0.0;
    for (i, candidate) in candidates.iter().enumerate() {
        acc += candidate.weight as f64;
        if acc >= roll {
            return i;
        }
    }
    // Float accumulation can leave a roll fractionally past the last
    // cumulative sum; the last candidate takes it.
    candidates.len() - 1
}

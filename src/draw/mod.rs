//! Weighted draw over a snapshot of the prize pool.
//!
//! Each in-stock candidate owns the ticket range `[start, start + weight)` on
//! a line of length `total_weight`; a ticket drawn uniformly from
//! `[0, total_weight)` lands in exactly one range. Zero-stock prizes get no
//! range but keep their position in the display list. When every remaining
//! candidate has weight zero the draw falls back to uniform.
//!
//! The draw has no side effects and knows nothing about codes.

mod random;

use thiserror::Error;

use crate::record::PrizeRecord;

pub use random::{RandomSource, RngSource, ScriptedSource};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("no prize left in stock")]
    Exhausted,
}

/// A pool snapshot plus the names ruled out for this attempt.
#[derive(Debug, Clone, Copy)]
pub struct DrawRequest<'a> {
    pool: &'a [PrizeRecord],
    excluded: &'a [String],
}

impl<'a> DrawRequest<'a> {
    pub fn new(pool: &'a [PrizeRecord]) -> Self {
        Self { pool, excluded: &[] }
    }

    /// Skip these prizes even if the snapshot still shows stock for them.
    pub fn excluding(mut self, excluded: &'a [String]) -> Self {
        self.excluded = excluded;
        self
    }

    /// Position in the full pool and record of every drawable prize.
    pub fn candidates(&self) -> impl Iterator<Item = (usize, &'a PrizeRecord)> + 'a {
        let excluded = self.excluded;
        self.pool
            .iter()
            .enumerate()
            .filter(move |(_, prize)| prize.in_stock() && !excluded.contains(&prize.name))
    }

    pub fn has_candidates(&self) -> bool {
        self.candidates().next().is_some()
    }
}

/// The selected prize and where it sits on the wheel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawResult {
    pub prize: String,
    /// Position of `prize` in `all_names`.
    pub index: usize,
    /// Every prize in the snapshot, in display order, sold-out ones included.
    pub all_names: Vec<String>,
}

impl DrawResult {
    pub fn total_segments(&self) -> usize {
        self.all_names.len()
    }
}

/// Select one in-stock prize with probability proportional to its weight.
pub fn draw<S: RandomSource + ?Sized>(
    request: &DrawRequest<'_>,
    source: &mut S,
) -> Result<DrawResult, DrawError> {
    let candidates: Vec<(usize, &PrizeRecord)> = request.candidates().collect();
    if candidates.is_empty() {
        return Err(DrawError::Exhausted);
    }

    let total: u64 = candidates.iter().map(|(_, p)| u64::from(p.weight)).sum();
    let index = if total == 0 {
        let n = candidates.len() as u64;
        let pick = (source.ticket(n) % n) as usize;
        candidates[pick].0
    } else {
        let ticket = source.ticket(total) % total;
        let mut start = 0u64;
        let mut chosen = candidates[candidates.len() - 1].0;
        for (index, prize) in &candidates {
            let end = start + u64::from(prize.weight);
            if ticket < end {
                chosen = *index;
                break;
            }
            start = end;
        }
        chosen
    };

    Ok(DrawResult {
        prize: request.pool[index].name.clone(),
        index,
        all_names: request.pool.iter().map(|p| p.name.clone()).collect(),
    })
}

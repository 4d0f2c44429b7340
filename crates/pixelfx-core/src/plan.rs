//! Pure pass-planning contracts shared by the backends and their tests.
//!
//! Nothing in this module touches pixels or GL; it fixes the two rules
//! both backends must agree on:
//!
//! - how an ordered filter list is partitioned into passes (fusion), and
//! - how the GPU ping-pong target index advances with each pass.

use std::ops::Range;

/// Capability tag for one filter in an ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// One pixel in, one pixel out; safe to fuse with neighbors.
    Fusable,
    /// Needs whole-image context or multiple passes; a pass boundary.
    Standalone,
}

/// One planned image pass over the filter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pass {
    /// A maximal run of consecutive fusable filters, executed as a single
    /// pixel sweep. Indices into the original filter list.
    Fused(Range<usize>),
    /// A single standalone filter executed as its own full-image pass.
    Standalone(usize),
}

/// Partitions an ordered filter list into passes.
///
/// Consecutive fusable filters collapse into one `Fused` run; every
/// standalone filter is its own pass and acts as a boundary (a later
/// fusable filter never fuses backwards across it). Overall input order is
/// preserved exactly.
pub fn plan_passes(kinds: &[StageKind]) -> Vec<Pass> {
    let mut passes = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, kind) in kinds.iter().enumerate() {
        match kind {
            StageKind::Fusable => {
                run_start.get_or_insert(i);
            }
            StageKind::Standalone => {
                if let Some(start) = run_start.take() {
                    passes.push(Pass::Fused(start..i));
                }
                passes.push(Pass::Standalone(i));
            }
        }
    }
    if let Some(start) = run_start {
        passes.push(Pass::Fused(start..kinds.len()));
    }

    passes
}

/// Ping-pong target parity: "current" and "next" indices alternate
/// strictly by parity of a monotonically increasing pass counter.
///
/// `render` (presentation) must never advance the counter; re-binding a
/// source resets it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassParity {
    passes: u64,
}

impl PassParity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the target holding the latest pass output.
    #[inline]
    pub fn current(&self) -> usize {
        (self.passes % 2) as usize
    }

    /// Index of the target the next pass will write.
    #[inline]
    pub fn next(&self) -> usize {
        1 - self.current()
    }

    /// Completed passes since the source was bound.
    #[inline]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Advances after a pass has been written to `next()`.
    pub fn advance(&mut self) {
        self.passes += 1;
    }

    pub fn reset(&mut self) {
        self.passes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_fusable_is_one_pass() {
        let kinds = [StageKind::Fusable; 4];
        assert_eq!(plan_passes(&kinds), vec![Pass::Fused(0..4)]);
    }

    #[test]
    fn standalone_is_a_pass_boundary() {
        use StageKind::{Fusable as I, Standalone as S};
        // [A, B, C, D] with C standalone: D cannot fuse backwards across C.
        let passes = plan_passes(&[I, I, S, I]);
        assert_eq!(
            passes,
            vec![Pass::Fused(0..2), Pass::Standalone(2), Pass::Fused(3..4)]
        );
    }

    #[test]
    fn consecutive_standalones_stay_separate() {
        use StageKind::Standalone as S;
        assert_eq!(
            plan_passes(&[S, S]),
            vec![Pass::Standalone(0), Pass::Standalone(1)]
        );
    }

    #[test]
    fn empty_list_plans_nothing() {
        assert!(plan_passes(&[]).is_empty());
    }

    #[test]
    fn parity_tracks_pass_count_mod_two() {
        let mut p = PassParity::new();
        assert_eq!(p.current(), 0);
        for n in 1..=5u64 {
            p.advance();
            assert_eq!(p.current(), (n % 2) as usize);
            assert_eq!(p.next(), 1 - p.current());
        }
        p.reset();
        assert_eq!(p.current(), 0);
        assert_eq!(p.passes(), 0);
    }
}

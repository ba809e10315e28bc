//! Bounded virtual index space used to fake an endless strip.
//!
//! The dataset is repeated `multiplier` times end to end. A virtual index maps
//! back to a real item by `index % len`. Because `total` is an exact multiple
//! of `len`, both recentering targets land on the same real item as the
//! boundary slot they replace.

use crate::error::{CarouselError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualSpace {
    len: usize,
    multiplier: usize,
    total: usize,
}

impl VirtualSpace {
    pub fn new(len: usize, multiplier: usize) -> Result<Self> {
        if multiplier == 0 {
            return Err(CarouselError::ZeroMultiplier);
        }
        let total = len
            .checked_mul(multiplier)
            .ok_or(CarouselError::SpaceOverflow { len, multiplier })?;
        Ok(Self {
            len,
            multiplier,
            total,
        })
    }

    pub fn empty(multiplier: usize) -> Self {
        Self {
            len: 0,
            multiplier,
            total: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn multiplier(&self) -> usize {
        self.multiplier
    }

    /// Number of virtual slots, `len × multiplier`.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Where a freshly assigned dataset starts: `len × multiplier / 2`.
    pub fn midpoint(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.total / 2)
    }

    pub fn real_index(&self, virtual_index: usize) -> Option<usize> {
        (!self.is_empty()).then(|| virtual_index % self.len)
    }

    /// Pull a settled slot back toward the middle if it sits on either edge.
    pub fn recenter(&self, index: usize) -> usize {
        if self.is_empty() {
            return index;
        }
        // The second rule sees the result of the first, so a two-slot space
        // sends 0 to 1 and then back to 0.
        let mut index = index;
        if index == 0 {
            index = self.total / 2;
        }
        if index == self.total - 1 {
            index = (self.total / 2).saturating_sub(1);
        }
        index
    }

    /// Slot under a content offset, clamped into the space.
    pub fn index_at_offset(&self, offset_x: f64, page_width: f64) -> Option<usize> {
        if self.is_empty() || !(page_width > 0.0) || !offset_x.is_finite() {
            return None;
        }
        let raw = (offset_x / page_width).floor();
        if raw <= 0.0 {
            return Some(0);
        }
        Some((raw as usize).min(self.total - 1))
    }
}

/// Timer step over `slot_count` slots. Stepping off the last slot jumps to
/// slot 0 rather than wrapping through the modulo.
pub fn next_tick(current: usize, slot_count: usize) -> Option<usize> {
    if slot_count == 0 {
        return None;
    }
    let next = current.saturating_add(1);
    Some(if next >= slot_count { 0 } else { next })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_space_has_no_positions() {
        let space = VirtualSpace::new(0, 4_000_000).unwrap();
        assert!(space.is_empty());
        assert_eq!(space.total(), 0);
        assert_eq!(space.midpoint(), None);
        assert_eq!(space.real_index(17), None);
        assert_eq!(next_tick(0, space.total()), None);
        assert_eq!(space.index_at_offset(100.0, 10.0), None);
    }

    #[test]
    fn test_real_index_always_in_range() {
        for len in 1..=7 {
            let space = VirtualSpace::new(len, 1_000).unwrap();
            for virtual_index in (0..space.total()).step_by(37) {
                let real = space.real_index(virtual_index).unwrap();
                assert!(real < len, "len={len} virtual={virtual_index} real={real}");
            }
        }
    }

    #[test]
    fn test_midpoint_matches_first_item() {
        let space = VirtualSpace::new(3, 4_000_000).unwrap();
        assert_eq!(space.total(), 12_000_000);
        assert_eq!(space.midpoint(), Some(6_000_000));
        assert_eq!(space.real_index(6_000_000), Some(0));
    }

    #[test]
    fn test_tick_wraps_to_zero_at_end() {
        let space = VirtualSpace::new(3, 4).unwrap();
        assert_eq!(next_tick(5, space.total()), Some(6));
        assert_eq!(next_tick(10, space.total()), Some(11));
        assert_eq!(next_tick(11, space.total()), Some(0));
        assert_eq!(next_tick(usize::MAX, space.total()), Some(0));
    }

    #[test]
    fn test_recenter_preserves_real_item() {
        for len in 1..=9 {
            let space = VirtualSpace::new(len, 1_000).unwrap();
            let total = space.total();

            let low = space.recenter(0);
            assert_eq!(low, total / 2);
            assert_eq!(space.real_index(low), space.real_index(0));

            let high = space.recenter(total - 1);
            assert_eq!(high, total / 2 - 1);
            assert_eq!(space.real_index(high), space.real_index(total - 1));

            assert_eq!(space.recenter(5), 5);
        }
    }

    #[test]
    fn test_recenter_applies_rules_in_order() {
        // 0 -> 1 by the first rule, then 1 is the last slot -> 0.
        let pair = VirtualSpace::new(2, 1).unwrap();
        assert_eq!(pair.recenter(0), 0);
        assert_eq!(pair.recenter(1), 0);

        let single = VirtualSpace::new(1, 1).unwrap();
        assert_eq!(single.recenter(0), 0);

        let triple = VirtualSpace::new(3, 1).unwrap();
        assert_eq!(triple.recenter(0), 1);
        assert_eq!(triple.recenter(2), 0);
    }

    #[test]
    fn test_index_at_offset() {
        let space = VirtualSpace::new(2, 10).unwrap();
        assert_eq!(space.index_at_offset(0.0, 320.0), Some(0));
        assert_eq!(space.index_at_offset(959.9, 320.0), Some(2));
        assert_eq!(space.index_at_offset(960.0, 320.0), Some(3));
        assert_eq!(space.index_at_offset(-40.0, 320.0), Some(0));
        assert_eq!(space.index_at_offset(1.0e12, 320.0), Some(19));
        assert_eq!(space.index_at_offset(10.0, 0.0), None);
    }

    #[test]
    fn test_overflow_rejected() {
        let err = VirtualSpace::new(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, CarouselError::SpaceOverflow { .. }));
        assert!(matches!(
            VirtualSpace::new(3, 0).unwrap_err(),
            CarouselError::ZeroMultiplier
        ));
    }
}

//! Neighbour-count transition rules.
//!
//! A [`RuleTable`] is engine configuration, not grid state: the same grid
//! buffer can be advanced under any rule, and swapping rules requires no
//! changes to [`Grid`](crate::Grid) or the worker loop.

use crate::error::GridError;

/// A birth/survival transition rule over Moore-neighbourhood counts.
///
/// Both sets are stored as bitmasks over the nine possible neighbour
/// counts `0..=8`: bit `n` of `survive` means a live cell with `n` live
/// neighbours stays alive, bit `n` of `birth` means a dead cell with `n`
/// live neighbours becomes alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleTable {
    survive: u16,
    birth: u16,
}

impl RuleTable {
    /// The canonical Conway rule: survive on {2, 3}, birth on {3}.
    pub fn conway() -> Self {
        Self {
            survive: mask(&[2, 3]),
            birth: mask(&[3]),
        }
    }

    /// The wide-survival variant: survive on {3, 4, 6, 7, 8}, birth on
    /// {3, 6, 7, 8}.
    ///
    /// Produces denser, longer-lived colonies than [`conway`](Self::conway);
    /// offered as a selectable alternative rather than a replacement.
    pub fn wide_survival() -> Self {
        Self {
            survive: mask(&[3, 4, 6, 7, 8]),
            birth: mask(&[3, 6, 7, 8]),
        }
    }

    /// Build an arbitrary rule from explicit survive/birth count sets.
    ///
    /// Returns `Err(GridError::InvalidNeighbourCount)` if any count
    /// exceeds 8 (a Moore neighbourhood has at most 8 cells).
    pub fn new(survive: &[u8], birth: &[u8]) -> Result<Self, GridError> {
        Ok(Self {
            survive: try_mask(survive)?,
            birth: try_mask(birth)?,
        })
    }

    /// Next state of a cell that `was_alive` and has `neighbours` live
    /// Moore neighbours.
    #[inline]
    pub fn next_state(&self, was_alive: bool, neighbours: u8) -> bool {
        debug_assert!(neighbours <= 8);
        let set = if was_alive { self.survive } else { self.birth };
        set & (1 << neighbours) != 0
    }

    /// Whether a live cell with `neighbours` live neighbours survives.
    pub fn survives(&self, neighbours: u8) -> bool {
        self.next_state(true, neighbours)
    }

    /// Whether a dead cell with `neighbours` live neighbours is born.
    pub fn births(&self, neighbours: u8) -> bool {
        self.next_state(false, neighbours)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::conway()
    }
}

fn mask(counts: &[u8]) -> u16 {
    counts.iter().fold(0u16, |m, &c| m | (1 << c))
}

fn try_mask(counts: &[u8]) -> Result<u16, GridError> {
    let mut m = 0u16;
    for &c in counts {
        if c > 8 {
            return Err(GridError::InvalidNeighbourCount { count: c });
        }
        m |= 1 << c;
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conway_survive_and_birth() {
        let rule = RuleTable::conway();
        for n in 0..=8u8 {
            assert_eq!(rule.survives(n), n == 2 || n == 3, "survive count {n}");
            assert_eq!(rule.births(n), n == 3, "birth count {n}");
        }
    }

    #[test]
    fn wide_survival_sets() {
        let rule = RuleTable::wide_survival();
        for n in 0..=8u8 {
            assert_eq!(rule.survives(n), [3, 4, 6, 7, 8].contains(&n));
            assert_eq!(rule.births(n), [3, 6, 7, 8].contains(&n));
        }
    }

    #[test]
    fn custom_rule_round_trips() {
        let rule = RuleTable::new(&[1, 2], &[3, 4]).unwrap();
        assert!(rule.survives(1));
        assert!(rule.survives(2));
        assert!(!rule.survives(3));
        assert!(rule.births(3));
        assert!(rule.births(4));
        assert!(!rule.births(2));
    }

    #[test]
    fn count_above_eight_rejected() {
        assert_eq!(
            RuleTable::new(&[9], &[]),
            Err(GridError::InvalidNeighbourCount { count: 9 })
        );
        assert_eq!(
            RuleTable::new(&[], &[12]),
            Err(GridError::InvalidNeighbourCount { count: 12 })
        );
    }

    #[test]
    fn default_is_conway() {
        assert_eq!(RuleTable::default(), RuleTable::conway());
    }
}

use std::str::FromStr;

use thiserror::Error;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// A Birth/Survival rule for a two-state Moore-neighborhood automaton.
///
/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// # Examples
/// ```notrust
/// B3/S23:                0000_0000_0000_1000_0000_0000_0000_1100
///
/// B/S:                   0000_0000_0000_0000_0000_0000_0000_0000
/// B012345678/S012345678: 0000_0001_1111_1111_0000_0001_1111_1111
/// ```
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and
    /// `s`, numbers are set on a bit basis. For instance if bit `i` in `b` is on, it
    /// means `i` is included in the set of births. Any bit past the 8th is ignored.
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    pub fn births(&self) -> u16 {
        ((self.rule & 0x1FF_0000) >> 0x10) as u16
    }

    pub fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// The fate of a single cell: a dead cell comes alive when its live-neighbor
    /// count is in the birth set, a live cell stays alive when its count is in
    /// the survival set.
    pub fn eval(&self, alive: bool, neighbors: u8) -> bool {
        debug_assert!(neighbors <= 8, "a Moore neighborhood has 8 cells");

        let set = if alive { self.survivals() } else { self.births() };

        set & (1 << neighbors) != 0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Missing '/' separator in rule string")]
    MissingSeparator,

    #[error("Expected a segment starting with 'B' or 'S', got '{got}'")]
    UnknownSegment { got: char },

    #[error("Rule contains two '{letter}' segments")]
    DuplicateSegment { letter: char },

    #[error("Expected a digit, got '{got}'")]
    InvalidDigit { got: char },

    #[error("Neighbor count '{got}' is out of range, the maximum is 8")]
    CountOutOfRange { got: char },
}

impl FromStr for RuleSet {
    type Err = RuleError;

    /// Parse rules that look like `B3/S23` or `S23/B3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((left, right)) = s.split_once('/') else {
            return Err(RuleError::MissingSeparator);
        };

        let mut births = None;
        let mut survivals = None;

        for segment in [left, right] {
            let mut chars = segment.chars();

            let (letter, slot) = match chars.next() {
                Some(c @ ('b' | 'B')) => (c, &mut births),
                Some(c @ ('s' | 'S')) => (c, &mut survivals),
                Some(c) => return Err(RuleError::UnknownSegment { got: c }),
                None => return Err(RuleError::UnknownSegment { got: '/' }),
            };

            if slot.is_some() {
                return Err(RuleError::DuplicateSegment { letter });
            }

            let mut counts: u16 = 0;

            for c in chars {
                let Some(n) = c.to_digit(10) else {
                    return Err(RuleError::InvalidDigit { got: c });
                };

                if n > 8 {
                    return Err(RuleError::CountOutOfRange { got: c });
                }

                counts |= 1 << n;
            }

            *slot = Some(counts);
        }

        let (Some(b), Some(s)) = (births, survivals) else {
            unreachable!("Two distinct segments always fill both slots")
        };

        Ok(RuleSet::new(b, s))
    }
}

#[cfg(test)]
mod tests {
    use super::B3S23;
    use super::RuleError;
    use super::RuleSet;

    #[test]
    fn eval_b3s23() {
        let rule: RuleSet = "B3/S23".parse().unwrap();

        assert!(rule.eval(false, 3));
        assert!(!rule.eval(false, 2));
        assert!(rule.eval(true, 2));
        assert!(rule.eval(true, 3));
        assert!(!rule.eval(true, 4));
        assert!(!rule.eval(true, 1));
    }

    #[test]
    fn segment_order_is_irrelevant() {
        let a: RuleSet = "B3/S23".parse().unwrap();
        let b: RuleSet = "S23/B3".parse().unwrap();

        assert_eq!(a, b);
        assert_eq!(a, B3S23);
    }

    #[test]
    fn duplicate_digits_collapse() {
        let a: RuleSet = "B33/S2223".parse().unwrap();

        assert_eq!(a, B3S23);
    }

    #[test]
    fn empty_digit_runs_are_permitted() {
        let rule: RuleSet = "B/S012345678".parse().unwrap();

        assert_eq!(rule.births(), 0);
        assert_eq!(rule.survivals(), 0x1FF);
    }

    #[test]
    fn rejects_malformed_rules() {
        assert_eq!("B3S23".parse::<RuleSet>(), Err(RuleError::MissingSeparator));
        assert_eq!(
            "B9/S23".parse::<RuleSet>(),
            Err(RuleError::CountOutOfRange { got: '9' })
        );
        assert_eq!(
            "X3/S23".parse::<RuleSet>(),
            Err(RuleError::UnknownSegment { got: 'X' })
        );
        assert_eq!(
            "B3/S2x".parse::<RuleSet>(),
            Err(RuleError::InvalidDigit { got: 'x' })
        );
        assert_eq!(
            "B3/B3".parse::<RuleSet>(),
            Err(RuleError::DuplicateSegment { letter: 'B' })
        );
    }
}

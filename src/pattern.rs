use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::grid::BoundsError;
use crate::grid::Grid;

/// Glider:
/// ```notrust
/// . # .
/// . . #
/// # # #
/// ```
const GLIDER: &[(usize, usize)] = &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

/// Acorn:
/// ```notrust
/// . # . . . . .
/// . . . # . . .
/// # # . . # # #
/// ```
const ACORN: &[(usize, usize)] = &[
    (1, 0),
    (3, 1),
    (0, 2),
    (1, 2),
    (4, 2),
    (5, 2),
    (6, 2),
];

/// Diehard:
/// ```notrust
/// . . . . . . # .
/// # # . . . . . .
/// . # . . . # # #
/// ```
const DIEHARD: &[(usize, usize)] = &[
    (6, 0),
    (0, 1),
    (1, 1),
    (1, 2),
    (5, 2),
    (6, 2),
    (7, 2),
];

/// A named cell pattern, stored as a table of offsets relative to its
/// top-left anchor. The tables are data; adding a pattern never changes the
/// stamping contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Glider,
    Acorn,
    Diehard,
}

impl Pattern {
    pub fn offsets(&self) -> &'static [(usize, usize)] {
        match self {
            Pattern::Glider => GLIDER,
            Pattern::Acorn => ACORN,
            Pattern::Diehard => DIEHARD,
        }
    }

    /// Set every cell of the pattern alive, anchored at `(x, y)`.
    ///
    /// Stamps never wrap. All target coordinates are validated up front, so a
    /// pattern that would spill over the grid edge is rejected whole and the
    /// grid is left untouched.
    pub fn stamp(&self, grid: &mut Grid, x: usize, y: usize) -> Result<(), BoundsError> {
        for &(dx, dy) in self.offsets() {
            grid.get(x + dx, y + dy)?;
        }

        for &(dx, dy) in self.offsets() {
            grid.set(x + dx, y + dy, true)?;
        }

        Ok(())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pattern::Glider => "glider",
            Pattern::Acorn => "acorn",
            Pattern::Diehard => "diehard",
        };

        write!(f, "{name}")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown pattern \"{name}\"")]
pub struct UnknownPattern {
    pub name: String,
}

impl FromStr for Pattern {
    type Err = UnknownPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "glider" => Ok(Pattern::Glider),
            "acorn" => Ok(Pattern::Acorn),
            "diehard" => Ok(Pattern::Diehard),
            _ => Err(UnknownPattern {
                name: s.to_string(),
            }),
        }
    }
}

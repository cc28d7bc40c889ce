use std::fmt;

use crate::grid::BoundsError;
use crate::grid::Grid;
use crate::pattern::Pattern;

/// A single deferred grid mutation, immutable once built and applied exactly
/// once at a generation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Flip one cell.
    Toggle { x: usize, y: usize },

    /// Stamp a named pattern anchored at `(x, y)`.
    Stamp { pattern: Pattern, x: usize, y: usize },
}

impl Command {
    pub fn toggle(x: usize, y: usize) -> Self {
        Command::Toggle { x, y }
    }

    pub fn stamp(pattern: Pattern, x: usize, y: usize) -> Self {
        Command::Stamp { pattern, x, y }
    }

    pub fn apply(&self, grid: &mut Grid) -> Result<(), BoundsError> {
        match *self {
            Command::Toggle { x, y } => grid.toggle(x, y),
            Command::Stamp { pattern, x, y } => pattern.stamp(grid, x, y),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Toggle { x, y } => write!(f, "toggle ({x}, {y})"),
            Command::Stamp { pattern, x, y } => write!(f, "stamp {pattern} at ({x}, {y})"),
        }
    }
}

use std::fmt;

use thiserror::Error;

use crate::rule_set::RuleSet;

/// A coordinate pair landed outside the grid. Lookups and mutations never
/// wrap; only neighbor queries do.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("({x}, {y}) is out of bounds for a {width}x{height} grid")]
pub struct BoundsError {
    pub x: i64,
    pub y: i64,
    pub width: usize,
    pub height: usize,
}

/// A fixed-size toroidal field of two-state cells.
///
/// Cells are stored row-major, one `bool` per `(x, y)` with `0 <= x < width`
/// and `0 <= y < height`. The dimensions never change for the lifetime of the
/// grid; advancing a generation allocates a fresh buffer instead (see
/// [`Grid::step`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<bool>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Create an all-dead grid. Both dimensions must be nonzero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0, "grid width must be nonzero");
        assert!(height > 0, "grid height must be nonzero");

        Self {
            cells: vec![false; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn check(&self, x: usize, y: usize) -> Result<usize, BoundsError> {
        if x >= self.width || y >= self.height {
            return Err(BoundsError {
                x: x as i64,
                y: y as i64,
                width: self.width,
                height: self.height,
            });
        }

        Ok(self.index(x, y))
    }

    pub fn get(&self, x: usize, y: usize) -> Result<bool, BoundsError> {
        let i = self.check(x, y)?;

        Ok(self.cells[i])
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) -> Result<(), BoundsError> {
        let i = self.check(x, y)?;
        self.cells[i] = alive;

        Ok(())
    }

    /// Flip a single cell.
    pub fn toggle(&mut self, x: usize, y: usize) -> Result<(), BoundsError> {
        let i = self.check(x, y)?;
        self.cells[i] = !self.cells[i];

        Ok(())
    }

    /// Count the 8 Moore neighbors of `(x, y)`, wrapping around the grid
    /// edges with true modulo arithmetic.
    pub fn count_live_neighbors(&self, x: usize, y: usize) -> u8 {
        let (w, h) = (self.width as i64, self.height as i64);

        let mut count = 0;

        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }

                let nx = (x as i64 + dx).rem_euclid(w) as usize;
                let ny = (y as i64 + dy).rem_euclid(h) as usize;

                if self.cells[self.index(nx, ny)] {
                    count += 1;
                }
            }
        }

        count
    }

    /// Advance one generation under `rules`, producing a new grid of the same
    /// dimensions. Every target cell reads only this grid's state, so
    /// generation N+1 is a pure function of a complete generation N.
    pub fn step(&self, rules: &RuleSet) -> Grid {
        let mut next = Grid::new(self.width, self.height);

        for y in 0..self.height {
            for x in 0..self.width {
                let i = self.index(x, y);
                let neighbors = self.count_live_neighbors(x, y);

                next.cells[i] = rules.eval(self.cells[i], neighbors);
            }
        }

        next
    }

    /// Every cell with its coordinates, in row-major order.
    pub fn enumerate(&self) -> impl Iterator<Item = ((usize, usize), bool)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &alive)| ((i % self.width, i / self.width), alive))
    }

    /// Coordinates of all live cells, in row-major order.
    pub fn live_cells(&self) -> Vec<(usize, usize)> {
        self.enumerate()
            .filter_map(|(xy, alive)| alive.then_some(xy))
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = if self.cells[self.index(x, y)] { '#' } else { '.' };
                write!(f, "{c}")?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::rule_set::B3S23;

    use super::Grid;

    #[test]
    fn neighbor_counting_wraps_toroidally() {
        let mut grid = Grid::new(5, 5);
        grid.set(0, 0, true).unwrap();

        // (4, 4) touches (0, 0) across the diagonal wrap
        assert_eq!(grid.count_live_neighbors(4, 4), 1);
        assert_eq!(grid.count_live_neighbors(4, 0), 1);
        assert_eq!(grid.count_live_neighbors(0, 4), 1);
        assert_eq!(grid.count_live_neighbors(1, 1), 1);
        assert_eq!(grid.count_live_neighbors(2, 2), 0);
    }

    #[test]
    fn interior_neighbor_counts_ignore_the_wrap() {
        let mut grid = Grid::new(7, 7);

        for (x, y) in [(2, 2), (3, 2), (4, 2)] {
            grid.set(x, y, true).unwrap();
        }

        assert_eq!(grid.count_live_neighbors(3, 3), 3);
        assert_eq!(grid.count_live_neighbors(3, 2), 2);
        assert_eq!(grid.count_live_neighbors(1, 2), 1);
        assert_eq!(grid.count_live_neighbors(5, 5), 0);
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let mut grid = Grid::new(4, 3);

        assert!(grid.get(4, 0).is_err());
        assert!(grid.get(0, 3).is_err());
        assert!(grid.set(4, 3, true).is_err());
        assert!(grid.toggle(9, 9).is_err());

        assert!(grid.get(3, 2).is_ok());
    }

    #[test]
    fn step_never_mutates_its_input() {
        let mut grid = Grid::new(6, 6);

        // A blinker
        for (x, y) in [(2, 1), (2, 2), (2, 3)] {
            grid.set(x, y, true).unwrap();
        }

        let before = grid.clone();
        let next = grid.step(&B3S23);

        assert_eq!(grid, before);
        assert_ne!(next, grid);

        // Blinkers oscillate with period 2
        assert_eq!(next.live_cells(), vec![(1, 2), (2, 2), (3, 2)]);
        assert_eq!(next.step(&B3S23), grid);
    }
}

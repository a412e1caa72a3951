//! Fixed-size 2D cell field with a hard (permanently dead) boundary.

/// Liveness value of a dead cell.
pub const DEAD: u8 = 0;
/// Liveness value of a live cell.
pub const ALIVE: u8 = 1;

/// A fixed-size grid of cells, one byte of liveness (0 or 1) per cell.
///
/// Coordinates are signed so that neighbor counting can walk off the edge:
/// any out-of-bounds read is dead and any out-of-bounds write is a no-op.
/// The size is immutable after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Create an all-dead grid of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![DEAD; width * height],
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Liveness at `(x, y)`, or [`DEAD`] when the coordinate is out of bounds.
    pub fn get(&self, x: isize, y: isize) -> u8 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return DEAD;
        }
        self.cells[x as usize + y as usize * self.width]
    }

    /// Set liveness at `(x, y)`; out-of-bounds writes are silently dropped.
    pub fn set(&mut self, x: isize, y: isize, v: u8) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.cells[x as usize + y as usize * self.width] = v;
    }

    /// Number of live cells.
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != DEAD).count()
    }

    /// Row-major cell storage.
    pub(crate) fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Mutable row-major cell storage, used for band partitioning.
    pub(crate) fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_are_dead() {
        let mut g = Grid::new(3, 2);
        g.set(0, 0, ALIVE);
        g.set(2, 1, ALIVE);
        assert_eq!(g.get(-1, 0), DEAD);
        assert_eq!(g.get(0, -1), DEAD);
        assert_eq!(g.get(3, 0), DEAD);
        assert_eq!(g.get(0, 2), DEAD);
        assert_eq!(g.get(isize::MAX, isize::MAX), DEAD);
        assert_eq!(g.get(0, 0), ALIVE);
        assert_eq!(g.get(2, 1), ALIVE);
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut g = Grid::new(2, 2);
        g.set(-1, 0, ALIVE);
        g.set(2, 0, ALIVE);
        g.set(0, 2, ALIVE);
        assert_eq!(g.live_count(), 0);
    }

    #[test]
    fn clone_is_independent_both_ways() {
        let mut a = Grid::new(4, 4);
        a.set(1, 1, ALIVE);
        let mut b = a.clone();
        assert_eq!(a, b);

        b.set(2, 2, ALIVE);
        assert_eq!(a.get(2, 2), DEAD);

        a.set(3, 3, ALIVE);
        assert_eq!(b.get(3, 3), DEAD);
    }

    #[test]
    fn zero_sized_grid_is_all_boundary() {
        let g = Grid::new(0, 0);
        assert_eq!(g.get(0, 0), DEAD);
        assert_eq!(g.live_count(), 0);
    }
}

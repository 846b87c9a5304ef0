//! The grid engine: a resizable 2D Game of Life automaton.
//!
//! Cells are stored in a single flat buffer with a one-cell dead border
//! around the logical area, so the neighbour count in [`Grid::step`] never
//! needs bounds checks at the edges. Writes outside the current logical
//! bounds grow the grid; capacity is extended in fixed increments and never
//! shrinks during a session.

use thiserror::Error;

/// Logical size used for an axis when the creation hint is negative.
pub const GRID_SIZE_DEFAULT: u32 = 255;

/// Capacity growth increment per axis, in cells.
const CAP_INCREMENT: usize = 32;

/// One cell of the automaton.
///
/// `next_state` is scratch space for the two-pass step and is only
/// meaningful mid-step. `was_alive` latches once a cell has ever been alive
/// and is read by the renderer to draw "ghost" cells; it has no effect on
/// the transition rule.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Cell {
    pub state: bool,
    pub next_state: bool,
    pub was_alive: bool,
}

impl Cell {
    pub const DEAD: Cell = Cell {
        state: false,
        next_state: false,
        was_alive: false,
    };
    pub const ALIVE: Cell = Cell {
        state: true,
        next_state: false,
        was_alive: true,
    };
    /// A cell explicitly killed by the user. Still marked ever-alive so it
    /// keeps rendering as a ghost.
    pub const KILLED: Cell = Cell {
        state: false,
        next_state: false,
        was_alive: true,
    };
}

#[derive(Debug, Error)]
pub enum GridError {
    #[error("failed to allocate cell storage for a {cap_x}x{cap_y} grid")]
    Allocation { cap_x: usize, cap_y: usize },
}

/// The cell grid. Exactly one exists per simulation session.
#[derive(Debug)]
pub struct Grid {
    /// Logical (user-visible) dimensions.
    size_x: usize,
    size_y: usize,
    /// Allocated dimensions, always >= logical size + 2 per axis so the
    /// dead border ring fits.
    cap_x: usize,
    cap_y: usize,
    /// Flat row-major storage: storage cell (sx, sy) lives at
    /// `sy * cap_x + sx`. Logical (x, y) maps to storage (x + 1, y + 1).
    cells: Vec<Cell>,
}

fn alloc_cells(cap_x: usize, cap_y: usize) -> Result<Vec<Cell>, GridError> {
    let len = cap_x
        .checked_mul(cap_y)
        .ok_or(GridError::Allocation { cap_x, cap_y })?;
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(len)
        .map_err(|_| GridError::Allocation { cap_x, cap_y })?;
    cells.resize(len, Cell::DEAD);
    Ok(cells)
}

impl Grid {
    /// Creates an all-dead grid with the given logical size. A negative
    /// hint on either axis falls back to [`GRID_SIZE_DEFAULT`] for that
    /// axis.
    pub fn new(hint_x: i32, hint_y: i32) -> Result<Grid, GridError> {
        let size_x = if hint_x < 0 {
            log::warn!("invalid grid width hint {hint_x}, using default {GRID_SIZE_DEFAULT}");
            GRID_SIZE_DEFAULT as usize
        } else {
            hint_x as usize
        };
        let size_y = if hint_y < 0 {
            log::warn!("invalid grid height hint {hint_y}, using default {GRID_SIZE_DEFAULT}");
            GRID_SIZE_DEFAULT as usize
        } else {
            hint_y as usize
        };

        let cap_x = size_x + CAP_INCREMENT;
        let cap_y = size_y + CAP_INCREMENT;
        let cells = alloc_cells(cap_x, cap_y)?;

        Ok(Grid {
            size_x,
            size_y,
            cap_x,
            cap_y,
            cells,
        })
    }

    pub fn size_x(&self) -> u32 {
        self.size_x as u32
    }

    pub fn size_y(&self) -> u32 {
        self.size_y as u32
    }

    /// Population count over the logical area.
    pub fn live_cells(&self) -> usize {
        self.rows().flatten().filter(|c| c.state).count()
    }

    /// Logical rows, top to bottom, without the border ring.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        (1..=self.size_y).map(move |sy| {
            let start = sy * self.cap_x + 1;
            &self.cells[start..start + self.size_x]
        })
    }

    /// Reads the cell at logical (x, y). Out-of-range reads are non-fatal:
    /// they return an all-dead cell and log a diagnostic.
    pub fn get(&self, x: u32, y: u32) -> Cell {
        let (x, y) = (x as usize, y as usize);
        if x >= self.size_x || y >= self.size_y {
            log::warn!(
                "grid read out of range: ({x}, {y}) on a {}x{} grid",
                self.size_x,
                self.size_y
            );
            return Cell::DEAD;
        }
        self.cells[(y + 1) * self.cap_x + (x + 1)]
    }

    /// Writes a cell at logical (x, y), growing the grid first if the
    /// coordinate (plus its border ring) does not fit. A failed growth
    /// allocation leaves the grid valid with every committed cell intact;
    /// if growth on x succeeded before growth on y failed, the wider size
    /// persists.
    pub fn set(&mut self, x: u32, y: u32, cell: Cell) -> Result<(), GridError> {
        let (x, y) = (x as usize, y as usize);
        // Out-of-bounds writes extend the logical size to coord + 2: the
        // written cell plus one spare column/row keeps the border ring
        // comfortably inside capacity.
        if x >= self.size_x {
            self.grow_x(x + 2)?;
        }
        if y >= self.size_y {
            self.grow_y(y + 2)?;
        }
        self.cells[(y + 1) * self.cap_x + (x + 1)] = cell;
        Ok(())
    }

    pub fn set_alive(&mut self, x: u32, y: u32) -> Result<(), GridError> {
        self.set(x, y, Cell::ALIVE)
    }

    pub fn set_dead(&mut self, x: u32, y: u32) -> Result<(), GridError> {
        self.set(x, y, Cell::KILLED)
    }

    fn grow_x(&mut self, new_size_x: usize) -> Result<(), GridError> {
        let mut new_cap_x = self.cap_x;
        while new_cap_x < new_size_x + 2 {
            new_cap_x += CAP_INCREMENT;
        }
        if new_cap_x != self.cap_x {
            // Widening changes the row stride, so the buffer is re-laid-out
            // into a fresh allocation. New cells start dead.
            let mut new_cells = alloc_cells(new_cap_x, self.cap_y)?;
            for sy in 0..self.cap_y {
                let src = sy * self.cap_x;
                let dst = sy * new_cap_x;
                new_cells[dst..dst + self.cap_x]
                    .copy_from_slice(&self.cells[src..src + self.cap_x]);
            }
            self.cells = new_cells;
            self.cap_x = new_cap_x;
            log::debug!("grid capacity grew to {}x{}", self.cap_x, self.cap_y);
        }
        self.size_x = new_size_x;
        Ok(())
    }

    fn grow_y(&mut self, new_size_y: usize) -> Result<(), GridError> {
        let mut new_cap_y = self.cap_y;
        while new_cap_y < new_size_y + 2 {
            new_cap_y += CAP_INCREMENT;
        }
        if new_cap_y != self.cap_y {
            // Row-major storage: taller just means appending dead rows.
            let new_len = self.cap_x * new_cap_y;
            self.cells
                .try_reserve_exact(new_len - self.cells.len())
                .map_err(|_| GridError::Allocation {
                    cap_x: self.cap_x,
                    cap_y: new_cap_y,
                })?;
            self.cells.resize(new_len, Cell::DEAD);
            self.cap_y = new_cap_y;
            log::debug!("grid capacity grew to {}x{}", self.cap_x, self.cap_y);
        }
        self.size_y = new_size_y;
        Ok(())
    }

    /// Advances the automaton by one generation.
    ///
    /// Two passes: every cell's `next_state` is computed from the previous
    /// generation's `state` fields, then committed. The rule is the
    /// standard B3/S23: fewer than 2 or more than 3 live neighbours kills,
    /// a live cell with 2-3 survives, a dead cell with exactly 3 is born.
    pub fn step(&mut self) {
        for sy in 1..=self.size_y {
            for sx in 1..=self.size_x {
                let i = sy * self.cap_x + sx;
                let up = i - self.cap_x;
                let down = i + self.cap_x;
                // Unrolled neighbour count; the dead border ring makes all
                // eight indices valid even for edge cells.
                let count = self.cells[up - 1].state as u8
                    + self.cells[up].state as u8
                    + self.cells[up + 1].state as u8
                    + self.cells[i - 1].state as u8
                    + self.cells[i + 1].state as u8
                    + self.cells[down - 1].state as u8
                    + self.cells[down].state as u8
                    + self.cells[down + 1].state as u8;

                let cell = &mut self.cells[i];
                if !(2..=3).contains(&count) {
                    cell.next_state = false;
                } else if cell.state || count == 3 {
                    cell.next_state = true;
                    cell.was_alive = true;
                } else {
                    // Dead with exactly two neighbours stays dead.
                    cell.next_state = false;
                }
            }
        }
        for sy in 1..=self.size_y {
            for sx in 1..=self.size_x {
                let i = sy * self.cap_x + sx;
                self.cells[i].state = self.cells[i].next_state;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, Grid, GRID_SIZE_DEFAULT};

    #[test]
    fn new_grid_is_all_dead() {
        let grid = Grid::new(8, 6).unwrap();
        assert_eq!(grid.size_x(), 8);
        assert_eq!(grid.size_y(), 6);
        for y in 0..6 {
            for x in 0..8 {
                assert_eq!(grid.get(x, y), Cell::DEAD);
            }
        }
    }

    #[test]
    fn negative_hint_falls_back_to_default_size() {
        let grid = Grid::new(-1, 10).unwrap();
        assert_eq!(grid.size_x(), GRID_SIZE_DEFAULT);
        assert_eq!(grid.size_y(), 10);
    }

    #[test]
    fn set_alive_then_get() {
        let mut grid = Grid::new(16, 16).unwrap();
        grid.set_alive(3, 4).unwrap();
        let cell = grid.get(3, 4);
        assert!(cell.state);
        assert!(cell.was_alive);
    }

    #[test]
    fn killing_a_cell_keeps_it_marked_ever_alive() {
        let mut grid = Grid::new(16, 16).unwrap();
        grid.set_alive(5, 5).unwrap();
        grid.set_dead(5, 5).unwrap();
        let cell = grid.get(5, 5);
        assert!(!cell.state);
        assert!(cell.was_alive);
    }

    #[test]
    fn write_beyond_bounds_grows_the_grid() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set_alive(100, 7).unwrap();
        assert_eq!(grid.size_x(), 102);
        assert_eq!(grid.size_y(), 9);
        assert!(grid.get(100, 7).state);
        // Previously in-bounds cells are untouched.
        assert_eq!(grid.get(0, 0), Cell::DEAD);
    }

    #[test]
    fn in_bounds_edge_writes_do_not_grow() {
        // Load depends on this: reviving a saved cell in the last column
        // must not change the saved dimensions.
        let mut grid = Grid::new(8, 8).unwrap();
        grid.set_alive(7, 7).unwrap();
        assert_eq!(grid.size_x(), 8);
        assert_eq!(grid.size_y(), 8);
    }

    #[test]
    fn growth_is_monotonic() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set_alive(50, 50).unwrap();
        let (sx, sy) = (grid.size_x(), grid.size_y());
        grid.set_alive(1, 1).unwrap();
        grid.set_dead(10, 10).unwrap();
        assert_eq!(grid.size_x(), sx);
        assert_eq!(grid.size_y(), sy);
    }

    #[test]
    fn growth_preserves_live_cells() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set_alive(1, 1).unwrap();
        grid.set_alive(2, 1).unwrap();
        grid.set_alive(200, 300).unwrap();
        assert!(grid.get(1, 1).state);
        assert!(grid.get(2, 1).state);
        assert!(grid.get(200, 300).state);
        assert_eq!(grid.live_cells(), 3);
    }

    #[test]
    fn out_of_range_read_returns_dead_without_mutating() {
        let mut grid = Grid::new(8, 8).unwrap();
        grid.set_alive(7, 0).unwrap();
        let (sx, sy) = (grid.size_x(), grid.size_y());
        assert_eq!(grid.get(sx, 0), Cell::DEAD);
        assert_eq!(grid.get(0, sy), Cell::DEAD);
        assert_eq!(grid.size_x(), sx);
        assert_eq!(grid.size_y(), sy);
    }

    #[test]
    fn lone_cell_dies() {
        let mut grid = Grid::new(8, 8).unwrap();
        grid.set_alive(3, 3).unwrap();
        grid.step();
        assert!(!grid.get(3, 3).state);
        // But it stays a ghost.
        assert!(grid.get(3, 3).was_alive);
    }

    #[test]
    fn block_is_a_still_life() {
        let mut grid = Grid::new(8, 8).unwrap();
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            grid.set_alive(x, y).unwrap();
        }
        grid.step();
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            assert!(grid.get(x, y).state, "block cell ({x}, {y}) died");
        }
        assert_eq!(grid.live_cells(), 4);
    }

    #[test]
    fn blinker_oscillates() {
        let mut grid = Grid::new(8, 8).unwrap();
        for x in 1..=3 {
            grid.set_alive(x, 1).unwrap();
        }
        grid.step();
        // Horizontal line becomes vertical.
        for y in 0..=2 {
            assert!(grid.get(2, y).state, "vertical blinker cell (2, {y}) dead");
        }
        assert!(!grid.get(1, 1).state);
        assert!(!grid.get(3, 1).state);
        grid.step();
        // And back to horizontal.
        for x in 1..=3 {
            assert!(grid.get(x, 1).state, "horizontal blinker cell ({x}, 1) dead");
        }
        assert_eq!(grid.live_cells(), 3);
    }

    #[test]
    fn step_ignores_scratch_and_ghost_fields() {
        // Two grids with identical `state` but different `next_state` /
        // `was_alive` garbage must step to the same `state` assignment.
        let mut reference = Grid::new(8, 8).unwrap();
        let mut noisy = Grid::new(8, 8).unwrap();
        for x in 1..=3 {
            reference.set_alive(x, 1).unwrap();
            noisy.set_alive(x, 1).unwrap();
        }
        for y in 0..8 {
            for x in 0..8 {
                let mut cell = noisy.get(x, y);
                cell.next_state = !cell.next_state;
                cell.was_alive = true;
                noisy.set(x, y, cell).unwrap();
            }
        }
        reference.step();
        noisy.step();
        for y in 0..reference.size_y() {
            for x in 0..reference.size_x() {
                assert_eq!(
                    reference.get(x, y).state,
                    noisy.get(x, y).state,
                    "state diverged at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn edge_cells_count_the_border_ring_as_dead() {
        // A blinker flush against the top-left corner must behave as if the
        // outside were dead, not wrap or crash.
        let mut grid = Grid::new(8, 8).unwrap();
        for x in 0..=2 {
            grid.set_alive(x, 0).unwrap();
        }
        grid.step();
        assert!(grid.get(1, 0).state);
        assert!(grid.get(1, 1).state);
        assert!(!grid.get(0, 0).state);
        assert!(!grid.get(2, 0).state);
        assert_eq!(grid.live_cells(), 2);
    }
}

//! Well-known seed patterns, placed through the grid engine.

use crate::grid::{Grid, GridError};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pattern {
    /// A small oscillator
    Blinker,
    /// A small oscillator
    Toad,
    /// A small stationary pattern
    Block,
    /// A diagonal spaceship
    Glider,
    /// A horizontal spaceship
    LightweightSpaceship,
    /// A pattern that grows indefinitely
    GosperGliderGun,
}

/// All patterns, in menu order.
pub const PATTERNS: [Pattern; 6] = [
    Pattern::Blinker,
    Pattern::Toad,
    Pattern::Block,
    Pattern::Glider,
    Pattern::LightweightSpaceship,
    Pattern::GosperGliderGun,
];

impl Pattern {
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Blinker => "Blinker",
            Pattern::Toad => "Toad",
            Pattern::Block => "Block",
            Pattern::Glider => "Glider",
            Pattern::LightweightSpaceship => "Lightweight spaceship",
            Pattern::GosperGliderGun => "Gosper glider gun",
        }
    }

    /// Live-cell offsets of the pattern, relative to its top-left corner.
    pub fn cells(&self) -> &'static [(u32, u32)] {
        match self {
            Pattern::Blinker => &[(0, 0), (0, 1), (0, 2)],
            Pattern::Toad => &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
            Pattern::Block => &[(0, 0), (1, 0), (0, 1), (1, 1)],
            Pattern::Glider => &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
            Pattern::LightweightSpaceship => &[
                (0, 1),
                (0, 3),
                (1, 0),
                (2, 0),
                (3, 0),
                (3, 3),
                (4, 0),
                (4, 1),
                (4, 2),
            ],
            Pattern::GosperGliderGun => &[
                // Left block
                (1, 5),
                (1, 6),
                (2, 5),
                (2, 6),
                // Left ship
                (11, 5),
                (11, 6),
                (11, 7),
                (12, 4),
                (12, 8),
                (13, 3),
                (13, 9),
                (14, 3),
                (14, 9),
                (15, 6),
                (16, 4),
                (16, 8),
                (17, 5),
                (17, 6),
                (17, 7),
                (18, 6),
                // Right ship
                (21, 3),
                (21, 4),
                (21, 5),
                (22, 3),
                (22, 4),
                (22, 5),
                (23, 2),
                (23, 6),
                (25, 1),
                (25, 2),
                (25, 6),
                (25, 7),
                // Right block
                (35, 3),
                (35, 4),
                (36, 3),
                (36, 4),
            ],
        }
    }

    /// Revives the pattern's cells with the top-left corner at (x, y). The
    /// grid grows if the pattern does not fit.
    pub fn place(&self, grid: &mut Grid, x: u32, y: u32) -> Result<(), GridError> {
        for &(dx, dy) in self.cells() {
            grid.set_alive(x + dx, y + dy)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Pattern;
    use crate::grid::Grid;

    #[test]
    fn placed_blinker_oscillates() {
        let mut grid = Grid::new(16, 16).unwrap();
        Pattern::Blinker.place(&mut grid, 5, 5).unwrap();
        assert_eq!(grid.live_cells(), 3);
        grid.step();
        grid.step();
        // Period 2: back to the vertical line.
        for dy in 0..3 {
            assert!(grid.get(5, 5 + dy).state);
        }
        assert_eq!(grid.live_cells(), 3);
    }

    #[test]
    fn placing_past_the_edge_grows_the_grid() {
        let mut grid = Grid::new(8, 8).unwrap();
        Pattern::GosperGliderGun.place(&mut grid, 0, 0).unwrap();
        assert!(grid.size_x() >= 38);
        assert_eq!(grid.live_cells(), 36);
    }
}

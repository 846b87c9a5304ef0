//! Flat-text persistence for the grid.
//!
//! Format: a header line `"<width> <height>"`, then one line per logical
//! row with one glyph per cell, `'o'` alive and `'.'` dead. Only `state`
//! round-trips; `next_state` and `was_alive` are rendering scratch and are
//! not saved.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::grid::{Grid, GridError};

const GLYPH_ALIVE: char = 'o';
const GLYPH_DEAD: char = '.';

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("malformed save header {header:?}")]
    Header { header: String },
    #[error("save row {row} has {found} cells, expected {expected}")]
    Row {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unrecognized cell glyph {glyph:?} in save row {row}")]
    Glyph { row: usize, glyph: char },
    #[error("save file ends after {found} of {expected} rows")]
    Truncated { found: usize, expected: usize },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Writes the grid's logical dimensions and cell states.
pub fn write_grid<W: Write>(mut out: W, grid: &Grid) -> Result<(), SaveError> {
    writeln!(out, "{} {}", grid.size_x(), grid.size_y())?;
    let mut line = String::with_capacity(grid.size_x() as usize + 1);
    for row in grid.rows() {
        line.clear();
        for cell in row {
            line.push(if cell.state { GLYPH_ALIVE } else { GLYPH_DEAD });
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Reads a grid back: creates a fresh all-dead grid of the saved size, then
/// revives each saved live cell.
pub fn read_grid<R: BufRead>(input: R) -> Result<Grid, SaveError> {
    let mut lines = input.lines();
    let header = lines.next().transpose()?.unwrap_or_default();
    let mut dims = header.split_whitespace().map(|tok| tok.parse::<u32>());
    let (width, height) = match (dims.next(), dims.next(), dims.next()) {
        (Some(Ok(w)), Some(Ok(h)), None) => (w, h),
        _ => return Err(SaveError::Header { header }),
    };

    let mut grid = Grid::new(width as i32, height as i32)?;
    let mut rows_read = 0;
    for (y, line) in lines.take(height as usize).enumerate() {
        let line = line?;
        rows_read += 1;
        let mut cells = 0;
        for (x, glyph) in line.chars().enumerate() {
            match glyph {
                GLYPH_ALIVE => grid.set_alive(x as u32, y as u32)?,
                GLYPH_DEAD => {}
                _ => return Err(SaveError::Glyph { row: y, glyph }),
            }
            cells += 1;
        }
        if cells != width as usize {
            return Err(SaveError::Row {
                row: y,
                found: cells,
                expected: width as usize,
            });
        }
    }
    if rows_read < height as usize {
        return Err(SaveError::Truncated {
            found: rows_read,
            expected: height as usize,
        });
    }
    Ok(grid)
}

/// Saves to `path`, creating the parent directory if needed.
pub fn save_to_path(path: &Path, grid: &Grid) -> Result<(), SaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    write_grid(&mut out, grid)?;
    out.flush()?;
    log::info!("saved {}x{} grid to {}", grid.size_x(), grid.size_y(), path.display());
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Grid, SaveError> {
    let grid = read_grid(BufReader::new(File::open(path)?))?;
    log::info!(
        "loaded {}x{} grid from {}",
        grid.size_x(),
        grid.size_y(),
        path.display()
    );
    Ok(grid)
}

/// Age of the save file at `path`, if it exists and the filesystem reports
/// modification times.
pub fn save_age(path: &Path) -> Option<std::time::Duration> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    modified.elapsed().ok()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{read_grid, write_grid, SaveError};
    use crate::grid::Grid;

    #[test]
    fn round_trip_preserves_dimensions_and_states() {
        let mut grid = Grid::new(10, 7).unwrap();
        // An arbitrary pattern, including a ghost that must NOT round-trip
        // as alive.
        for (x, y) in [(0, 0), (4, 2), (5, 2), (6, 2), (3, 6)] {
            grid.set_alive(x, y).unwrap();
        }
        grid.set_dead(4, 2).unwrap();

        let mut buf = Vec::new();
        write_grid(&mut buf, &grid).unwrap();
        let loaded = read_grid(Cursor::new(buf)).unwrap();

        assert_eq!(loaded.size_x(), grid.size_x());
        assert_eq!(loaded.size_y(), grid.size_y());
        for y in 0..grid.size_y() {
            for x in 0..grid.size_x() {
                assert_eq!(
                    loaded.get(x, y).state,
                    grid.get(x, y).state,
                    "state mismatch at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn written_form_is_the_documented_text_layout() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set_alive(1, 0).unwrap();
        let mut buf = Vec::new();
        write_grid(&mut buf, &grid).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "3 2\n.o.\n...\n");
    }

    #[test]
    fn malformed_header_is_rejected() {
        let err = read_grid(Cursor::new("3 two\n...\n...\n")).unwrap_err();
        assert!(matches!(err, SaveError::Header { .. }));
        let err = read_grid(Cursor::new("")).unwrap_err();
        assert!(matches!(err, SaveError::Header { .. }));
    }

    #[test]
    fn short_row_is_rejected() {
        let err = read_grid(Cursor::new("3 2\n..\n...\n")).unwrap_err();
        assert!(matches!(err, SaveError::Row { row: 0, .. }));
    }

    #[test]
    fn truncated_file_is_rejected() {
        // Fewer data rows than the header promises must not load as an
        // all-dead remainder.
        let err = read_grid(Cursor::new("3 2\n.o.\n")).unwrap_err();
        assert!(matches!(
            err,
            SaveError::Truncated {
                found: 1,
                expected: 2
            }
        ));
        let err = read_grid(Cursor::new("3 2\n")).unwrap_err();
        assert!(matches!(err, SaveError::Truncated { found: 0, .. }));
    }

    #[test]
    fn unknown_glyph_is_rejected() {
        let err = read_grid(Cursor::new("3 2\n.x.\n...\n")).unwrap_err();
        assert!(matches!(err, SaveError::Glyph { glyph: 'x', .. }));
    }
}

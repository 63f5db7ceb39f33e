use super::tetromino::Tetromino;

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Filled = 1,
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_filled(self) -> bool {
        self == Cell::Filled
    }
}

/// First boundary a piece crosses, as reported by [`Board::out_of_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum OutOfBounds {
    None,
    Left,
    Right,
    Bottom,
}

/// The playfield grid.
///
/// Row 0 is the top. Pieces may extend above row 0 (negative `y`); those
/// cells are never considered collisions and are dropped when a piece locks.
///
/// # Example
///
/// ```
/// use facetris_engine::{Board, Tetromino, TetrominoKind};
///
/// let mut board = Board::new(22, 10);
/// let piece = Tetromino::new(TetrominoKind::O, 3, 0);
///
/// assert!(board.is_valid_position(&piece, 0, 20));
/// assert!(!board.is_valid_position(&piece, 0, 21));
///
/// board.fill_piece(&piece.moved(0, 20));
/// assert!(!board.is_valid_position(&piece, 0, 19));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates an empty board with `height` rows of `width` cells.
    #[must_use]
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Cell::Empty; width]; height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Returns the cell at `(x, y)`, or `None` outside the board.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Sets a single cell. Coordinates outside the board are ignored.
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    /// Returns `true` if every cell of row `y` is filled. A zero-width row
    /// is never full.
    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        let row = &self.rows[y];
        !row.is_empty() && row.iter().all(|c| c.is_filled())
    }

    /// Returns `true` if row 0 has any filled cell.
    #[must_use]
    pub fn is_top_row_filled(&self) -> bool {
        self.rows
            .first()
            .is_some_and(|row| row.iter().any(|c| c.is_filled()))
    }

    /// Removes full rows and returns how many were removed.
    ///
    /// Scans bottom to top. Rows above a removed row shift down by one and an
    /// empty row appears at the top; the same index is then checked again,
    /// since a new row has moved into it.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut count = 0;
        let mut y = self.height;
        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                count += 1;
                self.rows.remove(row);
                self.rows.insert(0, vec![Cell::Empty; self.width]);
            } else {
                y -= 1;
            }
        }
        count
    }

    /// Returns `true` if `piece`, shifted by `(dx, dy)`, fits on the board.
    ///
    /// An occupied cell is invalid when its `x` is outside `[0, width)`, its
    /// `y` is at or below `height`, or it lands on a filled cell. Cells above
    /// the top edge are allowed.
    #[must_use]
    pub fn is_valid_position(&self, piece: &Tetromino, dx: i32, dy: i32) -> bool {
        piece.occupied_cells().all(|(x, y)| {
            let (x, y) = (x + dx, y + dy);
            if x < 0 || x >= self.width_i32() || y >= self.height_i32() {
                return false;
            }
            y < 0 || self.cell(x, y).is_some_and(Cell::is_empty)
        })
    }

    /// Returns the first boundary crossed by an occupied cell of `piece`.
    ///
    /// Cells are scanned row by row; for each cell left is checked before
    /// right, and right before bottom.
    #[must_use]
    pub fn out_of_bounds(&self, piece: &Tetromino) -> OutOfBounds {
        for (x, y) in piece.occupied_cells() {
            if x < 0 {
                return OutOfBounds::Left;
            }
            if x >= self.width_i32() {
                return OutOfBounds::Right;
            }
            if y >= self.height_i32() {
                return OutOfBounds::Bottom;
            }
        }
        OutOfBounds::None
    }

    /// Returns `true` if an occupied cell of `piece` that lies on the board
    /// covers a filled cell.
    #[must_use]
    pub fn is_overlapping(&self, piece: &Tetromino) -> bool {
        piece
            .occupied_cells()
            .any(|(x, y)| self.cell(x, y).is_some_and(Cell::is_filled))
    }

    /// Writes the occupied cells of `piece` into the board.
    ///
    /// Cells outside the board are skipped.
    pub fn fill_piece(&mut self, piece: &Tetromino) {
        for (x, y) in piece.occupied_cells() {
            self.set_cell(x, y, Cell::Filled);
        }
    }

    fn width_i32(&self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX)
    }

    fn height_i32(&self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Shape, TetrominoKind};

    fn fill_row(board: &mut Board, y: i32) {
        for x in 0..10 {
            board.set_cell(x, y, Cell::Filled);
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(22, 10);
        assert_eq!(board.height(), 22);
        assert_eq!(board.width(), 10);
        assert_eq!(board.rows().count(), 22);
        assert!(board.rows().all(|row| row.len() == 10));
        assert!(board.rows().flatten().all(|c| c.is_empty()));
        assert!(!board.is_top_row_filled());
    }

    #[test]
    fn test_clear_without_full_rows_changes_nothing() {
        let mut board = Board::new(22, 10);
        board.set_cell(0, 21, Cell::Filled);
        board.set_cell(4, 20, Cell::Filled);
        board.set_cell(9, 5, Cell::Filled);
        let before = board.clone();

        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_single_row_shifts_rows_down() {
        let mut board = Board::new(22, 10);
        fill_row(&mut board, 15);
        board.set_cell(2, 14, Cell::Filled);
        board.set_cell(7, 16, Cell::Filled);

        assert!(board.is_row_full(15));
        assert_eq!(board.clear_full_rows(), 1);

        // Row above moved down into the cleared index, row below untouched.
        assert_eq!(board.cell(2, 15), Some(Cell::Filled));
        assert_eq!(board.cell(2, 14), Some(Cell::Empty));
        assert_eq!(board.cell(7, 16), Some(Cell::Filled));
        assert!(!board.is_row_full(15));
        assert!(board.rows().next().unwrap().iter().all(|c| c.is_empty()));
        assert_eq!(board.rows().flatten().filter(|c| c.is_filled()).count(), 2);
    }

    #[test]
    fn test_clear_adjacent_rows_rechecks_index() {
        let mut board = Board::new(22, 10);
        fill_row(&mut board, 21);
        fill_row(&mut board, 20);
        fill_row(&mut board, 18);
        board.set_cell(3, 19, Cell::Filled);

        assert_eq!(board.clear_full_rows(), 3);
        assert_eq!(board.cell(3, 21), Some(Cell::Filled));
        assert_eq!(board.rows().flatten().filter(|c| c.is_filled()).count(), 1);
    }

    #[test]
    fn test_zero_width_board_clears_nothing() {
        let mut board = Board::new(3, 0);
        assert!(!board.is_row_full(0));
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board.height(), 3);
    }

    #[test]
    fn test_valid_position_bounds() {
        let board = Board::new(22, 10);
        let piece = Tetromino::new(TetrominoKind::I, 3, 0);

        assert!(board.is_valid_position(&piece, 0, 0));
        assert!(board.is_valid_position(&piece, -3, 0));
        assert!(!board.is_valid_position(&piece, -4, 0));
        assert!(board.is_valid_position(&piece, 3, 0));
        assert!(!board.is_valid_position(&piece, 4, 0));
        assert!(board.is_valid_position(&piece, 0, 21));
        assert!(!board.is_valid_position(&piece, 0, 22));
        // Above the top edge is fine.
        assert!(board.is_valid_position(&piece, 0, -5));
    }

    #[test]
    fn test_valid_position_detects_filled_cells() {
        let mut board = Board::new(22, 10);
        board.set_cell(5, 10, Cell::Filled);
        let piece = Tetromino::new(TetrominoKind::I, 3, 0);

        assert!(!board.is_valid_position(&piece, 0, 10));
        assert!(board.is_valid_position(&piece, 0, 9));
        assert!(board.is_valid_position(&piece, 3, 10));
    }

    #[test]
    fn test_empty_shape_is_always_valid() {
        let board = Board::new(22, 10);
        let empty = Tetromino::from_shape(
            TetrominoKind::T,
            Shape::from_rows(vec![vec![false; 3]; 2]),
            0,
            0,
        );
        for (dx, dy) in [(0, 0), (-100, 0), (100, 0), (0, 100), (-7, -7), (50, 50)] {
            assert!(board.is_valid_position(&empty, dx, dy));
        }
    }

    #[test]
    fn test_out_of_bounds_direction() {
        let board = Board::new(22, 10);
        let piece = Tetromino::new(TetrominoKind::O, 0, 0);

        assert_eq!(board.out_of_bounds(&piece), OutOfBounds::None);
        assert_eq!(board.out_of_bounds(&piece.moved(-1, 0)), OutOfBounds::Left);
        assert_eq!(board.out_of_bounds(&piece.moved(9, 0)), OutOfBounds::Right);
        assert_eq!(board.out_of_bounds(&piece.moved(0, 21)), OutOfBounds::Bottom);
        // Top edge is not a boundary.
        assert!(board.out_of_bounds(&piece.moved(0, -3)).is_none());
    }

    #[test]
    fn test_overlap_ignores_cells_off_board() {
        let mut board = Board::new(22, 10);
        board.set_cell(0, 0, Cell::Filled);
        let piece = Tetromino::new(TetrominoKind::O, 0, 0);

        assert!(board.is_overlapping(&piece));
        assert!(!board.is_overlapping(&piece.moved(0, -2)));
        assert!(!board.is_overlapping(&piece.moved(-5, 0)));
    }

    #[test]
    fn test_fill_piece_skips_cells_above_top() {
        let mut board = Board::new(22, 10);
        let piece = Tetromino::new(TetrominoKind::L, 0, -2);
        board.fill_piece(&piece);

        // Only the bottom row of the L (two cells) lands on the board.
        assert_eq!(board.cell(0, 0), Some(Cell::Filled));
        assert_eq!(board.cell(1, 0), Some(Cell::Filled));
        assert_eq!(board.rows().flatten().filter(|c| c.is_filled()).count(), 2);
        assert!(board.is_top_row_filled());
    }

    #[test]
    fn test_cell_outside_board() {
        let mut board = Board::new(4, 4);
        assert_eq!(board.cell(-1, 0), None);
        assert_eq!(board.cell(0, 4), None);
        board.set_cell(10, 10, Cell::Filled);
        assert!(board.rows().flatten().all(|c| c.is_empty()));
    }
}

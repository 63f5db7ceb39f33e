use crate::{
    MoveError, PieceCollisionError, RotationError,
    core::{
        board::Board,
        tetromino::{Tetromino, TetrominoKind},
    },
};

/// Result of a scheduled drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// There was no falling piece.
    Idle,
    /// The piece moved down one row.
    Moved,
    /// The piece could not move and was locked into the board.
    Locked { cleared_rows: usize },
}

/// Board plus the falling piece.
///
/// The falling piece is absent between a lock and the next spawn.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Option<Tetromino>,
    spawn: (i32, i32),
}

impl GameField {
    #[must_use]
    pub fn new(width: usize, height: usize, spawn: (i32, i32)) -> Self {
        Self {
            board: Board::new(height, width),
            falling_piece: None,
            spawn,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for hosts that prepare a layout.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&Tetromino> {
        self.falling_piece.as_ref()
    }

    #[must_use]
    pub fn has_falling_piece(&self) -> bool {
        self.falling_piece.is_some()
    }

    /// Clears the board and removes the falling piece.
    pub fn reset(&mut self) {
        self.board = Board::new(self.board.height(), self.board.width());
        self.falling_piece = None;
    }

    /// Places a fresh piece of `kind` at the spawn origin.
    ///
    /// Spawning never fails; a blocked spawn shows up as a top-out after the
    /// piece locks. A piece spawned over filled cells may lock over them, which
    /// is accepted because that lock fills row 0 and ends the round.
    pub fn spawn(&mut self, kind: TetrominoKind) {
        let (x, y) = self.spawn;
        tracing::debug!(kind = %kind.as_char(), x, y, "piece spawned");
        self.falling_piece = Some(Tetromino::new(kind, x, y));
    }

    pub fn set_falling_piece(&mut self, piece: Tetromino) -> Result<(), PieceCollisionError> {
        if !self.board.is_valid_position(&piece, 0, 0) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = Some(piece);
        Ok(())
    }

    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<(), MoveError> {
        let piece = self
            .falling_piece
            .as_mut()
            .ok_or(MoveError::NoFallingPiece)?;
        if !self.board.is_valid_position(piece, dx, dy) {
            return Err(MoveError::PieceCollision(PieceCollisionError));
        }
        piece.move_by(dx, dy);
        Ok(())
    }

    pub fn try_move_left(&mut self) -> Result<(), MoveError> {
        self.try_move(-1, 0)
    }

    pub fn try_move_right(&mut self) -> Result<(), MoveError> {
        self.try_move(1, 0)
    }

    pub fn try_soft_drop(&mut self) -> Result<(), MoveError> {
        self.try_move(0, 1)
    }

    /// Rotates the falling piece clockwise, nudging it back into place.
    ///
    /// The rotated piece is pushed right while it sticks out on the left,
    /// left while it sticks out on the right, then up while it sticks out at
    /// the bottom or overlaps filled cells. Each push is bounded by the
    /// rotated shape's size. If the piece still does not fit, the shape,
    /// rotation and position are all left as they were.
    pub fn try_rotate(&mut self) -> Result<(), RotationError> {
        let piece = self
            .falling_piece
            .as_ref()
            .ok_or(RotationError::NoFallingPiece)?;

        let mut rotated = piece.rotated();
        let width = rotated.shape().width();
        let height = rotated.shape().height();

        let board = &self.board;
        nudge(&mut rotated, (1, 0), width, |p| board.out_of_bounds(p).is_left());
        nudge(&mut rotated, (-1, 0), width, |p| {
            board.out_of_bounds(p).is_right()
        });
        nudge(&mut rotated, (0, -1), height, |p| {
            board.out_of_bounds(p).is_bottom() || board.is_overlapping(p)
        });

        if !self.board.is_valid_position(&rotated, 0, 0) {
            tracing::debug!(kind = %rotated.kind().as_char(), "rotation rolled back");
            return Err(RotationError::Uncorrectable);
        }
        self.falling_piece = Some(rotated);
        Ok(())
    }

    /// Writes the falling piece into the board and clears full rows.
    ///
    /// Returns the number of cleared rows, or `None` without a falling piece.
    pub fn lock(&mut self) -> Option<usize> {
        let piece = self.falling_piece.take()?;
        self.board.fill_piece(&piece);
        let cleared_rows = self.board.clear_full_rows();
        tracing::debug!(kind = %piece.kind().as_char(), cleared_rows, "piece locked");
        Some(cleared_rows)
    }

    /// Moves the falling piece down one row, or locks it if it cannot move.
    pub fn step_down_or_lock(&mut self) -> DropOutcome {
        match self.try_soft_drop() {
            Ok(()) => DropOutcome::Moved,
            Err(MoveError::NoFallingPiece) => DropOutcome::Idle,
            Err(MoveError::PieceCollision(_)) => match self.lock() {
                Some(cleared_rows) => DropOutcome::Locked { cleared_rows },
                None => DropOutcome::Idle,
            },
        }
    }
}

fn nudge(
    piece: &mut Tetromino,
    (dx, dy): (i32, i32),
    limit: usize,
    mut needs_push: impl FnMut(&Tetromino) -> bool,
) {
    for _ in 0..limit {
        if !needs_push(piece) {
            return;
        }
        piece.move_by(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    fn field_with(kind: TetrominoKind, x: i32, y: i32) -> GameField {
        let mut field = GameField::new(10, 22, (3, 0));
        field.falling_piece = Some(Tetromino::new(kind, x, y));
        field
    }

    #[test]
    fn test_spawn_at_origin() {
        let mut field = GameField::new(10, 22, (3, 0));
        assert!(!field.has_falling_piece());
        field.spawn(TetrominoKind::T);
        let piece = field.falling_piece().unwrap();
        assert_eq!(piece.position(), (3, 0));
        assert_eq!(piece.rotation().degrees(), 0);
    }

    #[test]
    fn test_moves_are_rejected_at_walls() {
        let mut field = field_with(TetrominoKind::O, 0, 0);
        assert_eq!(
            field.try_move_left(),
            Err(MoveError::PieceCollision(PieceCollisionError))
        );
        assert_eq!(field.falling_piece().unwrap().position(), (0, 0));

        assert!(field.try_move_right().is_ok());
        assert_eq!(field.falling_piece().unwrap().position(), (1, 0));
    }

    #[test]
    fn test_moves_without_piece() {
        let mut field = GameField::new(10, 22, (3, 0));
        assert_eq!(field.try_soft_drop(), Err(MoveError::NoFallingPiece));
        assert_eq!(field.try_rotate(), Err(RotationError::NoFallingPiece));
        assert_eq!(field.step_down_or_lock(), DropOutcome::Idle);
        assert_eq!(field.lock(), None);
    }

    #[test]
    fn test_rotation_nudges_off_right_wall() {
        // Vertical I at the right edge becomes horizontal and must move left.
        let vertical = Tetromino::new(TetrominoKind::I, 0, 5).rotated();
        let mut field = GameField::new(10, 22, (3, 0));
        field.set_falling_piece(vertical.moved(9, 0)).unwrap();

        field.try_rotate().unwrap();
        let piece = field.falling_piece().unwrap();
        assert_eq!(piece.shape().width(), 4);
        assert_eq!(piece.position(), (6, 5));
        assert_eq!(piece.rotation().degrees(), 180);
    }

    #[test]
    fn test_rotation_nudges_up_from_floor() {
        // Horizontal I on the floor becomes 4 tall and must move up 3 rows.
        let mut field = field_with(TetrominoKind::I, 3, 21);
        field.try_rotate().unwrap();
        let piece = field.falling_piece().unwrap();
        assert_eq!(piece.position(), (3, 18));
        assert_eq!(piece.shape().height(), 4);
    }

    #[test]
    fn test_rotation_nudges_up_over_blocks() {
        let mut field = field_with(TetrominoKind::I, 3, 10);
        field.board_mut().set_cell(3, 12, Cell::Filled);

        field.try_rotate().unwrap();
        // Rows 10..=13 would cover (3, 12); lifted until the column ends at row 11.
        assert_eq!(field.falling_piece().unwrap().position(), (3, 8));
    }

    #[test]
    fn test_failed_rotation_restores_everything() {
        // An I lying in a one-row slot under a ceiling cannot stand up.
        let mut field = field_with(TetrominoKind::I, 3, 21);
        for y in 0..21 {
            field.board_mut().set_cell(3, y, Cell::Filled);
        }
        let before = field.falling_piece().cloned();

        assert_eq!(field.try_rotate(), Err(RotationError::Uncorrectable));
        assert_eq!(field.falling_piece().cloned(), before);
        assert_eq!(field.falling_piece().unwrap().rotation().degrees(), 0);
    }

    #[test]
    fn test_step_down_then_lock() {
        let mut field = field_with(TetrominoKind::O, 4, 19);
        assert_eq!(field.step_down_or_lock(), DropOutcome::Moved);
        assert_eq!(
            field.step_down_or_lock(),
            DropOutcome::Locked { cleared_rows: 0 }
        );
        assert!(!field.has_falling_piece());
        assert_eq!(field.board().cell(4, 21), Some(Cell::Filled));
        assert_eq!(field.board().cell(5, 20), Some(Cell::Filled));
    }

    #[test]
    fn test_lock_clears_completed_row() {
        let mut field = field_with(TetrominoKind::I, 6, 21);
        for x in 0..6 {
            field.board_mut().set_cell(x, 21, Cell::Filled);
        }
        assert_eq!(field.lock(), Some(1));
        assert!(field.board().rows().flatten().all(|c| c.is_empty()));
    }

    #[test]
    fn test_blocked_spawn_locks_into_top_row() {
        let mut field = GameField::new(10, 22, (3, 0));
        for x in 1..10 {
            field.board_mut().set_cell(x, 1, Cell::Filled);
        }
        field.spawn(TetrominoKind::O);
        assert_eq!(
            field.step_down_or_lock(),
            DropOutcome::Locked { cleared_rows: 0 }
        );
        assert!(field.board().is_top_row_filled());
    }

    #[test]
    fn test_reset_clears_board() {
        let mut field = field_with(TetrominoKind::O, 4, 20);
        field.lock();
        field.spawn(TetrominoKind::S);
        field.reset();
        assert!(!field.has_falling_piece());
        assert!(field.board().rows().flatten().all(|c| c.is_empty()));
        assert_eq!(field.board().height(), 22);
    }
}

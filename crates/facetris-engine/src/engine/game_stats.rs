use serde::Serialize;

/// Points awarded for clearing `rows` rows with a single lock.
///
/// Triangular numbers times 100: 1 row is 100, 2 rows 300, 3 rows 600 and
/// 4 rows 1000.
#[must_use]
pub const fn score_for_rows(rows: usize) -> usize {
    rows * (rows + 1) / 2 * 100
}

/// Session statistics: score, locked pieces and cleared rows.
///
/// # Example
///
/// ```
/// use facetris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(2);
/// stats.complete_piece_drop(0);
///
/// assert_eq!(stats.score(), 300);
/// assert_eq!(stats.completed_pieces(), 2);
/// assert_eq!(stats.row_cleared_counter(), &[1, 0, 1, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_rows: usize,
    row_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_rows: 0,
            row_cleared_counter: [0; 5],
        }
    }

    /// Current score. Never decreases within a session.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_rows(&self) -> usize {
        self.total_cleared_rows
    }

    /// Histogram of locks by rows cleared; index `n` counts locks that
    /// cleared `n` rows.
    #[must_use]
    pub const fn row_cleared_counter(&self) -> &[usize; 5] {
        &self.row_cleared_counter
    }

    /// Records one locked piece.
    pub const fn complete_piece_drop(&mut self, cleared_rows: usize) {
        self.completed_pieces += 1;
        self.total_cleared_rows += cleared_rows;
        if cleared_rows < self.row_cleared_counter.len() {
            self.row_cleared_counter[cleared_rows] += 1;
        }
        self.score += score_for_rows(cleared_rows);
    }
}

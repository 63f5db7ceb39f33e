use std::time::Duration;

use facetris_face::{
    Expression, ExpressionFlags, ExpressionThresholds, FaceTracker, GestureThresholds,
    HeadGesture, LandmarkSet, Observation,
};
use rand::Rng as _;
use serde::Serialize;

use crate::core::{board::Board, tetromino::Tetromino};

use super::{
    GameStats,
    game_field::{DropOutcome, GameField},
    input::{InputFrame, Key},
    piece_queue::{PieceQueue, PieceSeed},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameState {
    /// Waiting for the first start key.
    Start,
    Playing,
    /// The round is over; the start key begins a new one.
    ShowingScore,
}

/// Why a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    #[display("time up")]
    TimeUp,
    #[display("top out")]
    TopOut,
}

/// Session parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub board_width: usize,
    pub board_height: usize,
    /// Top-left origin of newly spawned pieces.
    pub spawn: (i32, i32),
    pub drop_interval: Duration,
    pub time_limit: Duration,
    /// Random when `None`.
    pub seed: Option<PieceSeed>,
    pub expression_thresholds: ExpressionThresholds,
    pub gesture_thresholds: GestureThresholds,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board_width: 10,
            board_height: 22,
            spawn: (3, 0),
            drop_interval: Duration::from_secs(2),
            time_limit: Duration::from_secs(180),
            seed: None,
            expression_thresholds: ExpressionThresholds::default(),
            gesture_thresholds: GestureThresholds::default(),
        }
    }
}

/// Result of a round, for printing or logging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub seed: PieceSeed,
    pub score: usize,
    pub stats: GameStats,
    pub end_reason: Option<EndReason>,
    pub play_time_secs: f64,
}

/// A game driven by host ticks, steered by keys and facial expressions.
///
/// The host calls [`tick`](Self::tick) at its own rate with the time elapsed
/// since the previous tick, and feeds expression input through
/// [`observe_landmarks`](Self::observe_landmarks) or
/// [`set_expression_flags`](Self::set_expression_flags) whenever it has a new
/// detection. Each playing tick runs, in order: the time-limit check, a spawn
/// if no piece is falling, left/right/down moves, rotation, the scheduled
/// drop, the top-out check, and release of the rotation latch.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    seed: PieceSeed,
    state: GameState,
    field: GameField,
    queue: PieceQueue,
    stats: GameStats,
    tracker: FaceTracker,
    flags: ExpressionFlags,
    clock: Duration,
    started_at: Duration,
    ended_at: Option<Duration>,
    last_drop_at: Duration,
    rotate_latched: bool,
    end_reason: Option<EndReason>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GameSession {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Self {
            seed,
            state: GameState::Start,
            field: GameField::new(config.board_width, config.board_height, config.spawn),
            queue: PieceQueue::with_seed(seed),
            stats: GameStats::new(),
            tracker: FaceTracker::new(config.expression_thresholds, config.gesture_thresholds),
            flags: ExpressionFlags::default(),
            clock: Duration::ZERO,
            started_at: Duration::ZERO,
            ended_at: None,
            last_drop_at: Duration::ZERO,
            rotate_latched: false,
            end_reason: None,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.field.board()
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&Tetromino> {
        self.field.falling_piece()
    }

    #[must_use]
    pub fn queue(&self) -> &PieceQueue {
        &self.queue
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    /// Expression that picked the upcoming piece, if any.
    #[must_use]
    pub fn drawn_expression(&self) -> Option<Expression> {
        self.queue.drawn_expression()
    }

    #[must_use]
    pub fn expression_flags(&self) -> ExpressionFlags {
        self.flags
    }

    #[must_use]
    pub fn head_gesture(&self) -> HeadGesture {
        self.tracker.gesture()
    }

    #[must_use]
    pub fn tracker(&self) -> &FaceTracker {
        &self.tracker
    }

    /// Time played in the current (or last) round.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        match self.state {
            GameState::Start => Duration::ZERO,
            GameState::Playing => self.clock.saturating_sub(self.started_at),
            GameState::ShowingScore => self
                .ended_at
                .unwrap_or(self.clock)
                .saturating_sub(self.started_at),
        }
    }

    #[must_use]
    pub fn remaining_time(&self) -> Duration {
        self.config.time_limit.saturating_sub(self.elapsed())
    }

    /// Feeds one detection cycle to the face tracker.
    ///
    /// `None` (no face) keeps the previous flags.
    pub fn observe_landmarks(&mut self, landmarks: Option<&LandmarkSet>) -> Observation {
        let observation = self.tracker.observe(landmarks);
        if observation.is_calibrated() || observation.is_updated() {
            self.flags = self.tracker.flags();
        }
        observation
    }

    /// Replaces the current flags, for hosts that classify elsewhere.
    pub fn set_expression_flags(&mut self, flags: ExpressionFlags) {
        self.flags = flags;
    }

    /// Advances the session by `delta`.
    pub fn tick(&mut self, delta: Duration, input: &InputFrame) {
        self.clock += delta;
        match self.state {
            GameState::Start | GameState::ShowingScore => {
                if input.is_just_pressed(Key::Space) {
                    self.start();
                }
            }
            GameState::Playing => self.tick_playing(input),
        }
    }

    /// Begins a new round: empty board, fresh queue, new calibration.
    pub fn start(&mut self) {
        let restart = !self.state.is_start();
        self.field.reset();
        self.queue.refill();
        self.stats = GameStats::new();
        self.tracker.reset();
        self.flags = ExpressionFlags::default();
        self.started_at = self.clock;
        self.ended_at = None;
        self.last_drop_at = self.clock;
        self.rotate_latched = false;
        self.end_reason = None;
        self.state = GameState::Playing;
        tracing::info!(restart, seed = %self.seed, "session started");
    }

    fn tick_playing(&mut self, input: &InputFrame) {
        if self.elapsed() >= self.config.time_limit {
            self.finish(EndReason::TimeUp);
            return;
        }

        if !self.field.has_falling_piece() {
            let kind = self.queue.shift(&self.flags);
            self.field.spawn(kind);
            self.last_drop_at = self.clock;
        }

        if input.is_just_pressed(Key::Left) {
            self.field.try_move_left().ok();
        }
        if input.is_just_pressed(Key::Right) {
            self.field.try_move_right().ok();
        }
        if input.is_pressed(Key::Down) {
            self.field.try_soft_drop().ok();
        }

        if input.is_pressed(Key::Up) && !self.rotate_latched {
            self.field.try_rotate().ok();
            self.rotate_latched = true;
        }

        if self.clock.saturating_sub(self.last_drop_at) >= self.config.drop_interval {
            if let DropOutcome::Locked { cleared_rows } = self.field.step_down_or_lock() {
                self.stats.complete_piece_drop(cleared_rows);
                if cleared_rows > 0 {
                    tracing::debug!(cleared_rows, score = self.stats.score(), "rows cleared");
                }
                if self.field.board().is_top_row_filled() {
                    self.finish(EndReason::TopOut);
                    return;
                }
            }
            self.last_drop_at = self.clock;
        }

        if !input.is_pressed(Key::Up) {
            self.rotate_latched = false;
        }
    }

    fn finish(&mut self, reason: EndReason) {
        self.ended_at = Some(self.clock);
        self.end_reason = Some(reason);
        self.state = GameState::ShowingScore;
        tracing::info!(%reason, score = self.stats.score(), "session ended");
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.seed,
            score: self.stats.score(),
            stats: self.stats.clone(),
            end_reason: self.end_reason,
            play_time_secs: self.elapsed().as_secs_f64(),
        }
    }
}

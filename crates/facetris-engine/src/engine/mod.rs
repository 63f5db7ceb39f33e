//! Game logic built on the core board and tetromino types.
//!
//! - [`GameField`] - board plus falling piece, with moves, rotation
//!   correction and locking
//! - [`PieceQueue`] - "next" piece and per-expression candidates, with the
//!   weighted expression draw in [`select_candidate`]
//! - [`GameStats`] - score and row-clear counters
//! - [`InputFrame`] - pressed and just-pressed keys for one tick
//! - [`GameSession`] - the Start / Playing / `ShowingScore` state machine
//!
//! # Game Flow
//!
//! 1. The session waits in [`GameState::Start`] until Space is pressed
//! 2. Each tick spawns the queued piece when none is falling, applies key
//!    input, and drops the piece one row per drop interval
//! 3. A piece that cannot drop is locked, full rows are cleared and scored
//! 4. The round ends on the time limit or when row 0 holds a block
//!
//! Facial expressions only influence *which* piece comes next: the flags at
//! spawn time decide which candidate is promoted in the [`PieceQueue`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use facetris_engine::{GameSession, InputFrame, Key, SessionConfig};
//!
//! let mut session = GameSession::new(SessionConfig::default());
//! let tick = Duration::from_millis(16);
//!
//! session.tick(tick, &InputFrame::tap(Key::Space));
//! assert!(session.state().is_playing());
//!
//! session.tick(tick, &InputFrame::IDLE);
//! session.tick(tick, &InputFrame::tap(Key::Left));
//!
//! let piece = session.falling_piece().unwrap();
//! assert_eq!(piece.position(), (2, 0));
//! ```

pub use self::{game_field::*, game_session::*, game_stats::*, input::*, piece_queue::*};

mod game_field;
mod game_session;
mod game_stats;
mod input;
mod piece_queue;

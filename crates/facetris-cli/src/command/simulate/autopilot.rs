use facetris_engine::{GameState, InputFrame, Key, KeySet};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

/// Longest a chosen key is held, in ticks.
const MAX_HOLD_TICKS: u32 = 8;

/// Random key presser standing in for a player.
///
/// Holds Space until the round starts, then holds a random key (or nothing)
/// for a random number of ticks. Each hold is followed by one released tick
/// so that repeated Left/Right choices register as separate presses.
#[derive(Debug, Clone)]
pub(crate) struct Autopilot {
    rng: Pcg32,
    previous: KeySet,
    held: KeySet,
    hold_ticks: u32,
}

impl Autopilot {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            previous: KeySet::EMPTY,
            held: KeySet::EMPTY,
            hold_ticks: 0,
        }
    }

    /// Input for the next tick, given the session state before it.
    pub(crate) fn next_frame(&mut self, state: GameState) -> InputFrame {
        let keys = if state.is_playing() {
            self.playing_keys()
        } else {
            KeySet::single(Key::Space)
        };
        let frame = InputFrame::from_transition(self.previous, keys);
        self.previous = keys;
        frame
    }

    fn playing_keys(&mut self) -> KeySet {
        if self.hold_ticks == 0 {
            if self.held != KeySet::EMPTY {
                self.held = KeySet::EMPTY;
                return self.held;
            }
            self.held = match self.rng.random_range(0..6) {
                0 => KeySet::single(Key::Left),
                1 => KeySet::single(Key::Right),
                2 => KeySet::single(Key::Up),
                3 => KeySet::single(Key::Down),
                _ => KeySet::EMPTY,
            };
            self.hold_ticks = self.rng.random_range(1..=MAX_HOLD_TICKS);
        }
        self.hold_ticks -= 1;
        self.held
    }
}

use std::{fmt, str::FromStr};

use facetris_face::{Expression, ExpressionFlags};
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::TetrominoKind;

/// Number of candidate slots; one per [`Expression`].
pub const CANDIDATE_SLOTS: usize = Expression::COUNT;

/// Seed for deterministic piece generation.
///
/// A 128-bit seed written as 32 hexadecimal characters. The same seed gives
/// the same pieces for the same expression history.
///
/// # Example
///
/// ```
/// use facetris_engine::PieceSeed;
///
/// let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdef0123456789abcdef");
/// assert!("xyz".parse::<PieceSeed>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceSeedError {
    #[display("invalid hex: expected 32 characters, got {len}")]
    InvalidLength { len: usize },
    #[display("invalid hex: {input}")]
    InvalidDigit { input: String },
}

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError::InvalidLength { len: s.len() });
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParsePieceSeedError::InvalidDigit {
            input: s.to_owned(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Outcome of the weighted expression draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Candidate slot promoted to "next".
    pub slot: usize,
    /// The expression that won the draw, or `None` for the uniform fallback.
    pub expression: Option<Expression>,
}

/// Picks a candidate slot from the active expressions.
///
/// `[0, 100)` is split into `active.len()` bins of width `100 / len`; a
/// uniform draw picks the first bin whose upper bound exceeds it, and the
/// last bin absorbs any remainder. With no active expression the slot is
/// drawn uniformly from all candidate slots.
#[must_use]
pub fn select_candidate<R: Rng + ?Sized>(active: &[Expression], rng: &mut R) -> Selection {
    if active.is_empty() {
        return Selection {
            slot: rng.random_range(0..CANDIDATE_SLOTS),
            expression: None,
        };
    }

    let draw = rng.random_range(0..100);
    let expression = active[bin_index(draw, active.len())];

    Selection {
        slot: expression.index(),
        expression: Some(expression),
    }
}

/// Bin of `draw` when `[0, 100)` is split into `len` bins of width
/// `100 / len`. Draws past the last full bin belong to the last bin.
fn bin_index(draw: usize, len: usize) -> usize {
    (draw / (100 / len)).min(len - 1)
}

/// Upcoming pieces: one "next" piece plus a candidate per expression.
///
/// Every [`shift`](Self::shift) hands out "next", promotes the candidate of
/// the expression drawn from the current flags, and refills all candidate
/// slots with distinct kinds. All randomness comes from one seeded RNG.
///
/// # Example
///
/// ```
/// use facetris_engine::{PieceQueue, PieceSeed};
/// use facetris_face::{Expression, ExpressionFlags};
///
/// let mut queue = PieceQueue::with_seed(PieceSeed::from_bytes([7; 16]));
///
/// let mut flags = ExpressionFlags::default();
/// flags.set(Expression::Surprised, true);
///
/// let promoted = queue.candidate_for(Expression::Surprised);
/// let _current = queue.shift(&flags);
///
/// assert_eq!(queue.next(), promoted);
/// assert_eq!(queue.drawn_expression(), Some(Expression::Surprised));
/// ```
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: Pcg32,
    next: TetrominoKind,
    candidates: [TetrominoKind; CANDIDATE_SLOTS],
    drawn: Option<Expression>,
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceQueue {
    /// Creates a queue with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but deterministic.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut rng = Pcg32::from_seed(seed.0);
        let next = rng.random();
        let candidates = unique_batch(&mut rng);
        Self {
            rng,
            next,
            candidates,
            drawn: None,
        }
    }

    /// Draws a fresh "next" and candidate batch, continuing the same RNG.
    pub fn refill(&mut self) {
        self.next = self.rng.random();
        self.candidates = unique_batch(&mut self.rng);
        self.drawn = None;
    }

    #[must_use]
    pub fn next(&self) -> TetrominoKind {
        self.next
    }

    #[must_use]
    pub fn candidates(&self) -> &[TetrominoKind; CANDIDATE_SLOTS] {
        &self.candidates
    }

    #[must_use]
    pub fn candidate_for(&self, expression: Expression) -> TetrominoKind {
        self.candidates[expression.index()]
    }

    /// Expression that picked the current "next", if any.
    #[must_use]
    pub fn drawn_expression(&self) -> Option<Expression> {
        self.drawn
    }

    /// Returns the piece to play now and advances the queue.
    pub fn shift(&mut self, flags: &ExpressionFlags) -> TetrominoKind {
        let current = self.next;
        let selection = select_candidate(&flags.active(), &mut self.rng);
        self.next = self.candidates[selection.slot];
        self.drawn = selection.expression;
        self.candidates = unique_batch(&mut self.rng);
        tracing::debug!(
            current = %current.as_char(),
            next = %self.next.as_char(),
            slot = selection.slot,
            expression = selection.expression.map_or("none", Expression::label),
            "piece queue shifted"
        );
        current
    }
}

/// Draws `CANDIDATE_SLOTS` distinct kinds from a shuffled catalog.
fn unique_batch<R: Rng + ?Sized>(rng: &mut R) -> [TetrominoKind; CANDIDATE_SLOTS] {
    let mut kinds = TetrominoKind::ALL;
    kinds.shuffle(rng);
    let mut batch = [TetrominoKind::I; CANDIDATE_SLOTS];
    batch.copy_from_slice(&kinds[..CANDIDATE_SLOTS]);
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::from_seed([42; 16])
    }

    mod selector {
        use super::*;

        #[test]
        fn test_single_expression_always_wins() {
            let mut rng = rng();
            for expression in Expression::ALL {
                for _ in 0..200 {
                    let selection = select_candidate(&[expression], &mut rng);
                    assert_eq!(selection.slot, expression.index());
                    assert_eq!(selection.expression, Some(expression));
                }
            }
        }

        #[test]
        fn test_fallback_stays_in_range() {
            let mut rng = rng();
            let mut seen = [false; CANDIDATE_SLOTS];
            for _ in 0..1000 {
                let selection = select_candidate(&[], &mut rng);
                assert!(selection.slot < CANDIDATE_SLOTS);
                assert_eq!(selection.expression, None);
                seen[selection.slot] = true;
            }
            assert!(seen.iter().all(|&s| s));
        }

        #[test]
        fn test_only_active_expressions_are_drawn() {
            let mut rng = rng();
            let active = [Expression::Angry, Expression::SusBrow];
            let mut counts = [0; CANDIDATE_SLOTS];
            for _ in 0..1000 {
                let selection = select_candidate(&active, &mut rng);
                assert!(active.contains(&selection.expression.unwrap()));
                counts[selection.slot] += 1;
            }
            assert_eq!(counts[Expression::Smile.index()], 0);
            assert_eq!(counts[Expression::Surprised.index()], 0);
            // Two equal bins; both should come up often.
            assert!(counts[Expression::Angry.index()] > 300);
            assert!(counts[Expression::SusBrow.index()] > 300);
        }

        #[test]
        fn test_remainder_goes_to_last_bin() {
            // Three bins of width 33 cover [0, 99); draw 99 falls to the last.
            for (draw, bin) in [(0, 0), (32, 0), (33, 1), (65, 1), (66, 2), (98, 2), (99, 2)] {
                assert_eq!(bin_index(draw, 3), bin, "draw {draw}");
            }
            assert_eq!(bin_index(99, 1), 0);
            assert_eq!(bin_index(49, 2), 0);
            assert_eq!(bin_index(50, 2), 1);
            assert_eq!(bin_index(99, 4), 3);
        }
    }

    mod queue {
        use super::*;

        #[test]
        fn test_candidates_are_unique() {
            let mut queue = PieceQueue::with_seed(PieceSeed([1; 16]));
            for _ in 0..50 {
                let mut kinds = queue.candidates().to_vec();
                kinds.sort_by_key(|k| *k as u8);
                kinds.dedup();
                assert_eq!(kinds.len(), CANDIDATE_SLOTS);
                queue.shift(&ExpressionFlags::default());
            }
        }

        #[test]
        fn test_shift_promotes_selected_candidate() {
            let mut queue = PieceQueue::with_seed(PieceSeed([3; 16]));
            let mut flags = ExpressionFlags::default();
            flags.set(Expression::Angry, true);

            for _ in 0..20 {
                let next = queue.next();
                let promoted = queue.candidate_for(Expression::Angry);
                assert_eq!(queue.shift(&flags), next);
                assert_eq!(queue.next(), promoted);
                assert_eq!(queue.drawn_expression(), Some(Expression::Angry));
            }
        }

        #[test]
        fn test_fallback_records_no_expression() {
            let mut queue = PieceQueue::with_seed(PieceSeed([5; 16]));
            let before = *queue.candidates();
            queue.shift(&ExpressionFlags::default());
            assert_eq!(queue.drawn_expression(), None);
            assert!(before.contains(&queue.next()));
        }

        #[test]
        fn test_same_seed_same_pieces() {
            let seed = PieceSeed([
                0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
                0x77, 0x88,
            ]);
            let mut a = PieceQueue::with_seed(seed);
            let mut b = PieceQueue::with_seed(seed);
            let mut flags = ExpressionFlags::default();
            for i in 0..30 {
                flags.set(Expression::Smile, i % 3 == 0);
                flags.set(Expression::SusBrow, i % 2 == 0);
                assert_eq!(a.shift(&flags), b.shift(&flags));
                assert_eq!(a.candidates(), b.candidates());
            }
        }
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = PieceSeed([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_deserialize_uppercase_hex() {
            let json = "\"0123456789ABCDEFFEDCBA9876543210\"";
            let deserialized: PieceSeed = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized.0[0], 0x01);
            assert_eq!(deserialized.0[15], 0x10);
        }

        #[test]
        fn test_errors() {
            for json in [
                "\"ghijklmnopqrstuvwxyzghijklmnopqr\"",
                "\"0123456789abcdef0123456789abcde\"",
                "\"0123456789abcdef0123456789abcdef0\"",
                "\"\"",
            ] {
                let err = serde_json::from_str::<PieceSeed>(json).unwrap_err();
                assert!(err.to_string().contains("invalid hex"), "{json}");
            }
        }

        #[test]
        fn test_random_seed_round_trip() {
            let seed: PieceSeed = rand::rng().random();
            let parsed: PieceSeed = seed.to_string().parse().unwrap();
            assert_eq!(parsed, seed);
        }
    }
}

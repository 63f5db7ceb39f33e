/// Keys the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Key {
    Left = 0,
    Right = 1,
    Down = 2,
    Up = 3,
    Space = 4,
}

impl Key {
    pub const ALL: [Self; 5] = [Self::Left, Self::Right, Self::Down, Self::Up, Self::Space];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A small set of [`Key`]s.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySet(u8);

impl KeySet {
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn single(key: Key) -> Self {
        Self(key.bit())
    }

    #[must_use]
    pub const fn contains(self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub const fn insert(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = Key> {
        Key::ALL.into_iter().filter(move |&k| self.contains(k))
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for key in iter {
            set.insert(key);
        }
        set
    }
}

/// Key state for one tick.
///
/// `pressed` holds every key currently down; `just_pressed` holds keys that
/// went down since the previous tick.
///
/// # Example
///
/// ```
/// use facetris_engine::{InputFrame, Key, KeySet};
///
/// let before = KeySet::from_iter([Key::Up]);
/// let now = KeySet::from_iter([Key::Up, Key::Left]);
/// let frame = InputFrame::from_transition(before, now);
///
/// assert!(frame.is_pressed(Key::Up));
/// assert!(!frame.is_just_pressed(Key::Up));
/// assert!(frame.is_just_pressed(Key::Left));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputFrame {
    pressed: KeySet,
    just_pressed: KeySet,
}

impl InputFrame {
    /// No keys down.
    pub const IDLE: Self = Self {
        pressed: KeySet::EMPTY,
        just_pressed: KeySet::EMPTY,
    };

    #[must_use]
    pub const fn new(pressed: KeySet, just_pressed: KeySet) -> Self {
        Self {
            pressed,
            just_pressed,
        }
    }

    /// Derives the edge-triggered set from the previous and current keys.
    #[must_use]
    pub const fn from_transition(previous: KeySet, current: KeySet) -> Self {
        Self {
            pressed: current,
            just_pressed: current.difference(previous),
        }
    }

    /// A frame where `key` has just gone down.
    #[must_use]
    pub const fn tap(key: Key) -> Self {
        let keys = KeySet::single(key);
        Self::new(keys, keys)
    }

    /// A frame where `key` is held from an earlier tick.
    #[must_use]
    pub const fn hold(key: Key) -> Self {
        Self::new(KeySet::single(key), KeySet::EMPTY)
    }

    #[must_use]
    pub const fn pressed(&self) -> KeySet {
        self.pressed
    }

    #[must_use]
    pub const fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(key)
    }

    #[must_use]
    pub const fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(key)
    }
}

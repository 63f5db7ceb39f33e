use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

/// Display color of a tetromino kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Tetromino type, in catalog order.
///
/// Each kind owns an immutable template; instances copy it on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TetrominoKind {
    I = 0,
    O = 1,
    T = 2,
    L = 3,
    J = 4,
    S = 5,
    Z = 6,
}

impl Distribution<TetrominoKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TetrominoKind {
        TetrominoKind::ALL[rng.random_range(0..TetrominoKind::LEN)]
    }
}

const TEMPLATES: [&[&[u8]]; TetrominoKind::LEN] = [
    &[&[1, 1, 1, 1]],
    &[&[1, 1], &[1, 1]],
    &[&[0, 1, 0], &[1, 1, 1]],
    &[&[1, 0], &[1, 0], &[1, 1]],
    &[&[0, 1], &[0, 1], &[1, 1]],
    &[&[0, 1, 1], &[1, 1, 0]],
    &[&[1, 1, 0], &[0, 1, 1]],
];

const COLORS: [Rgb; TetrominoKind::LEN] = [
    Rgb(255, 0, 0),
    Rgb(0, 255, 0),
    Rgb(0, 0, 255),
    Rgb(255, 165, 0),
    Rgb(0, 255, 255),
    Rgb(255, 255, 0),
    Rgb(128, 0, 128),
];

impl TetrominoKind {
    /// Number of tetromino kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::L,
        Self::J,
        Self::S,
        Self::Z,
    ];

    /// The catalog template as rows of `0`/`1`.
    #[must_use]
    pub const fn template(self) -> &'static [&'static [u8]] {
        TEMPLATES[self as usize]
    }

    #[must_use]
    pub const fn color(self) -> Rgb {
        COLORS[self as usize]
    }

    /// Returns the single character representation of this kind.
    ///
    /// ```
    /// use facetris_engine::TetrominoKind;
    ///
    /// assert_eq!(TetrominoKind::J.as_char(), 'J');
    /// assert_eq!(TetrominoKind::from_char('J'), Some(TetrominoKind::J));
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::I => 'I',
            Self::O => 'O',
            Self::T => 'T',
            Self::L => 'L',
            Self::J => 'J',
            Self::S => 'S',
            Self::Z => 'Z',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::I),
            'O' => Some(Self::O),
            'T' => Some(Self::T),
            'L' => Some(Self::L),
            'J' => Some(Self::J),
            'S' => Some(Self::S),
            'Z' => Some(Self::Z),
            _ => None,
        }
    }
}

/// A rectangular occupancy matrix owned by one piece.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    /// Builds a shape from rows of equal length.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        Self { rows }
    }

    /// Deep-copies a catalog template.
    #[must_use]
    pub fn from_template(template: &[&[u8]]) -> Self {
        Self {
            rows: template
                .iter()
                .map(|row| row.iter().map(|&c| c != 0).collect())
                .collect(),
        }
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// Occupied cells as `(x, y)` offsets, row by row.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &c)| c)
                .map(move |(x, _)| (x, y))
        })
    }

    /// Rotates 90 degrees clockwise.
    ///
    /// A `rows × cols` matrix becomes `cols × rows`, with
    /// `new[x][rows - 1 - y] = old[y][x]`.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let (height, width) = (self.height(), self.width());
        let mut rows = vec![vec![false; height]; width];
        for (y, row) in self.rows.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                rows[x][height - 1 - y] = cell;
            }
        }
        Self { rows }
    }
}

/// Rotation state in degrees: 0, 90, 180 or 270.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rotation(u16);

impl Rotation {
    #[must_use]
    pub const fn degrees(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn clockwise(self) -> Self {
        Self((self.0 + 90) % 360)
    }
}

/// A live piece: its own shape copy, board position, and rotation state.
///
/// # Example
///
/// ```
/// use facetris_engine::{Tetromino, TetrominoKind};
///
/// let piece = Tetromino::new(TetrominoKind::T, 3, 0);
/// let turned = piece.rotated();
///
/// assert_eq!(turned.rotation().degrees(), 90);
/// assert_eq!(turned.shape().width(), 2);
/// assert_eq!(turned.shape().height(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tetromino {
    kind: TetrominoKind,
    shape: Shape,
    x: i32,
    y: i32,
    rotation: Rotation,
}

impl Tetromino {
    /// Instantiates a catalog piece at `(x, y)` with rotation 0.
    #[must_use]
    pub fn new(kind: TetrominoKind, x: i32, y: i32) -> Self {
        Self::from_shape(kind, Shape::from_template(kind.template()), x, y)
    }

    #[must_use]
    pub fn from_shape(kind: TetrominoKind, shape: Shape, x: i32, y: i32) -> Self {
        Self {
            kind,
            shape,
            x,
            y,
            rotation: Rotation::default(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> TetrominoKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.kind.color()
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Occupied cells in board coordinates.
    // Shapes are at most 4 cells wide.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied()
            .map(|(dx, dy)| (self.x + dx as i32, self.y + dy as i32))
    }

    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Returns a copy rotated 90 degrees clockwise around its top-left origin.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape.rotated(),
            x: self.x,
            y: self.y,
            rotation: self.rotation.clockwise(),
        }
    }
}

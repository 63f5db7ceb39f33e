pub use self::{board::*, tetromino::*};

pub(crate) mod board;
pub(crate) mod tetromino;

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when moving falling piece")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("no falling piece to move")]
    NoFallingPiece,
    #[display("piece colliding when moving falling piece")]
    PieceCollision(PieceCollisionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RotationError {
    #[display("no falling piece to rotate")]
    NoFallingPiece,
    #[display("rotated piece could not be placed, rotation rolled back")]
    Uncorrectable,
}

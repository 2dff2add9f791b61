// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Character ramp must contain at least one glyph")]
    EmptyRamp,
}

pub type Result<T> = std::result::Result<T, DomainError>;

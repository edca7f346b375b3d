//! Minimal error set for core-domain validation & parsing.

use core::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoreError {
    InvalidToken,
    DomainOutOfRange(&'static str),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidToken => write!(f, "invalid token"),
            CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
        }
    }
}

impl std::error::Error for CoreError {}

//! Room identifiers: six characters from `[A-Z0-9]`.
//!
//! Players type these in by hand, so parsing is case-insensitive and always
//! normalises to upper case.

use std::fmt;

use rand::Rng;
use thiserror::Error;

pub const ROOM_ID_LEN: usize = 6;
pub const ROOM_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// Parse a user-supplied id, upper-casing it first.
    pub fn parse(value: &str) -> Result<Self, RoomIdError> {
        let normalised = value.trim().to_ascii_uppercase();
        let found = normalised.chars().count();
        if found != ROOM_ID_LEN {
            return Err(RoomIdError::InvalidLength {
                expected: ROOM_ID_LEN,
                found,
            });
        }
        for (index, ch) in normalised.chars().enumerate() {
            if !ch.is_ascii() || !ROOM_ID_ALPHABET.contains(&(ch as u8)) {
                return Err(RoomIdError::InvalidCharacter { ch, index });
            }
        }
        Ok(RoomId(normalised))
    }

    /// Draw a random id. Uniqueness is the registry's job.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = (0..ROOM_ID_LEN)
            .map(|_| {
                let idx = rng.random_range(0..ROOM_ID_ALPHABET.len());
                char::from(ROOM_ID_ALPHABET[idx])
            })
            .collect();
        RoomId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RoomId {
    type Err = RoomIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomIdError {
    #[error("room id must be {expected} chars, got {found}")]
    InvalidLength { expected: usize, found: usize },

    #[error("invalid character '{ch}' at position {index}")]
    InvalidCharacter { ch: char, index: usize },
}

//! Game rules configuration.

use std::str::FromStr;
use std::time::Duration;

use crate::board::{COLS, ROWS};
use crate::selection::TARGET_SUM;

/// How seats get their boards when a round starts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BoardMode {
    /// One board per room, cloned for each seat: both players solve the
    /// same puzzle, clears stay private.
    #[default]
    Shared,
    /// Every start draws a brand-new board for that seat.
    Independent,
}

impl FromStr for BoardMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(BoardMode::Shared),
            "independent" => Ok(BoardMode::Independent),
            other => Err(format!("unknown board mode '{other}'")),
        }
    }
}

/// Knobs for one server process. Every room uses the same rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub target: u32,
    /// Length of a round, in ticks.
    pub round_seconds: u32,
    pub tick_period: Duration,
    pub board_mode: BoardMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: ROWS,
            cols: COLS,
            target: TARGET_SUM,
            round_seconds: 120,
            tick_period: Duration::from_secs(1),
            board_mode: BoardMode::Shared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_mode_parses_case_insensitively() {
        assert_eq!("Shared".parse::<BoardMode>(), Ok(BoardMode::Shared));
        assert_eq!(" INDEPENDENT".parse::<BoardMode>(), Ok(BoardMode::Independent));
        assert!("mixed".parse::<BoardMode>().is_err());
    }
}

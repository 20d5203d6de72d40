// crates/sumten-protocol/src/text_codec.rs

//! Plain-text line codec, for netcat sessions and scripted test matches.
//!
//! Input format (lines → `Command`, keyword is case-insensitive):
//!
//! - Create a room:
//!   `CREATE`
//!
//! - Join a room:
//!   `JOIN, roomId`
//!
//! - Start playing:
//!   `START, roomId, seat`
//!
//! - Select cells (each cell is `row col` or `row:col`):
//!   `SELECT, roomId, seat, row col, row col, ...`
//!
//! - Vote for a rematch:
//!   `AGAIN, roomId, seat`
//!
//! Output format (`WireEvent` → line) is the kebab-case event name followed
//! by its fields, e.g.
//!
//! - `room-created, ABC123`
//! - `timer-update, 1, 119`                 (seat, time remaining)
//! - `cells-cleared, 1, 2, 0 0, 0 1`         (seat, score, cells...)
//! - `game-ended, 5, 3, 1`                   (score 1, score 2, winner)
//! - `game-started, 1, 120, 4619.../...`     (seat, time, board rows)
//!
//! Boards are rows of digits joined by `/`, with `.` for a cleared cell.

use sumten_core::{CellPos, Command};

use crate::wire_types::{WireCell, WireCellPos, WireEvent};
use crate::ProtocolError;

/// Parse a single text line into a `Command`.
///
/// Returns `Ok(None)` for blank lines and comments (starting with `#`).
pub fn parse_command_line(line: &str) -> Result<Option<Command>, ProtocolError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens = split_and_trim(trimmed, ',');
    let keyword = tokens[0].to_ascii_uppercase();

    let command = match keyword.as_str() {
        "CREATE" => {
            expect_len(&tokens, 1)?;
            Command::CreateRoom
        }
        "JOIN" => {
            expect_len(&tokens, 2)?;
            Command::JoinRoom {
                room_id: tokens[1].clone(),
            }
        }
        "START" => {
            expect_len(&tokens, 3)?;
            Command::StartGame {
                room_id: tokens[1].clone(),
                seat: parse_seat(&tokens[2])?,
            }
        }
        "SELECT" => {
            if tokens.len() < 3 {
                return Err(ProtocolError::MissingField("seat"));
            }
            let cells = tokens[3..]
                .iter()
                .map(|t| parse_cell(t))
                .collect::<Result<Vec<_>, _>>()?;
            Command::SelectCells {
                room_id: tokens[1].clone(),
                seat: parse_seat(&tokens[2])?,
                cells,
            }
        }
        "AGAIN" => {
            expect_len(&tokens, 3)?;
            Command::PlayAgain {
                room_id: tokens[1].clone(),
                seat: parse_seat(&tokens[2])?,
            }
        }
        _ => return Err(ProtocolError::UnknownCommand(tokens[0].clone())),
    };

    Ok(Some(command))
}

/// Format an event as a single text line.
pub fn format_event_line(event: &WireEvent) -> String {
    let name = event.name();
    match event {
        WireEvent::RoomCreated { room_id } => format!("{name}, {room_id}"),
        WireEvent::RoomJoined { room_id, seat } => format!("{name}, {room_id}, {seat}"),
        WireEvent::PlayerJoined { count } => format!("{name}, {count}"),
        WireEvent::GameStarted {
            board,
            seat,
            time_remaining,
        } => format!("{name}, {seat}, {time_remaining}, {}", format_board(board)),
        WireEvent::TimerUpdate {
            time_remaining,
            seat,
        } => format!("{name}, {seat}, {time_remaining}"),
        WireEvent::CellsCleared { cells, score, seat } => {
            let mut line = format!("{name}, {seat}, {score}");
            for c in cells {
                line.push_str(&format!(", {} {}", c.row, c.col));
            }
            line
        }
        WireEvent::OpponentScore { seat, score } | WireEvent::PlayerFinished { seat, score } => {
            format!("{name}, {seat}, {score}")
        }
        WireEvent::OpponentFinished {
            opponent_score,
            opponent_seat,
        } => format!("{name}, {opponent_seat}, {opponent_score}"),
        WireEvent::GameEnded { scores, winner } => {
            format!("{name}, {}, {}, {winner}", scores.one, scores.two)
        }
        WireEvent::GameReset { message } => format!("{name}, {message}"),
        WireEvent::CreateError { reason }
        | WireEvent::JoinError { reason }
        | WireEvent::StartError { reason }
        | WireEvent::SelectError { reason }
        | WireEvent::PlayAgainError { reason }
        | WireEvent::Error { reason } => format!("{name}, {reason}"),
        WireEvent::InvalidSelection
        | WireEvent::OpponentWantsPlayAgain
        | WireEvent::PlayerLeft => name.to_string(),
    }
}

/// Rows of digits joined by `/`, `.` for cleared cells.
pub fn format_board(board: &[Vec<WireCell>]) -> String {
    board
        .iter()
        .map(|row| {
            row.iter()
                .map(|c| {
                    if c.cleared {
                        '.'
                    } else {
                        char::from(b'0' + c.value.min(9))
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Format a cell list the way `SELECT` expects it.
pub fn format_cells(cells: &[WireCellPos]) -> String {
    cells
        .iter()
        .map(|c| format!("{} {}", c.row, c.col))
        .collect::<Vec<_>>()
        .join(", ")
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn split_and_trim(s: &str, delimiter: char) -> Vec<String> {
    s.split(delimiter)
        .map(|tok| tok.trim().to_string())
        .collect()
}

fn expect_len(tokens: &[String], len: usize) -> Result<(), ProtocolError> {
    if tokens.len() < len {
        return Err(ProtocolError::MissingField(field_name(tokens.len())));
    }
    if tokens.len() > len {
        return Err(ProtocolError::InvalidField("trailing fields"));
    }
    Ok(())
}

fn field_name(position: usize) -> &'static str {
    match position {
        1 => "roomId",
        _ => "seat",
    }
}

fn parse_seat(s: &str) -> Result<u8, ProtocolError> {
    s.parse::<u8>().map_err(|_| ProtocolError::InvalidField("seat"))
}

fn parse_cell(s: &str) -> Result<CellPos, ProtocolError> {
    let mut parts = s
        .split(|c: char| c == ':' || c.is_whitespace())
        .filter(|p| !p.is_empty());

    let row = parts.next().and_then(|p| p.parse::<usize>().ok());
    let col = parts.next().and_then(|p| p.parse::<usize>().ok());

    match (row, col, parts.next()) {
        (Some(row), Some(col), None) => Ok(CellPos::new(row, col)),
        _ => Err(ProtocolError::InvalidField("cell")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire_types::WireScores;

    #[test]
    fn parses_every_command() {
        assert_eq!(parse_command_line("create").unwrap(), Some(Command::CreateRoom));
        assert_eq!(
            parse_command_line("JOIN, abc123").unwrap(),
            Some(Command::JoinRoom {
                room_id: "abc123".into()
            })
        );
        assert_eq!(
            parse_command_line("START, ABC123, 2").unwrap(),
            Some(Command::StartGame {
                room_id: "ABC123".into(),
                seat: 2
            })
        );
        assert_eq!(
            parse_command_line("SELECT, ABC123, 1, 0 0, 3:16").unwrap(),
            Some(Command::SelectCells {
                room_id: "ABC123".into(),
                seat: 1,
                cells: vec![CellPos::new(0, 0), CellPos::new(3, 16)],
            })
        );
        assert_eq!(
            parse_command_line("again, ABC123, 1").unwrap(),
            Some(Command::PlayAgain {
                room_id: "ABC123".into(),
                seat: 1
            })
        );
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_command_line("   ").unwrap(), None);
        assert_eq!(parse_command_line("# seat 1 opens").unwrap(), None);
    }

    #[test]
    fn malformed_lines_are_errors() {
        assert!(matches!(
            parse_command_line("FLY, ABC123"),
            Err(ProtocolError::UnknownCommand(_))
        ));
        assert!(matches!(
            parse_command_line("START, ABC123"),
            Err(ProtocolError::MissingField("seat"))
        ));
        assert!(matches!(
            parse_command_line("START, ABC123, one"),
            Err(ProtocolError::InvalidField("seat"))
        ));
        assert!(matches!(
            parse_command_line("SELECT, ABC123, 1, 0 0 0"),
            Err(ProtocolError::InvalidField("cell"))
        ));
        assert!(matches!(
            parse_command_line("CREATE, extra"),
            Err(ProtocolError::InvalidField(_))
        ));
    }

    #[test]
    fn formats_events() {
        let board = vec![
            vec![
                WireCell {
                    value: 4,
                    cleared: false,
                },
                WireCell {
                    value: 6,
                    cleared: true,
                },
            ],
            vec![
                WireCell {
                    value: 9,
                    cleared: false,
                },
                WireCell {
                    value: 1,
                    cleared: false,
                },
            ],
        ];
        assert_eq!(
            format_event_line(&WireEvent::GameStarted {
                board,
                seat: 1,
                time_remaining: 120
            }),
            "game-started, 1, 120, 4./91"
        );
        assert_eq!(
            format_event_line(&WireEvent::CellsCleared {
                cells: vec![WireCellPos { row: 0, col: 0 }, WireCellPos { row: 0, col: 1 }],
                score: 2,
                seat: 1
            }),
            "cells-cleared, 1, 2, 0 0, 0 1"
        );
        assert_eq!(
            format_event_line(&WireEvent::GameEnded {
                scores: WireScores { one: 5, two: 3 },
                winner: 1
            }),
            "game-ended, 5, 3, 1"
        );
        assert_eq!(format_event_line(&WireEvent::PlayerLeft), "player-left");
        assert_eq!(
            format_event_line(&WireEvent::JoinError {
                reason: "Room not found".into()
            }),
            "join-error, Room not found"
        );
    }
}

// crates/sumten-client/src/app.rs

use std::fmt::Write as _;

use sumten_core::{CellPos, Command};
use sumten_protocol::text_codec;
use sumten_protocol::{WireCell, WireEvent};

/// What one line typed at the prompt asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Send(Command),
    ShowBoard,
    Help,
    Quit,
    Nothing,
}

pub const HELP: &str = "\
commands:
  create                 open a new room
  join <ROOM>            take a seat in a room
  start                  start your countdown
  select r c [r c ...]   clear cells summing to 10 (also r:c)
  again                  vote for a rematch
  board                  redraw your board
  quit
full text syntax also works, e.g. `SELECT, ABC123, 1, 0 0, 0 1`";

/// Local view of the match, built from server events.
#[derive(Debug, Default)]
pub struct App {
    pub room: Option<String>,
    pub seat: Option<u8>,
    pub board: Option<Vec<Vec<WireCell>>>,
    pub score: u32,
    pub opponent_score: u32,
    pub time_remaining: Option<u32>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn a prompt line into an action. Room and seat are filled in
    /// from what the server told us.
    pub fn parse_input(&self, line: &str) -> Result<Input, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Input::Nothing);
        }

        // Full text syntax goes straight through the codec.
        if line.contains(',') {
            return text_codec::parse_command_line(line)
                .map(|cmd| cmd.map_or(Input::Nothing, Input::Send))
                .map_err(|e| e.to_string());
        }

        let mut words = line.split_whitespace();
        let keyword = words.next().unwrap_or_default().to_ascii_lowercase();
        let rest: Vec<&str> = words.collect();

        match keyword.as_str() {
            "quit" | "exit" | "q" => Ok(Input::Quit),
            "help" | "?" => Ok(Input::Help),
            "board" => Ok(Input::ShowBoard),
            "create" => Ok(Input::Send(Command::CreateRoom)),
            "join" => match rest.as_slice() {
                [room_id] => Ok(Input::Send(Command::JoinRoom {
                    room_id: room_id.to_string(),
                })),
                _ => Err("usage: join <ROOM>".to_string()),
            },
            "start" => {
                let (room_id, seat) = self.seated()?;
                Ok(Input::Send(Command::StartGame { room_id, seat }))
            }
            "again" => {
                let (room_id, seat) = self.seated()?;
                Ok(Input::Send(Command::PlayAgain { room_id, seat }))
            }
            "select" => {
                let (room_id, seat) = self.seated()?;
                let cells = parse_cells(&rest)?;
                Ok(Input::Send(Command::SelectCells {
                    room_id,
                    seat,
                    cells,
                }))
            }
            other => Err(format!("unknown command `{other}`, try `help`")),
        }
    }

    fn seated(&self) -> Result<(String, u8), String> {
        match (&self.room, self.seat) {
            (Some(room), Some(seat)) => Ok((room.clone(), seat)),
            _ => Err("not in a room yet: create or join one first".to_string()),
        }
    }

    /// Fold a server event into the local view.
    pub fn apply(&mut self, event: &WireEvent) {
        match event {
            WireEvent::RoomCreated { room_id } => {
                self.room = Some(room_id.clone());
                self.seat = Some(1);
            }
            WireEvent::RoomJoined { room_id, seat } => {
                self.room = Some(room_id.clone());
                self.seat = Some(*seat);
            }
            WireEvent::GameStarted {
                board,
                time_remaining,
                ..
            } => {
                self.board = Some(board.clone());
                self.score = 0;
                self.opponent_score = 0;
                self.time_remaining = Some(*time_remaining);
            }
            WireEvent::TimerUpdate { time_remaining, .. } => {
                self.time_remaining = Some(*time_remaining);
            }
            WireEvent::CellsCleared { cells, score, .. } => {
                if let Some(board) = self.board.as_mut() {
                    for pos in cells {
                        let cell = board.get_mut(pos.row).and_then(|r| r.get_mut(pos.col));
                        if let Some(cell) = cell {
                            cell.cleared = true;
                        }
                    }
                }
                self.score = *score;
            }
            WireEvent::OpponentScore { score, .. } => self.opponent_score = *score,
            WireEvent::PlayerFinished { score, .. } => {
                self.score = *score;
                self.time_remaining = Some(0);
            }
            WireEvent::OpponentFinished { opponent_score, .. } => {
                self.opponent_score = *opponent_score;
            }
            WireEvent::GameReset { .. } => self.clear_round(),
            WireEvent::PlayerLeft => {
                // Back to the lobby; the next create or join moves us on.
                self.clear_round();
                self.room = None;
                self.seat = None;
            }
            _ => {}
        }
    }

    fn clear_round(&mut self) {
        self.board = None;
        self.score = 0;
        self.opponent_score = 0;
        self.time_remaining = None;
    }

    /// The board as a digit grid with row and column labels.
    pub fn render_board(&self) -> Option<String> {
        let board = self.board.as_ref()?;
        let cols = board.first().map_or(0, Vec::len);

        let mut out = String::from("    ");
        for col in 0..cols {
            let _ = write!(out, "{:>3}", col);
        }
        out.push('\n');

        for (row, cells) in board.iter().enumerate() {
            let _ = write!(out, "{:>3} ", row);
            for cell in cells {
                if cell.cleared {
                    out.push_str("  .");
                } else {
                    let _ = write!(out, "{:>3}", cell.value);
                }
            }
            out.push('\n');
        }

        let clock = self
            .time_remaining
            .map_or_else(|| "-".to_string(), |t| format!("{t}s"));
        let _ = write!(
            out,
            "score {}  opponent {}  time {}",
            self.score, self.opponent_score, clock
        );
        Some(out)
    }
}

// ----- Helpers -----

/// `r c r c ...` or `r:c r:c ...`.
fn parse_cells(words: &[&str]) -> Result<Vec<CellPos>, String> {
    let numbers = words
        .iter()
        .flat_map(|w| w.split(':'))
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<usize>().map_err(|_| format!("not a cell index: `{t}`")))
        .collect::<Result<Vec<_>, _>>()?;

    if numbers.is_empty() || numbers.len() % 2 != 0 {
        return Err("usage: select r c [r c ...]".to_string());
    }
    Ok(numbers
        .chunks(2)
        .map(|pair| CellPos::new(pair[0], pair[1]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sumten_protocol::WireCellPos;

    fn seated_app() -> App {
        let mut app = App::new();
        app.apply(&WireEvent::RoomJoined {
            room_id: "ABC123".into(),
            seat: 2,
        });
        app
    }

    fn grid(rows: &[&[u8]]) -> Vec<Vec<WireCell>> {
        rows.iter()
            .map(|r| {
                r.iter()
                    .map(|&value| WireCell {
                        value,
                        cleared: false,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn shorthand_needs_a_room() {
        let app = App::new();
        assert!(app.parse_input("start").is_err());
        assert_eq!(app.parse_input("create"), Ok(Input::Send(Command::CreateRoom)));
    }

    #[test]
    fn shorthand_fills_room_and_seat() {
        let app = seated_app();
        assert_eq!(
            app.parse_input("start"),
            Ok(Input::Send(Command::StartGame {
                room_id: "ABC123".into(),
                seat: 2
            }))
        );
        assert_eq!(
            app.parse_input("select 0 0 0:1"),
            Ok(Input::Send(Command::SelectCells {
                room_id: "ABC123".into(),
                seat: 2,
                cells: vec![CellPos::new(0, 0), CellPos::new(0, 1)],
            }))
        );
        assert!(app.parse_input("select 0 0 1").is_err());
        assert_eq!(
            app.parse_input("AGAIN"),
            Ok(Input::Send(Command::PlayAgain {
                room_id: "ABC123".into(),
                seat: 2
            }))
        );
    }

    #[test]
    fn full_text_syntax_passes_through() {
        let app = App::new();
        assert_eq!(
            app.parse_input("JOIN, xyz789"),
            Ok(Input::Send(Command::JoinRoom {
                room_id: "xyz789".into()
            }))
        );
        assert!(app.parse_input("FLY, away").is_err());
        assert_eq!(app.parse_input("   "), Ok(Input::Nothing));
        assert_eq!(app.parse_input("quit"), Ok(Input::Quit));
    }

    #[test]
    fn events_update_the_local_board() {
        let mut app = seated_app();
        app.apply(&WireEvent::GameStarted {
            board: grid(&[&[4, 6, 1], &[2, 3, 5]]),
            seat: 2,
            time_remaining: 120,
        });
        app.apply(&WireEvent::CellsCleared {
            cells: vec![WireCellPos { row: 0, col: 0 }, WireCellPos { row: 0, col: 1 }],
            score: 2,
            seat: 2,
        });
        app.apply(&WireEvent::OpponentScore { seat: 1, score: 7 });
        app.apply(&WireEvent::TimerUpdate {
            time_remaining: 99,
            seat: 2,
        });

        let text = app.render_board().unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "      0  1  2");
        assert_eq!(lines[1], "  0   .  .  1");
        assert_eq!(lines[2], "  1   2  3  5");
        assert_eq!(lines[3], "score 2  opponent 7  time 99s");

        app.apply(&WireEvent::GameReset {
            message: "again".into(),
        });
        assert!(app.render_board().is_none());
        assert_eq!(app.room.as_deref(), Some("ABC123"));
    }

    #[test]
    fn opponent_leaving_returns_to_the_lobby() {
        let mut app = seated_app();
        app.apply(&WireEvent::GameStarted {
            board: grid(&[&[4, 6]]),
            seat: 2,
            time_remaining: 120,
        });
        app.apply(&WireEvent::OpponentScore { seat: 1, score: 3 });

        app.apply(&WireEvent::PlayerLeft);
        assert!(app.render_board().is_none());
        assert_eq!(app.room, None);
        assert_eq!(app.seat, None);
        assert_eq!(app.opponent_score, 0);
        assert!(app.parse_input("start").is_err());
        assert_eq!(app.parse_input("create"), Ok(Input::Send(Command::CreateRoom)));
    }
}

//! JSON-lines codec: one JSON object per line, no trailing newline in the
//! returned strings (framing is the transport's job).

use sumten_core::{Command, Event};

use crate::wire_types::{WireCommand, WireEvent};
use crate::ProtocolError;

/// Decode one client line into a logical command.
pub fn decode_command(line: &str) -> Result<Command, ProtocolError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::Empty);
    }
    let wire: WireCommand = serde_json::from_str(trimmed)?;
    Ok(wire.into())
}

pub fn encode_command(command: &Command) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(&WireCommand::from(command))?)
}

pub fn encode_event(event: &Event) -> Result<String, ProtocolError> {
    encode_wire_event(&WireEvent::from(event))
}

pub fn encode_wire_event(event: &WireEvent) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(event)?)
}

/// Decode one server line. Clients work on [`WireEvent`] directly.
pub fn decode_event(line: &str) -> Result<WireEvent, ProtocolError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::Empty);
    }
    Ok(serde_json::from_str(trimmed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use sumten_core::{Board, CellPos, GameError, Op, RoomId, Scores, Seat};

    fn to_value(event: &Event) -> Value {
        serde_json::from_str(&encode_event(event).unwrap()).unwrap()
    }

    #[test]
    fn decodes_select_with_camel_case_fields() {
        let line = r#"{"type":"select-cells","roomId":"abc123","seat":2,"cells":[{"row":0,"col":1},{"row":3,"col":4}]}"#;
        assert_eq!(
            decode_command(line).unwrap(),
            Command::SelectCells {
                room_id: "abc123".into(),
                seat: 2,
                cells: vec![CellPos::new(0, 1), CellPos::new(3, 4)],
            }
        );
    }

    #[test]
    fn accepts_player_number_alias() {
        let line = r#"{"type":"start-game","roomId":"ABC123","playerNumber":1}"#;
        assert_eq!(
            decode_command(line).unwrap(),
            Command::StartGame {
                room_id: "ABC123".into(),
                seat: 1
            }
        );
    }

    #[test]
    fn rejects_garbage_and_unknown_types() {
        assert!(matches!(decode_command(""), Err(ProtocolError::Empty)));
        assert!(matches!(decode_command("{nope"), Err(ProtocolError::Json(_))));
        assert!(matches!(
            decode_command(r#"{"type":"launch-missiles"}"#),
            Err(ProtocolError::Json(_))
        ));
        assert!(matches!(
            decode_command(r#"{"type":"select-cells","roomId":"A","seat":1,"cells":[{"row":-1,"col":0}]}"#),
            Err(ProtocolError::Json(_))
        ));
    }

    #[test]
    fn game_ended_uses_seat_number_keys_and_zero_for_tie() {
        let v = to_value(&Event::GameEnded {
            scores: Scores { one: 5, two: 3 },
            winner: Some(Seat::One),
        });
        assert_eq!(v, json!({"type":"game-ended","scores":{"1":5,"2":3},"winner":1}));

        let v = to_value(&Event::GameEnded {
            scores: Scores { one: 4, two: 4 },
            winner: None,
        });
        assert_eq!(v["winner"], json!(0));
    }

    #[test]
    fn board_is_row_major_list_of_rows() {
        let board = Board::from_values(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        let v = to_value(&Event::GameStarted {
            board,
            seat: Seat::Two,
            time_remaining: 120,
        });

        assert_eq!(v["type"], json!("game-started"));
        assert_eq!(v["seat"], json!(2));
        assert_eq!(v["timeRemaining"], json!(120));
        assert_eq!(v["board"].as_array().unwrap().len(), 2);
        assert_eq!(v["board"][1][2], json!({"value":6,"cleared":false}));
    }

    #[test]
    fn errors_are_named_after_the_operation() {
        let v = to_value(&Event::Error {
            op: Op::Join,
            error: GameError::RoomFull,
        });
        assert_eq!(v, json!({"type":"join-error","reason":"Room is full"}));

        let v = to_value(&Event::Error {
            op: Op::PlayAgain,
            error: GameError::RoomNotFound,
        });
        assert_eq!(v["type"], json!("play-again-error"));
    }

    #[test]
    fn unit_events_carry_only_the_type() {
        assert_eq!(to_value(&Event::PlayerLeft), json!({"type":"player-left"}));
        assert_eq!(
            to_value(&Event::OpponentWantsPlayAgain),
            json!({"type":"opponent-wants-play-again"})
        );
    }

    #[test]
    fn client_side_round_trip_of_a_command_and_event() {
        let cmd = Command::PlayAgain {
            room_id: "ABC123".into(),
            seat: 2,
        };
        assert_eq!(decode_command(&encode_command(&cmd).unwrap()).unwrap(), cmd);

        let line = encode_event(&Event::RoomCreated {
            room_id: RoomId::parse("ABC123").unwrap(),
        })
        .unwrap();
        assert_eq!(
            decode_event(&line).unwrap(),
            WireEvent::RoomCreated {
                room_id: "ABC123".into()
            }
        );
    }
}

// crates/sumten-core/tests/match_scenarios.rs
use rand::rngs::StdRng;
use rand::SeedableRng;
use sumten_core::{
    CellPos, ConnectionId, Delivery, GameConfig, ManualScheduler, Orchestrator, RoomId, RoomPhase,
    RoomRegistry, Seat,
};
use sumten_protocol::text_codec::{format_event_line, parse_command_line};
use sumten_protocol::WireEvent;

const ALICE: ConnectionId = ConnectionId(1);
const BOB: ConnectionId = ConnectionId(2);

/// Drives an orchestrator with text commands and collects text output
/// per connection.
struct Table {
    engine: Orchestrator<ManualScheduler>,
    room: Option<RoomId>,
}

impl Table {
    fn new(round_seconds: u32) -> Self {
        let config = GameConfig {
            round_seconds,
            ..GameConfig::default()
        };
        Table {
            engine: Orchestrator::with_rng(
                config,
                RoomRegistry::new(),
                ManualScheduler::new(),
                StdRng::seed_from_u64(2024),
            ),
            room: None,
        }
    }

    /// Send one text line from `from`; `{room}` expands to the current room.
    fn send(&mut self, from: ConnectionId, line: &str) -> Vec<(ConnectionId, String)> {
        let room = self.room.as_ref().map(|r| r.to_string()).unwrap_or_default();
        let line = line.replace("{room}", &room);
        let command = parse_command_line(&line)
            .expect("valid line")
            .expect("not blank");
        let out = render(self.engine.handle(from, command));

        for (_, text) in &out {
            if let Some(id) = text.strip_prefix("room-created, ") {
                self.room = Some(RoomId::parse(id).unwrap());
            }
        }
        out
    }

    fn run_clock(&mut self, seat: Seat) -> Vec<(ConnectionId, String)> {
        let room = self.room.clone().unwrap();
        let mut out = Vec::new();
        while let Some(handle) = self.engine.scheduler().live_handle(&room, seat) {
            let deliveries = self.engine.tick(&room, seat, handle);
            out.extend(render(deliveries));
        }
        out
    }

    /// Overwrite values on a seat's board.
    fn script(&mut self, seat: Seat, cells: &[(usize, usize, u8)]) {
        let room = self.room.clone().unwrap();
        let board = self
            .engine
            .registry_mut()
            .room_mut(&room)
            .unwrap()
            .session_mut(seat)
            .board_mut()
            .expect("seat has started");
        for &(row, col, value) in cells {
            board.get_mut(CellPos::new(row, col)).unwrap().value = value;
        }
    }
}

fn render(deliveries: Vec<Delivery>) -> Vec<(ConnectionId, String)> {
    deliveries
        .into_iter()
        .map(|d| (d.to, format_event_line(&WireEvent::from(&d.event))))
        .collect()
}

fn lines_for(out: &[(ConnectionId, String)], who: ConnectionId) -> Vec<&str> {
    out.iter()
        .filter(|(to, _)| *to == who)
        .map(|(_, l)| l.as_str())
        .collect()
}

#[test]
fn full_match_scenario() {
    let mut t = Table::new(120);

    let out = t.send(ALICE, "CREATE");
    assert_eq!(out.len(), 1);
    let room = t.room.clone().unwrap();
    assert_eq!(room.as_str().len(), 6);

    let out = t.send(BOB, &format!("JOIN, {}", room.as_str().to_lowercase()));
    assert_eq!(lines_for(&out, BOB), vec![
        format!("room-joined, {room}, 2").as_str(),
        "player-joined, 2",
    ]);
    assert_eq!(lines_for(&out, ALICE), vec!["player-joined, 2"]);

    // Seat one starts: 10 rows of 17 digits, two minutes on the clock.
    let out = t.send(ALICE, "START, {room}, 1");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].0, ALICE);
    let fields: Vec<&str> = out[0].1.splitn(4, ", ").collect();
    assert_eq!(&fields[..3], &["game-started", "1", "120"]);
    let rows: Vec<&str> = fields[3].split('/').collect();
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|r| r.len() == 17));
    assert_eq!(rows.concat().len(), 170);

    t.send(BOB, "START, {room}, 2");

    // 4 + 6 clears two cells.
    t.script(Seat::One, &[(0, 0, 4), (0, 1, 6), (1, 0, 3), (1, 1, 4), (2, 0, 2), (2, 1, 3), (2, 2, 5)]);
    let out = t.send(ALICE, "SELECT, {room}, 1, 0 0, 0 1");
    assert_eq!(lines_for(&out, ALICE), vec!["cells-cleared, 1, 2, 0 0, 0 1"]);
    assert_eq!(lines_for(&out, BOB), vec!["opponent-score, 1, 2"]);

    // 3 + 4 = 7 is rejected and the score stays put.
    let out = t.send(ALICE, "SELECT, {room}, 1, 1 0, 1 1");
    assert_eq!(out, vec![(ALICE, "invalid-selection".to_string())]);

    // Three more cells: score 5.
    let out = t.send(ALICE, "SELECT, {room}, 1, 2 0, 2 1, 2 2");
    assert_eq!(lines_for(&out, ALICE), vec!["cells-cleared, 1, 5, 2 0, 2 1, 2 2"]);

    // Seat two scores 3 on its own copy of the board.
    t.script(Seat::Two, &[(5, 5, 1), (5, 6, 2), (5, 7, 7)]);
    let out = t.send(BOB, "SELECT, {room}, 2, 5 5, 5 6, 5 7");
    assert_eq!(lines_for(&out, BOB), vec!["cells-cleared, 2, 3, 5 5, 5 6, 5 7"]);

    // Seat one's clock runs out first.
    let out = t.run_clock(Seat::One);
    let alice = lines_for(&out, ALICE);
    assert_eq!(alice.len(), 121);
    assert_eq!(alice[0], "timer-update, 1, 119");
    assert_eq!(alice[119], "timer-update, 1, 0");
    assert_eq!(alice[120], "player-finished, 1, 5");
    assert_eq!(lines_for(&out, BOB), vec!["opponent-finished, 1, 5"]);
    assert_eq!(t.engine.registry().room(&room).unwrap().phase(), RoomPhase::InPlay);

    // Seat two finishes: match over for both.
    let out = t.run_clock(Seat::Two);
    assert_eq!(lines_for(&out, ALICE), vec!["opponent-finished, 2, 3", "game-ended, 5, 3, 1"]);
    let bob = lines_for(&out, BOB);
    assert_eq!(bob[bob.len() - 2], "player-finished, 2, 3");
    assert_eq!(bob[bob.len() - 1], "game-ended, 5, 3, 1");

    // Late selections bounce.
    let out = t.send(ALICE, "SELECT, {room}, 1, 3 3");
    assert_eq!(out, vec![(ALICE, "invalid-selection".to_string())]);

    // Rematch handshake.
    let out = t.send(BOB, "AGAIN, {room}, 2");
    assert_eq!(out, vec![(ALICE, "opponent-wants-play-again".to_string())]);
    let out = t.send(ALICE, "AGAIN, {room}, 1");
    assert_eq!(out.len(), 3);
    assert_eq!(out[0], (BOB, "opponent-wants-play-again".to_string()));
    assert!(out[1..].iter().all(|(_, l)| l.starts_with("game-reset, ")));
    assert_eq!(t.engine.registry().room(&room).unwrap().phase(), RoomPhase::Ready);

    // Fresh round starts from zero.
    let out = t.send(ALICE, "START, {room}, 1");
    assert!(out[0].1.starts_with("game-started, 1, 120, "));
}

#[test]
fn tie_reports_winner_zero() {
    let mut t = Table::new(2);
    t.send(ALICE, "CREATE");
    t.send(BOB, "JOIN, {room}");
    t.send(ALICE, "START, {room}, 1");
    t.send(BOB, "START, {room}, 2");

    t.run_clock(Seat::Two);
    let out = t.run_clock(Seat::One);
    assert!(out.contains(&(ALICE, "game-ended, 0, 0, 0".to_string())));
    assert!(out.contains(&(BOB, "game-ended, 0, 0, 0".to_string())));
}

#[test]
fn errors_go_only_to_the_sender() {
    let mut t = Table::new(5);

    let out = t.send(BOB, "JOIN, NOPE00");
    assert_eq!(out, vec![(BOB, "join-error, Room not found".to_string())]);

    t.send(ALICE, "CREATE");
    t.send(BOB, "JOIN, {room}");
    let out = t.send(ConnectionId(3), "JOIN, {room}");
    assert_eq!(out, vec![(ConnectionId(3), "join-error, Room is full".to_string())]);

    let out = t.send(BOB, "START, {room}, 1");
    assert_eq!(out, vec![(BOB, "start-error, Not your seat".to_string())]);

    let out = t.send(BOB, "START, {room}, 7");
    assert_eq!(out, vec![(BOB, "start-error, Invalid seat number 7".to_string())]);

    let out = t.send(ALICE, "SELECT, ZZZZZZ, 1, 0 0");
    assert_eq!(out, vec![(ALICE, "select-error, Room not found".to_string())]);

    let out = t.send(ALICE, "AGAIN, {room}, 1");
    assert_eq!(out, vec![(ALICE, "play-again-error, Match still in progress".to_string())]);
}

#[test]
fn out_of_range_selection_is_invalid_not_a_crash() {
    let mut t = Table::new(5);
    t.send(ALICE, "CREATE");
    t.send(BOB, "JOIN, {room}");
    t.send(ALICE, "START, {room}, 1");

    let out = t.send(ALICE, "SELECT, {room}, 1, 0 0, 10 0, 0 17");
    assert_eq!(out, vec![(ALICE, "invalid-selection".to_string())]);
}

#[test]
fn rooms_are_isolated() {
    let mut t = Table::new(3);
    t.send(ALICE, "CREATE");
    let first = t.room.clone().unwrap();
    t.send(BOB, "JOIN, {room}");

    t.send(ConnectionId(3), "CREATE");
    let second = t.room.clone().unwrap();
    assert_ne!(first, second);

    // Tearing down the second room leaves the first untouched.
    let out = t.engine.disconnect(ConnectionId(3));
    assert!(out.is_empty());
    assert!(!t.engine.registry().contains(&second));
    assert_eq!(t.engine.registry().room(&first).unwrap().phase(), RoomPhase::Ready);

    t.room = Some(first);
    let out = t.send(ALICE, "START, {room}, 1");
    assert!(out[0].1.starts_with("game-started"));
}

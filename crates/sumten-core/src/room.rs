//! A room: up to two seated connections playing one match.

use std::collections::BTreeSet;

use crate::board::Board;
use crate::error::GameError;
use crate::messages::ConnectionId;
use crate::room_id::RoomId;
use crate::seat::Seat;
use crate::session::PlayerSession;

/// Maximum number of seats in a room.
pub const MAX_SEATS: usize = 2;

/// A connection bound to a seat.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SeatBinding {
    pub seat: Seat,
    pub connection: ConnectionId,
}

/// Where a room is in its match, derived from seats and sessions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RoomPhase {
    /// Fewer than two seats bound.
    Waiting,
    /// Two seats, nobody has started yet.
    Ready,
    /// At least one seat started and not both have finished.
    InPlay,
    /// Both seats finished; rematch votes are being collected.
    Ended,
}

#[derive(Debug)]
pub struct Room {
    id: RoomId,
    /// Bindings in join order.
    seats: Vec<SeatBinding>,
    sessions: [PlayerSession; 2],
    rematch_votes: BTreeSet<Seat>,
    /// Board handed (cloned) to each seat on start in shared mode.
    shared_board: Board,
}

impl Room {
    /// A new room with `creator` in seat one.
    pub fn new(id: RoomId, creator: ConnectionId, shared_board: Board, round_seconds: u32) -> Self {
        Room {
            id,
            seats: vec![SeatBinding {
                seat: Seat::One,
                connection: creator,
            }],
            sessions: [
                PlayerSession::new(round_seconds),
                PlayerSession::new(round_seconds),
            ],
            rematch_votes: BTreeSet::new(),
            shared_board,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Seat `connection` in the lowest free seat number.
    pub(crate) fn bind(&mut self, connection: ConnectionId) -> Result<Seat, GameError> {
        if self.seats.len() >= MAX_SEATS {
            return Err(GameError::RoomFull);
        }
        let seat = Seat::ALL
            .into_iter()
            .find(|s| self.connection(*s).is_none())
            .ok_or(GameError::RoomFull)?;

        self.seats.push(SeatBinding { seat, connection });
        Ok(seat)
    }

    /// Remove `connection` from its seat. Returns the seat it held.
    pub(crate) fn unbind(&mut self, connection: ConnectionId) -> Option<Seat> {
        let idx = self.seats.iter().position(|b| b.connection == connection)?;
        Some(self.seats.remove(idx).seat)
    }

    pub fn bindings(&self) -> &[SeatBinding] {
        &self.seats
    }

    pub fn connection(&self, seat: Seat) -> Option<ConnectionId> {
        self.seats
            .iter()
            .find(|b| b.seat == seat)
            .map(|b| b.connection)
    }

    pub fn seat_of(&self, connection: ConnectionId) -> Option<Seat> {
        self.seats
            .iter()
            .find(|b| b.connection == connection)
            .map(|b| b.seat)
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn session(&self, seat: Seat) -> &PlayerSession {
        &self.sessions[seat.index()]
    }

    pub fn session_mut(&mut self, seat: Seat) -> &mut PlayerSession {
        &mut self.sessions[seat.index()]
    }

    pub fn phase(&self) -> RoomPhase {
        let one = self.session(Seat::One);
        let two = self.session(Seat::Two);

        if self.seats.len() < MAX_SEATS {
            RoomPhase::Waiting
        } else if one.is_finished() && two.is_finished() {
            RoomPhase::Ended
        } else if one.is_active() || two.is_active() || one.is_finished() || two.is_finished() {
            RoomPhase::InPlay
        } else {
            RoomPhase::Ready
        }
    }

    pub fn shared_board(&self) -> &Board {
        &self.shared_board
    }

    pub(crate) fn replace_shared_board(&mut self, board: Board) {
        self.shared_board = board;
    }

    /// Record a rematch vote. Returns `false` if the seat had already voted.
    pub(crate) fn add_vote(&mut self, seat: Seat) -> bool {
        self.rematch_votes.insert(seat)
    }

    pub fn votes(&self) -> usize {
        self.rematch_votes.len()
    }

    pub fn has_voted(&self, seat: Seat) -> bool {
        self.rematch_votes.contains(&seat)
    }

    pub(crate) fn clear_votes(&mut self) {
        self.rematch_votes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Room {
        let board = Board::from_values(&[vec![1, 9]]).unwrap();
        Room::new(
            RoomId::parse("ABC123").unwrap(),
            ConnectionId(1),
            board,
            120,
        )
    }

    #[test]
    fn seats_fill_in_order_then_reject() {
        let mut r = room();
        assert_eq!(r.phase(), RoomPhase::Waiting);
        assert_eq!(r.bind(ConnectionId(2)), Ok(Seat::Two));
        assert_eq!(r.phase(), RoomPhase::Ready);
        assert_eq!(r.bind(ConnectionId(3)), Err(GameError::RoomFull));
        assert_eq!(r.connection(Seat::One), Some(ConnectionId(1)));
        assert_eq!(r.seat_of(ConnectionId(2)), Some(Seat::Two));
    }

    #[test]
    fn rejoin_takes_the_free_seat_number() {
        let mut r = room();
        r.bind(ConnectionId(2)).unwrap();
        assert_eq!(r.unbind(ConnectionId(1)), Some(Seat::One));
        assert_eq!(r.bind(ConnectionId(3)), Ok(Seat::One));
        assert_eq!(r.seat_count(), 2);
    }

    #[test]
    fn votes_are_a_set() {
        let mut r = room();
        assert!(r.add_vote(Seat::One));
        assert!(!r.add_vote(Seat::One));
        assert_eq!(r.votes(), 1);
        r.clear_votes();
        assert_eq!(r.votes(), 0);
    }
}

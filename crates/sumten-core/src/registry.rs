//! Room registry: owns every live room and the connection → room index.
//!
//! Connections never own rooms. They are only looked up through
//! `connections`, so a connection going away can at most unbind its own
//! seat.

use std::collections::HashMap;

use rand::Rng;
use tracing::info;

use crate::board::Board;
use crate::error::GameError;
use crate::messages::ConnectionId;
use crate::room::Room;
use crate::room_id::RoomId;
use crate::seat::Seat;

/// What happened to a room when a connection left it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_id: RoomId,
    pub seat: Seat,
    /// The connection still seated, if the room survived.
    pub remaining: Option<ConnectionId>,
}

impl Departure {
    pub fn room_destroyed(&self) -> bool {
        self.remaining.is_none()
    }
}

#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    connections: HashMap<ConnectionId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        RoomRegistry::default()
    }

    /// Open a room with `creator` in seat one under a fresh id.
    pub fn create_room<R: Rng + ?Sized>(
        &mut self,
        creator: ConnectionId,
        board: Board,
        round_seconds: u32,
        rng: &mut R,
    ) -> Result<RoomId, GameError> {
        if self.connections.contains_key(&creator) {
            return Err(GameError::AlreadySeated);
        }

        let mut room_id = RoomId::random(rng);
        while self.rooms.contains_key(&room_id) {
            room_id = RoomId::random(rng);
        }

        self.rooms.insert(
            room_id.clone(),
            Room::new(room_id.clone(), creator, board, round_seconds),
        );
        self.connections.insert(creator, room_id.clone());

        info!(room = %room_id, connection = %creator, "room created");
        Ok(room_id)
    }

    /// Seat `connection` in an existing room.
    pub fn join_room(&mut self, room_id: &RoomId, connection: ConnectionId) -> Result<Seat, GameError> {
        if self.connections.contains_key(&connection) {
            return Err(GameError::AlreadySeated);
        }

        let room = self.rooms.get_mut(room_id).ok_or(GameError::RoomNotFound)?;
        let seat = room.bind(connection)?;
        self.connections.insert(connection, room_id.clone());

        info!(room = %room_id, connection = %connection, %seat, "player joined");
        Ok(seat)
    }

    /// Unbind `connection` from whatever room it sits in, destroying the
    /// room if it is now empty.
    ///
    /// The caller must cancel the seat's timer before calling this.
    pub fn remove_connection(&mut self, connection: ConnectionId) -> Option<Departure> {
        let room_id = self.connections.remove(&connection)?;
        let room = self.rooms.get_mut(&room_id)?;
        let seat = room.unbind(connection)?;

        let remaining = room.bindings().first().map(|b| b.connection);
        if room.is_empty() {
            self.rooms.remove(&room_id);
            info!(room = %room_id, "room destroyed");
        } else {
            info!(room = %room_id, %seat, "player left");
        }

        Some(Departure {
            room_id,
            seat,
            remaining,
        })
    }

    /// The room and seat a connection occupies.
    pub fn binding(&self, connection: ConnectionId) -> Option<(&RoomId, Seat)> {
        let room_id = self.connections.get(&connection)?;
        let seat = self.rooms.get(room_id)?.seat_of(connection)?;
        Some((room_id, seat))
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn room_mut(&mut self, room_id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board() -> Board {
        Board::from_values(&[vec![5, 5]]).unwrap()
    }

    #[test]
    fn create_join_and_full() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut reg = RoomRegistry::new();

        let id = reg.create_room(ConnectionId(1), board(), 120, &mut rng).unwrap();
        assert_eq!(reg.binding(ConnectionId(1)), Some((&id, Seat::One)));

        assert_eq!(reg.join_room(&id, ConnectionId(2)), Ok(Seat::Two));
        assert_eq!(reg.join_room(&id, ConnectionId(3)), Err(GameError::RoomFull));
        assert!(reg.binding(ConnectionId(3)).is_none());
    }

    #[test]
    fn join_unknown_room() {
        let mut reg = RoomRegistry::new();
        let id = RoomId::parse("ZZZZZZ").unwrap();
        assert_eq!(reg.join_room(&id, ConnectionId(9)), Err(GameError::RoomNotFound));
    }

    #[test]
    fn a_connection_sits_in_one_room_at_most() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut reg = RoomRegistry::new();
        let id = reg.create_room(ConnectionId(1), board(), 120, &mut rng).unwrap();

        assert_eq!(
            reg.create_room(ConnectionId(1), board(), 120, &mut rng),
            Err(GameError::AlreadySeated)
        );
        assert_eq!(reg.join_room(&id, ConnectionId(1)), Err(GameError::AlreadySeated));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn ids_never_collide() {
        // Same seed for every create: the retry loop must kick in.
        let mut reg = RoomRegistry::new();
        for n in 0..5 {
            let mut rng = StdRng::seed_from_u64(11);
            reg.create_room(ConnectionId(n), board(), 120, &mut rng).unwrap();
        }
        assert_eq!(reg.len(), 5);
    }

    #[test]
    fn last_departure_destroys_room() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut reg = RoomRegistry::new();
        let id = reg.create_room(ConnectionId(1), board(), 120, &mut rng).unwrap();
        reg.join_room(&id, ConnectionId(2)).unwrap();

        let first = reg.remove_connection(ConnectionId(1)).unwrap();
        assert_eq!(first.seat, Seat::One);
        assert_eq!(first.remaining, Some(ConnectionId(2)));
        assert!(reg.contains(&id));
        assert_eq!(reg.room(&id).unwrap().seat_count(), 1);

        let second = reg.remove_connection(ConnectionId(2)).unwrap();
        assert!(second.room_destroyed());
        assert!(!reg.contains(&id));
        assert!(reg.is_empty());

        assert_eq!(reg.remove_connection(ConnectionId(2)), None);
    }
}

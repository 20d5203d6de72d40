//! Seat (player slot 1 / 2) within a room.

/// One of the two numbered player slots in a room.
///
/// The creator of a room always sits in `One`; the first joiner in `Two`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    /// Both seats, in seat-number order.
    pub const ALL: [Seat; 2] = [Seat::One, Seat::Two];

    /// Seat number as seen on the wire (`1` / `2`).
    pub fn number(self) -> u8 {
        match self {
            Seat::One => 1,
            Seat::Two => 2,
        }
    }

    /// Try to parse from a wire seat number. Anything but `1` or `2` is `None`.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Seat::One),
            2 => Some(Seat::Two),
            _ => None,
        }
    }

    /// The opposing seat.
    pub fn other(self) -> Self {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    /// Zero-based index, handy for `[T; 2]` per-seat storage.
    pub(crate) fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

use serde::{Deserialize, Serialize};

use super::turn::SeatIndex;

/// 玩家在房间里的稳定标识。
pub type PlayerId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub id: PlayerId,
    pub name: String,
}

impl Seat {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// 按座位顺序排列的玩家名单。一局之内长度不变。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Roster {
    seats: Vec<Seat>,
}

impl Roster {
    pub fn new(seats: Vec<Seat>) -> Self {
        Self { seats }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, index: SeatIndex) -> Option<&Seat> {
        self.seats.get(index)
    }

    pub fn seat_of(&self, id: &str) -> Option<SeatIndex> {
        self.seats.iter().position(|seat| seat.id == id)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.id == id)
    }

    /// 日志里使用的名字，找不到座位时退回 "Player"。
    pub fn name_of(&self, index: SeatIndex) -> &str {
        self.seat(index).map_or("Player", |seat| seat.name.as_str())
    }
}

impl FromIterator<Seat> for Roster {
    fn from_iter<T: IntoIterator<Item = Seat>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

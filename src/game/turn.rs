use serde::{Deserialize, Serialize};

/// 座位编号，`0..N-1`，开局后不再变化。
pub type SeatIndex = usize;

/// 出牌方向。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Clockwise => "clockwise",
            Direction::CounterClockwise => "counter-clockwise",
        }
    }
}

/// 沿 `direction` 前进 1 个座位（`skip` 时前进 2 个），结果总在 `0..seat_count` 内。
///
/// 两人局中 "跳过" 与 "反转" 等同再出一次，那是状态机的决定，不在这里处理。
pub fn next_seat(
    current: SeatIndex,
    seat_count: usize,
    direction: Direction,
    skip: bool,
) -> SeatIndex {
    if seat_count == 0 {
        return 0;
    }
    let step = (if skip { 2 } else { 1 }) % seat_count;
    let current = current % seat_count;
    match direction {
        Direction::Clockwise => (current + step) % seat_count,
        Direction::CounterClockwise => (current + seat_count - step) % seat_count,
    }
}

/// 逆方向的相邻座位，即 "上一家"。
pub fn previous_seat(current: SeatIndex, seat_count: usize, direction: Direction) -> SeatIndex {
    next_seat(current, seat_count, direction.reversed(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clockwise_wraps_around_the_table() {
        assert_eq!(next_seat(3, 4, Direction::Clockwise, false), 0);
        assert_eq!(next_seat(3, 4, Direction::Clockwise, true), 1);
        assert_eq!(next_seat(0, 4, Direction::CounterClockwise, false), 3);
        assert_eq!(next_seat(1, 4, Direction::CounterClockwise, true), 3);
    }

    #[test]
    fn previous_seat_is_the_opposite_neighbour() {
        assert_eq!(previous_seat(0, 4, Direction::Clockwise), 3);
        assert_eq!(previous_seat(0, 4, Direction::CounterClockwise), 1);
        assert_eq!(previous_seat(1, 2, Direction::Clockwise), 0);
    }

    #[test]
    fn skip_in_two_player_game_lands_on_self() {
        assert_eq!(next_seat(0, 2, Direction::Clockwise, true), 0);
        assert_eq!(next_seat(1, 2, Direction::CounterClockwise, true), 1);
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![Just(Direction::Clockwise), Just(Direction::CounterClockwise)]
    }

    proptest! {
        #[test]
        fn prop_visits_every_seat_before_repeating(n in 1usize..=8, start in 0usize..8, dir in direction()) {
            let start = start % n;
            let mut seen = vec![false; n];
            let mut seat = start;
            for _ in 0..n {
                prop_assert!(!seen[seat], "seat {} visited twice", seat);
                seen[seat] = true;
                seat = next_seat(seat, n, dir, false);
            }
            prop_assert_eq!(seat, start);
        }

        #[test]
        fn prop_opposite_direction_undoes_a_step(n in 1usize..=8, seat in 0usize..8, dir in direction()) {
            let seat = seat % n;
            let forward = next_seat(seat, n, dir, false);
            prop_assert!(forward < n);
            prop_assert_eq!(next_seat(forward, n, dir.reversed(), false), seat);
        }
    }
}

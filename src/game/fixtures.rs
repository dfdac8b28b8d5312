//! 测试用的牌桌构造工具：指定手牌和顶牌，其余牌进入牌堆，总数保持 104 张。

use super::cards::{create_deck, Card, Suit, Value};
use super::config::GameSettings;
use super::roster::{Roster, Seat};
use super::state::GameState;

pub type Face = (Suit, Value);

fn take(pool: &mut Vec<Card>, (suit, value): Face) -> Card {
    let pos = pool
        .iter()
        .position(|card| card.suit == suit && card.value == value)
        .unwrap_or_else(|| panic!("no {suit} {value} left in the pool"));
    pool.remove(pos)
}

/// 构造一张牌桌。`hands[i]` 是座位 i 的手牌，`top` 是弃牌堆顶。
pub fn table(hands: &[&[Face]], top: Face) -> GameState {
    table_with(hands, top, GameSettings::default())
}

pub fn table_with(hands: &[&[Face]], top: Face, settings: GameSettings) -> GameState {
    let mut pool = create_deck();
    let hands: Vec<Vec<Card>> = hands
        .iter()
        .map(|faces| faces.iter().map(|face| take(&mut pool, *face)).collect())
        .collect();
    let top = take(&mut pool, top);
    GameState::new(pool, hands, vec![top], settings)
}

pub fn roster(players: usize) -> Roster {
    (0..players)
        .map(|idx| Seat::new(format!("p{idx}"), format!("Player {idx}")))
        .collect()
}

pub fn id(seat: usize) -> String {
    format!("p{seat}")
}

pub fn position(state: &GameState, seat: usize, (suit, value): Face) -> (String, usize) {
    let idx = state
        .hand(seat)
        .iter()
        .position(|card| card.suit == suit && card.value == value)
        .unwrap_or_else(|| panic!("seat {seat} holds no {suit} {value}"));
    (state.hand(seat)[idx].id.clone(), idx)
}

/// 在牌堆顶放一张指定的牌（从牌堆中挪过来）。
pub fn stack_deck(state: &mut GameState, face: Face) {
    let card = take(&mut state.deck, face);
    state.deck.push(card);
}

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cards::{Card, CardId, Suit, Value, TOTAL_CARDS};
use super::config::GameSettings;
use super::deck::recycle_discard_pile;
use super::effects::TargetedEffect;
use super::roster::{PlayerId, Roster};
use super::turn::{Direction, SeatIndex};

/// 游戏阶段。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Playing,
    SuitSelection,
    Gura,
    PlayerSelection,
    GameOver,
}

impl GamePhase {
    /// 等待某位玩家做决定（选花色 / 选目标），此时任何人都不能出牌。
    pub fn awaits_decision(self) -> bool {
        matches!(self, GamePhase::SuitSelection | GamePhase::PlayerSelection)
    }
}

/// 当前限制出牌的连锁规则。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChainType {
    DrawChain,
    DrawTen,
    DrawTenResponse,
    Gura,
}

impl ChainType {
    pub fn is_draw_chain(self) -> bool {
        !matches!(self, ChainType::Gura)
    }
}

/// 一条对所有玩家可见的对局日志。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    /// Unix 毫秒时间戳。
    pub timestamp: u64,
}

/// 当前回合的临时记录，换人时重置。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    pub seat: SeatIndex,
    /// 本回合是否已经主动摸过一张牌。
    #[serde(default)]
    pub has_drawn: bool,
    /// 正在回应强制要求：GURA 轮中，或刚摸完连锁罚牌。为真时可以不摸牌直接 pass。
    #[serde(default)]
    pub must_respond: bool,
}

impl TurnRecord {
    pub fn new(seat: SeatIndex) -> Self {
        Self {
            seat,
            has_drawn: false,
            must_respond: false,
        }
    }
}

/// `see_hand` 公开的手牌，直到下一张牌打出为止。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevealedHand {
    pub seat: SeatIndex,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[serde(tag = "type")]
pub enum IntegrityError {
    #[error("expected {expected} cards in play, found {actual}")]
    CardCountMismatch { expected: usize, actual: usize },
    #[error("card {card_id} appears more than once")]
    DuplicateCardId { card_id: CardId },
    #[error("seat {seat} is outside a table of {seats}")]
    InvalidSeatIndex { seat: SeatIndex, seats: usize },
    #[error("draw count {draw_count} does not match chain {chain_type:?}")]
    ChainMismatch {
        draw_count: u32,
        chain_type: Option<ChainType>,
    },
    #[error("GURA phase without a GURA card value")]
    GuraWithoutValue,
    #[error("discard pile is empty")]
    EmptyDiscardPile,
}

/// 对局的完整权威状态。每次被接受的操作都会整体替换它。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub deck: Vec<Card>,
    pub discard_pile: Vec<Card>,
    pub hands: Vec<Vec<Card>>,
    pub current_player_index: SeatIndex,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub game_phase: GamePhase,
    #[serde(default)]
    pub wild_suit: Option<Suit>,
    #[serde(default)]
    pub draw_count: u32,
    #[serde(default)]
    pub chain_type: Option<ChainType>,
    #[serde(default)]
    pub last_player_index: Option<SeatIndex>,
    #[serde(default)]
    pub gura_starter_index: Option<SeatIndex>,
    #[serde(default)]
    pub gura_card_value: Option<Value>,
    #[serde(default)]
    pub pending_gura_decision: bool,
    /// 发起者手里是否还有两张以上同点数的牌。只供界面提示，规则不读取。
    #[serde(default)]
    pub has_many_gura_cards: bool,
    #[serde(default)]
    pub pending_effect: Option<TargetedEffect>,
    #[serde(default)]
    pub potential_winner: Option<PlayerId>,
    #[serde(default)]
    pub winner: Option<PlayerId>,
    #[serde(default)]
    pub revealed_hand: Option<RevealedHand>,
    #[serde(default)]
    pub turn: TurnRecord,
    #[serde(default)]
    pub settings: GameSettings,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

impl GameState {
    pub fn new(
        deck: Vec<Card>,
        hands: Vec<Vec<Card>>,
        discard_pile: Vec<Card>,
        settings: GameSettings,
    ) -> Self {
        Self {
            deck,
            discard_pile,
            hands,
            current_player_index: 0,
            direction: Direction::default(),
            game_phase: GamePhase::default(),
            wild_suit: None,
            draw_count: 0,
            chain_type: None,
            last_player_index: None,
            gura_starter_index: None,
            gura_card_value: None,
            pending_gura_decision: false,
            has_many_gura_cards: false,
            pending_effect: None,
            potential_winner: None,
            winner: None,
            revealed_hand: None,
            turn: TurnRecord::new(0),
            settings,
            logs: Vec::new(),
        }
    }

    pub fn seat_count(&self) -> usize {
        self.hands.len()
    }

    pub fn top_card(&self) -> Option<&Card> {
        self.discard_pile.last()
    }

    pub fn hand(&self, seat: SeatIndex) -> &[Card] {
        self.hands.get(seat).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn holds_value(&self, seat: SeatIndex, value: Value) -> bool {
        self.hand(seat).iter().any(|card| card.value == value)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_phase == GamePhase::GameOver
    }

    pub fn winner_seat(&self, roster: &Roster) -> Option<SeatIndex> {
        self.winner.as_deref().and_then(|id| roster.seat_of(id))
    }

    pub fn total_cards(&self) -> usize {
        self.deck.len() + self.discard_pile.len() + self.hands.iter().map(Vec::len).sum::<usize>()
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.logs.push(LogEntry {
            message: message.into(),
            timestamp: now_millis(),
        });
    }

    /// 把回合交给 `seat`，并重置回合记录。
    pub fn begin_turn(&mut self, seat: SeatIndex) {
        self.current_player_index = seat;
        self.turn = TurnRecord::new(seat);
        self.turn.must_respond = self.game_phase == GamePhase::Gura;
    }

    pub fn clear_chain(&mut self) {
        self.draw_count = 0;
        self.chain_type = None;
    }

    pub fn clear_gura(&mut self) {
        if self.chain_type == Some(ChainType::Gura) {
            self.chain_type = None;
        }
        self.gura_card_value = None;
        self.gura_starter_index = None;
        self.pending_gura_decision = false;
        self.has_many_gura_cards = false;
    }

    /// 给 `seat` 摸 `count` 张牌，牌堆空时先回收弃牌堆。返回实际摸到的张数。
    pub fn draw_cards<R: Rng + ?Sized>(
        &mut self,
        seat: SeatIndex,
        count: u32,
        rng: &mut R,
    ) -> u32 {
        let mut drawn = 0;
        for _ in 0..count {
            if self.deck.is_empty() {
                if recycle_discard_pile(&mut self.deck, &mut self.discard_pile, rng) {
                    tracing::info!(deck = self.deck.len(), "discard pile reshuffled into deck");
                    self.log("Discard pile has been reshuffled into the deck");
                } else {
                    break;
                }
            }
            let Some(card) = self.deck.pop() else {
                break;
            };
            match self.hands.get_mut(seat) {
                Some(hand) => hand.push(card),
                None => {
                    self.deck.push(card);
                    break;
                }
            }
            drawn += 1;
        }
        drawn
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        let actual = self.total_cards();
        if actual != TOTAL_CARDS {
            return Err(IntegrityError::CardCountMismatch {
                expected: TOTAL_CARDS,
                actual,
            });
        }

        let mut seen = HashSet::with_capacity(TOTAL_CARDS);
        for card in self
            .deck
            .iter()
            .chain(self.discard_pile.iter())
            .chain(self.hands.iter().flatten())
        {
            if !seen.insert(card.id.as_str()) {
                return Err(IntegrityError::DuplicateCardId {
                    card_id: card.id.clone(),
                });
            }
        }

        let seats = self.seat_count();
        let seat_refs = [
            Some(self.current_player_index),
            self.last_player_index,
            self.gura_starter_index,
        ];
        if let Some(seat) = seat_refs.into_iter().flatten().find(|seat| *seat >= seats) {
            return Err(IntegrityError::InvalidSeatIndex { seat, seats });
        }

        let draw_chain_active = self.chain_type.is_some_and(ChainType::is_draw_chain);
        if (self.draw_count > 0) != draw_chain_active {
            return Err(IntegrityError::ChainMismatch {
                draw_count: self.draw_count,
                chain_type: self.chain_type,
            });
        }

        if self.game_phase == GamePhase::Gura
            && (self.chain_type != Some(ChainType::Gura) || self.gura_card_value.is_none())
        {
            return Err(IntegrityError::GuraWithoutValue);
        }

        if self.discard_pile.is_empty() {
            return Err(IntegrityError::EmptyDiscardPile);
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn now_millis() -> u64 {
    web_sys::js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

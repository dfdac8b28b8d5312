//! 游戏核心逻辑模块（牌、合法性判定、状态机）。

pub mod cards;
pub mod config;
pub mod deck;
pub mod effects;
pub mod legal;
pub mod roster;
pub mod rules;
pub mod state;
pub mod turn;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cards::{create_deck, Card, CardId, Suit, Value, TOTAL_CARDS};
pub use config::{GameSettings, GuraDrawPolicy};
pub use deck::{deal_cards, recycle_discard_pile, shuffle_deck, Deal};
pub use effects::{effect_of, effect_of_top, CardEffect, GameMode, TargetedEffect};
pub use legal::{can_play, can_play_now, check_play, playable_indices, PlayBlock};
pub use roster::{PlayerId, Roster, Seat};
pub use rules::{GameIntent, RuleEngine, RuleError, RuleResolution};
pub use state::{
    ChainType, GamePhase, GameState, IntegrityError, LogEntry, RevealedHand, TurnRecord,
};
pub use turn::{next_seat, previous_seat, Direction, SeatIndex};

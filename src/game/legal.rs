//! 出牌合法性。`can_play_now` 是引擎和界面共同使用的唯一判定。

use serde::{Deserialize, Serialize};

use super::cards::{Card, Suit, Value};
use super::state::{ChainType, GamePhase, GameState};

/// 基础匹配：同花色、同点数、万能牌，或顶牌为万能牌时匹配所选花色。
pub fn can_play(top: &Card, candidate: &Card, wild_suit: Option<Suit>) -> bool {
    if candidate.is_wild() {
        return true;
    }
    if candidate.suit == top.suit || candidate.value == top.value {
        return true;
    }
    top.is_wild() && wild_suit == Some(candidate.suit)
}

/// 一张牌当前不能出的原因，按优先级排列。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayBlock {
    /// 正在等待选择花色或目标玩家。
    DecisionPending,
    /// GURA 轮中只能出相同点数。
    GuraValue { value: Value },
    /// 连锁中只能出可以接续或抵消的牌。
    Chain { chain: ChainType },
    /// 与顶牌不匹配。
    NoMatch,
}

/// 按 "阶段锁 → GURA 锁 → 连锁锁 → 基础匹配" 的顺序判定。
pub fn check_play(state: &GameState, card: &Card) -> Result<(), PlayBlock> {
    if state.game_phase.awaits_decision() || state.pending_gura_decision {
        return Err(PlayBlock::DecisionPending);
    }

    if state.game_phase == GamePhase::Gura {
        return match state.gura_card_value {
            Some(value) if value == card.value => Ok(()),
            Some(value) => Err(PlayBlock::GuraValue { value }),
            None => Err(PlayBlock::NoMatch),
        };
    }

    if state.draw_count > 0 {
        if let Some(chain) = state.chain_type {
            let allowed = match chain {
                ChainType::DrawChain => card.value == Value::Seven,
                ChainType::DrawTen => card.value == Value::Jack,
                ChainType::DrawTenResponse => card.is_red_jack(),
                ChainType::Gura => false,
            };
            return if allowed {
                Ok(())
            } else {
                Err(PlayBlock::Chain { chain })
            };
        }
    }

    match state.top_card() {
        Some(top) if can_play(top, card, state.wild_suit) => Ok(()),
        Some(_) => Err(PlayBlock::NoMatch),
        None => Ok(()),
    }
}

pub fn can_play_now(state: &GameState, card: &Card) -> bool {
    check_play(state, card).is_ok()
}

/// 手牌中当前可以出的位置。
pub fn playable_indices(state: &GameState, hand: &[Card]) -> Vec<usize> {
    hand.iter()
        .enumerate()
        .filter(|(_, card)| can_play_now(state, card))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::{create_deck, Suit};
    use crate::game::config::GameSettings;
    use crate::game::deck::deal_cards;
    use proptest::prelude::*;

    fn card(suit: Suit, value: Value) -> Card {
        Card::new(suit, value, 0)
    }

    fn state_with_top(top: Card) -> GameState {
        let deal = deal_cards(create_deck(), 3, 7);
        let mut state =
            GameState::new(deal.deck, deal.hands, deal.discard_pile, GameSettings::default());
        state.discard_pile.push(top);
        state
    }

    #[test]
    fn baseline_matches_suit_value_or_wild() {
        let top = card(Suit::Diamonds, Value::Two);
        assert!(can_play(&top, &card(Suit::Hearts, Value::Two), None));
        assert!(can_play(&top, &card(Suit::Diamonds, Value::King), None));
        assert!(can_play(&top, &card(Suit::Spades, Value::Ace), None));
        assert!(!can_play(&top, &card(Suit::Spades, Value::Five), None));
    }

    #[test]
    fn wild_top_accepts_the_selected_suit() {
        let top = card(Suit::Hearts, Value::Ace);
        assert!(can_play(&top, &card(Suit::Clubs, Value::Nine), Some(Suit::Clubs)));
        assert!(!can_play(&top, &card(Suit::Spades, Value::Nine), Some(Suit::Clubs)));
        assert!(
            !can_play(&card(Suit::Hearts, Value::Four), &card(Suit::Clubs, Value::Nine), Some(Suit::Clubs)),
            "wild suit only applies while a wild is on top"
        );
    }

    #[test]
    fn black_jack_on_unrelated_seven_is_rejected() {
        let state = state_with_top(card(Suit::Spades, Value::Seven));
        assert_eq!(
            check_play(&state, &card(Suit::Clubs, Value::Jack)),
            Err(PlayBlock::NoMatch)
        );
    }

    #[test]
    fn decision_phases_block_every_card() {
        let mut state = state_with_top(card(Suit::Spades, Value::Seven));
        state.game_phase = GamePhase::SuitSelection;
        assert_eq!(
            check_play(&state, &card(Suit::Spades, Value::Ace)),
            Err(PlayBlock::DecisionPending)
        );
        state.game_phase = GamePhase::PlayerSelection;
        assert!(!can_play_now(&state, &card(Suit::Spades, Value::Eight)));
    }

    #[test]
    fn gura_lock_ignores_suit_and_top_card() {
        let mut state = state_with_top(card(Suit::Spades, Value::King));
        state.game_phase = GamePhase::Gura;
        state.chain_type = Some(ChainType::Gura);
        state.gura_card_value = Some(Value::King);

        assert!(can_play_now(&state, &card(Suit::Diamonds, Value::King)));
        assert_eq!(
            check_play(&state, &card(Suit::Spades, Value::Queen)),
            Err(PlayBlock::GuraValue { value: Value::King })
        );
        assert!(!can_play_now(&state, &card(Suit::Spades, Value::Ace)));
    }

    #[test]
    fn chain_locks_follow_chain_type() {
        let mut state = state_with_top(card(Suit::Hearts, Value::Seven));
        state.draw_count = 2;
        state.chain_type = Some(ChainType::DrawChain);
        assert!(can_play_now(&state, &card(Suit::Clubs, Value::Seven)));
        assert!(!can_play_now(&state, &card(Suit::Hearts, Value::Ace)));
        assert!(!can_play_now(&state, &card(Suit::Hearts, Value::Two)));

        state.draw_count = 10;
        state.chain_type = Some(ChainType::DrawTen);
        assert!(can_play_now(&state, &card(Suit::Spades, Value::Jack)));
        assert!(can_play_now(&state, &card(Suit::Hearts, Value::Jack)));
        assert!(!can_play_now(&state, &card(Suit::Spades, Value::Seven)));

        state.chain_type = Some(ChainType::DrawTenResponse);
        assert!(can_play_now(&state, &card(Suit::Diamonds, Value::Jack)));
        assert!(!can_play_now(&state, &card(Suit::Clubs, Value::Jack)));
    }

    #[test]
    fn playable_indices_lists_matching_positions() {
        let mut state = state_with_top(card(Suit::Hearts, Value::Four));
        state.wild_suit = None;
        let hand = vec![
            card(Suit::Clubs, Value::Five),
            card(Suit::Hearts, Value::Nine),
            card(Suit::Spades, Value::Ace),
            card(Suit::Clubs, Value::Four),
        ];
        assert_eq!(playable_indices(&state, &hand), vec![1, 2, 3]);
    }

    fn any_card() -> impl Strategy<Value = Card> {
        (0usize..4, 0usize..13, 0u8..2)
            .prop_map(|(suit, value, copy)| Card::new(Suit::ALL[suit], Value::ALL[value], copy))
    }

    proptest! {
        #[test]
        fn prop_baseline_is_exactly_the_four_rules(
            top in any_card(),
            candidate in any_card(),
            wild in proptest::option::of(0usize..4),
        ) {
            let wild_suit = wild.map(|idx| Suit::ALL[idx]);
            let expected = candidate.suit == top.suit
                || candidate.value == top.value
                || candidate.is_wild()
                || (top.is_wild() && wild_suit == Some(candidate.suit));
            let first = can_play(&top, &candidate, wild_suit);
            prop_assert_eq!(first, expected);
            prop_assert_eq!(first, can_play(&top, &candidate, wild_suit));
        }
    }
}

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    cards::{create_deck, Card, CardId, Suit, Value},
    config::{GameSettings, GuraDrawPolicy},
    deck::{deal_cards, shuffle_deck},
    effects::{effect_of, CardEffect, TargetedEffect},
    legal::{check_play, PlayBlock},
    roster::{PlayerId, Roster},
    state::{ChainType, GamePhase, GameState, RevealedHand},
    turn::{next_seat, previous_seat, Direction, SeatIndex},
};

/// 玩家发起的操作。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum GameIntent {
    PlayCard { card_id: CardId, hand_index: usize },
    DrawCard,
    SelectSuit { suit: Suit },
    SelectPlayer { target_seat: SeatIndex },
    PassTurn,
    ConfirmGura { start: bool },
    EndGura,
    StartNewGame,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[serde(tag = "type")]
pub enum RuleError {
    #[error("the game is already over")]
    GameFinished,
    #[error("a game is still in progress")]
    GameInProgress,
    #[error("player {actor} is not seated at this table")]
    UnknownPlayer { actor: PlayerId },
    #[error("roster has {roster} seats but the table has {hands} hands")]
    RosterMismatch { roster: usize, hands: usize },
    #[error("it is not seat {seat}'s turn")]
    NotPlayerTurn { seat: SeatIndex },
    #[error("a decision is pending")]
    DecisionPending,
    #[error("card {card_id} is not in hand")]
    CardNotInHand { card_id: CardId, hand_index: usize },
    #[error("card {card_id} cannot be played now")]
    IllegalCard { card_id: CardId, block: PlayBlock },
    #[error("a card must be drawn before passing")]
    MustDrawBeforePassing,
    #[error("a {value} must be played")]
    MustPlayGuraCard { value: Value },
    #[error("{remaining} GURA card(s) of value {value} still in hand")]
    GuraCardsRemaining { value: Value, remaining: usize },
    #[error("only the GURA starter may end the round")]
    NotGuraStarter,
    #[error("no GURA decision is pending")]
    NoPendingGuraDecision,
    #[error("expected phase {expected:?}, found {actual:?}")]
    InvalidPhase {
        expected: GamePhase,
        actual: GamePhase,
    },
    #[error("seat {target} cannot be targeted")]
    InvalidTarget { target: SeatIndex },
}

impl RuleError {
    /// 需要告诉玩家的拒绝会在日志中留下一条提示，其余拒绝静默忽略。
    fn notice(&self, name: &str) -> Option<String> {
        match self {
            RuleError::MustDrawBeforePassing => {
                Some(format!("{name} must draw a card before passing"))
            }
            RuleError::MustPlayGuraCard { value } => {
                Some(format!("{name} must play their {value} card"))
            }
            RuleError::GuraCardsRemaining { value, .. } => Some(format!(
                "{name} must play all their {value} cards before ending the round"
            )),
            RuleError::NotGuraStarter => {
                Some(format!("{name} cannot end a GURA round they did not start"))
            }
            _ => None,
        }
    }
}

/// 一次操作的结果。被拒绝时 `state` 与输入相同（可能多一条提示日志）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResolution {
    pub state: GameState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RuleError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerId>,
}

impl RuleResolution {
    pub fn new(state: GameState, rejection: Option<RuleError>) -> Self {
        let winner = state.winner.clone();
        Self {
            state,
            rejection,
            winner,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.rejection.is_none()
    }
}

/// 规则引擎：把 (状态, 玩家, 操作) 映射为下一个完整状态。随机数来源可固定种子。
pub struct RuleEngine {
    rng: SmallRng,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// 洗牌、发牌，并结算翻开的第一张牌中不需要玩家决定的效果。
    pub fn initialize_game_state(&mut self, num_players: usize, settings: GameSettings) -> GameState {
        let deck = shuffle_deck(&create_deck(), &mut self.rng);
        let deal = deal_cards(deck, num_players, settings.hand_size);
        let mut state = GameState::new(deal.deck, deal.hands, deal.discard_pile, settings);
        state.log("Game started");

        let Some(top) = state.top_card().cloned() else {
            return state;
        };
        state.log(format!("Top card is {top}"));

        let second_seat = next_seat(0, num_players, Direction::Clockwise, false);
        match effect_of(&top, state.settings.mode) {
            CardEffect::Wild => {
                let suit = Suit::ALL[self.rng.gen_range(0..Suit::ALL.len())];
                state.wild_suit = Some(suit);
                state.log(format!(
                    "Initial wild card randomly selected {suit} as the active suit"
                ));
            }
            CardEffect::DrawTwo => {
                state.draw_cards(0, 2, &mut self.rng);
                state.log("First player draws 2 cards from initial 2 card");
                state.begin_turn(second_seat);
            }
            CardEffect::Reverse => {
                state.direction = Direction::CounterClockwise;
                state.log("Initial direction reversed to counter-clockwise");
            }
            CardEffect::DrawChain => {
                state.chain_type = Some(ChainType::DrawChain);
                state.draw_count = 2;
                state.log("Initial 7 starts a chain! First player must draw 2 cards or play a 7");
            }
            CardEffect::Skip => {
                state.begin_turn(second_seat);
                state.log("First player's turn skipped due to initial 9");
            }
            CardEffect::DrawTen => {
                state.chain_type = Some(ChainType::DrawTen);
                state.draw_count = 10;
                state.log(
                    "Initial Black Jack starts a chain! First player must draw 10 cards or play a black Jack",
                );
            }
            CardEffect::PlayAgain
            | CardEffect::Negate
            | CardEffect::Gura
            | CardEffect::Targeted(_)
            | CardEffect::Normal
            | CardEffect::None => {}
        }

        tracing::info!(players = num_players, top = %top, "game initialized");
        state
    }

    /// 对当前快照应用一个操作。总是返回一个可以发布的完整状态，从不 panic。
    pub fn apply(
        &mut self,
        state: &GameState,
        actor: &str,
        roster: &Roster,
        intent: GameIntent,
    ) -> RuleResolution {
        let mut next = state.clone();
        let outcome = Self::locate(state, actor, roster, &intent)
            .and_then(|seat| self.dispatch(&mut next, seat, roster, &intent));

        match outcome {
            Ok(()) => {
                Self::settle_provisional_winner(&mut next, roster);
                tracing::debug!(actor, ?intent, phase = ?next.game_phase, "intent applied");
                RuleResolution::new(next, None)
            }
            Err(error) => {
                tracing::warn!(actor, ?intent, %error, "intent rejected");
                let mut unchanged = state.clone();
                let name = roster
                    .find_by_id(actor)
                    .map_or("Player", |seat| seat.name.as_str());
                if let Some(message) = error.notice(name) {
                    unchanged.log(message);
                }
                RuleResolution::new(unchanged, Some(error))
            }
        }
    }

    pub fn play_card(
        &mut self,
        state: &GameState,
        actor: &str,
        roster: &Roster,
        card: &Card,
        hand_index: usize,
    ) -> RuleResolution {
        let intent = GameIntent::PlayCard {
            card_id: card.id.clone(),
            hand_index,
        };
        self.apply(state, actor, roster, intent)
    }

    pub fn draw_card(&mut self, state: &GameState, actor: &str, roster: &Roster) -> RuleResolution {
        self.apply(state, actor, roster, GameIntent::DrawCard)
    }

    pub fn select_suit(
        &mut self,
        state: &GameState,
        actor: &str,
        roster: &Roster,
        suit: Suit,
    ) -> RuleResolution {
        self.apply(state, actor, roster, GameIntent::SelectSuit { suit })
    }

    pub fn select_player(
        &mut self,
        state: &GameState,
        actor: &str,
        roster: &Roster,
        target_seat: SeatIndex,
    ) -> RuleResolution {
        self.apply(state, actor, roster, GameIntent::SelectPlayer { target_seat })
    }

    pub fn pass_turn(&mut self, state: &GameState, actor: &str, roster: &Roster) -> RuleResolution {
        self.apply(state, actor, roster, GameIntent::PassTurn)
    }

    pub fn confirm_gura(
        &mut self,
        state: &GameState,
        actor: &str,
        roster: &Roster,
        start: bool,
    ) -> RuleResolution {
        self.apply(state, actor, roster, GameIntent::ConfirmGura { start })
    }

    pub fn end_gura(&mut self, state: &GameState, actor: &str, roster: &Roster) -> RuleResolution {
        self.apply(state, actor, roster, GameIntent::EndGura)
    }

    pub fn start_new_game(
        &mut self,
        state: &GameState,
        actor: &str,
        roster: &Roster,
    ) -> RuleResolution {
        self.apply(state, actor, roster, GameIntent::StartNewGame)
    }

    /// 新一局按当前名单重新发牌，人数可以和上一局不同。
    fn locate(
        state: &GameState,
        actor: &str,
        roster: &Roster,
        intent: &GameIntent,
    ) -> Result<SeatIndex, RuleError> {
        if *intent != GameIntent::StartNewGame && roster.len() != state.seat_count() {
            return Err(RuleError::RosterMismatch {
                roster: roster.len(),
                hands: state.seat_count(),
            });
        }
        roster.seat_of(actor).ok_or_else(|| RuleError::UnknownPlayer {
            actor: actor.to_owned(),
        })
    }

    fn dispatch(
        &mut self,
        state: &mut GameState,
        seat: SeatIndex,
        roster: &Roster,
        intent: &GameIntent,
    ) -> Result<(), RuleError> {
        if state.turn.seat != state.current_player_index {
            state.begin_turn(state.current_player_index);
        }

        match intent {
            GameIntent::PlayCard {
                card_id,
                hand_index,
            } => self.play(state, seat, roster, card_id, *hand_index),
            GameIntent::DrawCard => self.draw(state, seat, roster),
            GameIntent::SelectSuit { suit } => Self::choose_suit(state, seat, roster, *suit),
            GameIntent::SelectPlayer { target_seat } => {
                self.choose_player(state, seat, roster, *target_seat)
            }
            GameIntent::PassTurn => Self::pass(state, seat, roster),
            GameIntent::ConfirmGura { start } => {
                Self::ensure_in_play(state)?;
                if !state.pending_gura_decision {
                    return Err(RuleError::NoPendingGuraDecision);
                }
                Self::ensure_turn_owner(state, seat)?;
                Self::resolve_gura_decision(state, seat, roster, *start);
                Ok(())
            }
            GameIntent::EndGura => Self::finish_gura(state, seat, roster),
            GameIntent::StartNewGame => {
                if !state.is_game_over() {
                    return Err(RuleError::GameInProgress);
                }
                let settings = state.settings.clone();
                *state = self.initialize_game_state(roster.len(), settings);
                Ok(())
            }
        }
    }

    fn ensure_in_play(state: &GameState) -> Result<(), RuleError> {
        if state.is_game_over() {
            return Err(RuleError::GameFinished);
        }
        Ok(())
    }

    fn ensure_turn_owner(state: &GameState, seat: SeatIndex) -> Result<(), RuleError> {
        if state.current_player_index != seat {
            return Err(RuleError::NotPlayerTurn { seat });
        }
        Ok(())
    }

    fn ensure_no_decision(state: &GameState) -> Result<(), RuleError> {
        if state.game_phase.awaits_decision() {
            return Err(RuleError::DecisionPending);
        }
        Ok(())
    }

    fn play(
        &mut self,
        state: &mut GameState,
        seat: SeatIndex,
        roster: &Roster,
        card_id: &str,
        hand_index: usize,
    ) -> Result<(), RuleError> {
        Self::ensure_in_play(state)?;
        Self::ensure_turn_owner(state, seat)?;

        let hand = state.hand(seat);
        let position = match hand.get(hand_index) {
            Some(card) if card.id == card_id => Some(hand_index),
            _ => hand.iter().position(|card| card.id == card_id),
        }
        .ok_or_else(|| RuleError::CardNotInHand {
            card_id: card_id.to_owned(),
            hand_index,
        })?;
        let card = hand[position].clone();

        check_play(state, &card).map_err(|block| RuleError::IllegalCard {
            card_id: card.id.clone(),
            block,
        })?;

        let seats = state.seat_count();
        let name = roster.name_of(seat).to_owned();
        state.hands[seat].remove(position);
        state.discard_pile.push(card.clone());
        state.wild_suit = None;
        state.revealed_hand = None;
        state.log(format!("{name} played {card}"));

        if state.potential_winner.is_some() && card.value == Value::Seven {
            state.potential_winner = None;
            state.log(format!("{name} countered the final 7 with their own 7!"));
        }

        let effect = effect_of(&card, state.settings.mode);
        let in_gura_round = state.game_phase == GamePhase::Gura;
        if in_gura_round && effect == CardEffect::Gura {
            let has_more = state.holds_value(seat, card.value);
            if !has_more && state.gura_starter_index == Some(seat) {
                state.game_phase = GamePhase::Playing;
                state.clear_gura();
                state.log(format!(
                    "{name} played their last GURA card, ending the round!"
                ));
            } else if !has_more {
                state.log(format!(
                    "{name} played their last GURA card, but the round continues!"
                ));
            }
        }

        let direction = state.direction;
        let following = next_seat(seat, seats, direction, false);
        let mut current = seat;
        match effect {
            CardEffect::Wild => {
                state.game_phase = GamePhase::SuitSelection;
                state.last_player_index = Some(seat);
            }
            CardEffect::DrawTwo => {
                let victim = previous_seat(seat, seats, direction);
                state.draw_cards(victim, 2, &mut self.rng);
                let victim_name = roster.name_of(victim);
                state.log(format!("{victim_name} draws 2 cards"));
                if seats == 2 {
                    current = victim;
                    state.log(format!("{victim_name} continues their turn"));
                }
            }
            CardEffect::Reverse => {
                state.direction = direction.reversed();
                if seats != 2 {
                    current = next_seat(seat, seats, state.direction, false);
                }
                state.log(format!("{name} reversed the direction of play"));
            }
            CardEffect::DrawChain => {
                if state.chain_type == Some(ChainType::DrawChain) {
                    state.draw_count += 2;
                    state.log(format!(
                        "{name} added to the chain! Next player draws {} cards or plays a 7",
                        state.draw_count
                    ));
                } else {
                    state.chain_type = Some(ChainType::DrawChain);
                    state.draw_count = 2;
                    state.log(format!(
                        "{name} started a chain! Next player draws 2 cards or plays a 7"
                    ));
                }
                current = following;
            }
            CardEffect::PlayAgain => {
                state.log(format!("{name} plays again!"));
            }
            CardEffect::Skip => {
                if seats != 2 {
                    current = next_seat(seat, seats, direction, true);
                }
                state.log(format!("{}'s turn is skipped", roster.name_of(following)));
            }
            CardEffect::DrawTen => {
                if state.chain_type == Some(ChainType::DrawTen) {
                    state.draw_count += 10;
                    state.log(format!(
                        "{name} added to the chain! Next player draws {} cards or plays a black Jack",
                        state.draw_count
                    ));
                } else {
                    state.chain_type = Some(ChainType::DrawTen);
                    state.draw_count = 10;
                    state.log(format!(
                        "{name} started a chain! Next player draws 10 cards or plays a black Jack"
                    ));
                }
                current = following;
            }
            CardEffect::Negate => {
                if matches!(
                    state.chain_type,
                    Some(ChainType::DrawTen | ChainType::DrawTenResponse)
                ) {
                    state.clear_chain();
                    state.log(format!("{name} negated the black Jack with a red Jack!"));
                }
                current = following;
            }
            CardEffect::Gura => {
                let copies = state
                    .hand(seat)
                    .iter()
                    .filter(|held| held.value == card.value)
                    .count();
                if in_gura_round || copies == 0 {
                    current = following;
                } else {
                    state.gura_card_value = Some(card.value);
                    state.gura_starter_index = Some(seat);
                    state.pending_gura_decision = true;
                    state.has_many_gura_cards = copies > 1;
                    state.log(format!(
                        "{name} played a {}. They can start a GURA round!",
                        card.value
                    ));
                }
            }
            CardEffect::Targeted(targeted) => {
                state.game_phase = GamePhase::PlayerSelection;
                state.pending_effect = Some(targeted);
                state.last_player_index = Some(seat);
                state.log(format!("{name} must choose a player ({targeted})"));
            }
            CardEffect::Normal | CardEffect::None => {
                current = following;
            }
        }

        let mut redrew = false;
        if state.hand(seat).is_empty() {
            if seats == 2 && matches!(card.value, Value::Three | Value::Eight | Value::Nine) {
                state.log(format!(
                    "{name} played their last card, but must draw another since it was a {}!",
                    card.value
                ));
                if state.draw_cards(seat, 1, &mut self.rng) > 0 {
                    state.log(format!("{name} draws a card and continues their turn"));
                }
                current = seat;
                redrew = true;
            } else if card.value == Value::Seven
                && state.chain_type == Some(ChainType::DrawChain)
            {
                state.log(format!(
                    "{name} played their last card, but the next player must respond to the 7!"
                ));
                state.potential_winner = roster.seat(seat).map(|player| player.id.clone());
            } else {
                Self::declare_winner(state, seat, roster);
                return Ok(());
            }
        }

        if current != seat || !effect.is_normal() {
            state.begin_turn(current);
        }
        if redrew {
            state.turn.has_drawn = true;
        }
        Ok(())
    }

    fn draw(
        &mut self,
        state: &mut GameState,
        seat: SeatIndex,
        roster: &Roster,
    ) -> Result<(), RuleError> {
        Self::ensure_in_play(state)?;
        Self::ensure_no_decision(state)?;
        Self::ensure_turn_owner(state, seat)?;

        if state.pending_gura_decision {
            Self::resolve_gura_decision(state, seat, roster, false);
            return Ok(());
        }

        let name = roster.name_of(seat).to_owned();
        if state.draw_count > 0 {
            let owed = state.draw_count;
            let drawn = state.draw_cards(seat, owed, &mut self.rng);
            state.clear_chain();
            state.turn.must_respond = true;
            state.log(format!("{name} drew {drawn} cards"));
            state.log(format!("{name} continues their turn"));
        } else {
            if state.draw_cards(seat, 1, &mut self.rng) > 0 {
                state.log(format!("{name} drew a card"));
            } else {
                state.log(format!(
                    "{name} attempted to draw, but there are no cards left"
                ));
            }
            state.turn.has_drawn = true;
        }

        if state.game_phase == GamePhase::Gura {
            if let Some(value) = state.gura_card_value {
                if state.holds_value(seat, value) {
                    state.log(format!("{name} drew a card and should play their {value}"));
                } else {
                    state.log(format!("{name} drew a card and doesn't have a {value}"));
                    if state.settings.gura_draw_policy == GuraDrawPolicy::AutoAdvance {
                        let following =
                            next_seat(seat, state.seat_count(), state.direction, false);
                        state.log(format!("{name} passed their turn"));
                        state.begin_turn(following);
                    }
                }
            }
        }
        Ok(())
    }

    fn choose_suit(
        state: &mut GameState,
        seat: SeatIndex,
        roster: &Roster,
        suit: Suit,
    ) -> Result<(), RuleError> {
        Self::ensure_in_play(state)?;
        if state.game_phase != GamePhase::SuitSelection {
            return Err(RuleError::InvalidPhase {
                expected: GamePhase::SuitSelection,
                actual: state.game_phase,
            });
        }
        if state.last_player_index != Some(seat) {
            return Err(RuleError::NotPlayerTurn { seat });
        }

        state.wild_suit = Some(suit);
        state.game_phase = GamePhase::Playing;
        state.log(format!(
            "{} selected {suit} as the active suit",
            roster.name_of(seat)
        ));
        state.begin_turn(next_seat(seat, state.seat_count(), state.direction, false));
        Ok(())
    }

    fn choose_player(
        &mut self,
        state: &mut GameState,
        seat: SeatIndex,
        roster: &Roster,
        target: SeatIndex,
    ) -> Result<(), RuleError> {
        Self::ensure_in_play(state)?;
        let invalid_phase = RuleError::InvalidPhase {
            expected: GamePhase::PlayerSelection,
            actual: state.game_phase,
        };
        if state.game_phase != GamePhase::PlayerSelection {
            return Err(invalid_phase);
        }
        if state.last_player_index != Some(seat) {
            return Err(RuleError::NotPlayerTurn { seat });
        }
        if target == seat || target >= state.seat_count() {
            return Err(RuleError::InvalidTarget { target });
        }
        let effect = state.pending_effect.ok_or(invalid_phase)?;

        let name = roster.name_of(seat).to_owned();
        let target_name = roster.name_of(target).to_owned();
        match effect {
            TargetedEffect::SwapHands => {
                state.hands.swap(seat, target);
                state.log(format!("{name} swapped hands with {target_name}"));
            }
            TargetedEffect::StealCard => {
                let available = state.hands[target].len();
                if available == 0 {
                    state.log(format!("{target_name} has no cards to steal"));
                } else {
                    let stolen = state.hands[target].remove(self.rng.gen_range(0..available));
                    state.hands[seat].push(stolen);
                    state.log(format!("{name} stole a card from {target_name}"));
                }
            }
            TargetedEffect::SwapRandom => {
                let (mine, theirs) = (state.hands[seat].len(), state.hands[target].len());
                if mine == 0 || theirs == 0 {
                    state.log(format!("{name} has nothing to swap with {target_name}"));
                } else {
                    let given = state.hands[seat].remove(self.rng.gen_range(0..mine));
                    let taken = state.hands[target].remove(self.rng.gen_range(0..theirs));
                    state.hands[seat].push(taken);
                    state.hands[target].push(given);
                    state.log(format!("{name} swapped a random card with {target_name}"));
                }
            }
            TargetedEffect::SeeHand => {
                let cards = state.hands[target].clone();
                let listing = cards
                    .iter()
                    .map(Card::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                state.log(format!("{name} revealed {target_name}'s hand: {listing}"));
                state.revealed_hand = Some(RevealedHand {
                    seat: target,
                    cards,
                });
            }
        }

        state.pending_effect = None;
        state.game_phase = GamePhase::Playing;

        let emptied = [target, seat]
            .into_iter()
            .find(|candidate| state.hand(*candidate).is_empty());
        if let Some(emptied) = emptied {
            Self::declare_winner(state, emptied, roster);
            return Ok(());
        }

        state.begin_turn(next_seat(seat, state.seat_count(), state.direction, false));
        Ok(())
    }

    fn pass(state: &mut GameState, seat: SeatIndex, roster: &Roster) -> Result<(), RuleError> {
        Self::ensure_in_play(state)?;
        Self::ensure_no_decision(state)?;
        Self::ensure_turn_owner(state, seat)?;

        if state.pending_gura_decision {
            Self::resolve_gura_decision(state, seat, roster, false);
            return Ok(());
        }
        if !state.turn.has_drawn && !state.turn.must_respond {
            return Err(RuleError::MustDrawBeforePassing);
        }
        if state.game_phase == GamePhase::Gura && !state.turn.has_drawn {
            if let Some(value) = state.gura_card_value {
                if state.holds_value(seat, value) {
                    return Err(RuleError::MustPlayGuraCard { value });
                }
            }
        }

        state.log(format!("{} passed their turn", roster.name_of(seat)));
        state.begin_turn(next_seat(seat, state.seat_count(), state.direction, false));
        Ok(())
    }

    fn resolve_gura_decision(state: &mut GameState, seat: SeatIndex, roster: &Roster, start: bool) {
        let name = roster.name_of(seat).to_owned();
        state.pending_gura_decision = false;
        if start {
            state.game_phase = GamePhase::Gura;
            state.chain_type = Some(ChainType::Gura);
            let value = state
                .gura_card_value
                .map_or_else(String::new, |value| value.to_string());
            state.log(format!("{name} started a GURA round with a {value}!"));
        } else {
            state.game_phase = GamePhase::Playing;
            state.clear_gura();
            state.log(format!("{name} decided not to start a GURA round"));
        }
        state.begin_turn(next_seat(seat, state.seat_count(), state.direction, false));
    }

    fn finish_gura(
        state: &mut GameState,
        seat: SeatIndex,
        roster: &Roster,
    ) -> Result<(), RuleError> {
        Self::ensure_in_play(state)?;
        if state.game_phase != GamePhase::Gura {
            return Err(RuleError::InvalidPhase {
                expected: GamePhase::Gura,
                actual: state.game_phase,
            });
        }
        if state.gura_starter_index != Some(seat) {
            return Err(RuleError::NotGuraStarter);
        }
        if let Some(value) = state.gura_card_value {
            let remaining = state
                .hand(seat)
                .iter()
                .filter(|card| card.value == value)
                .count();
            if remaining > 0 {
                return Err(RuleError::GuraCardsRemaining { value, remaining });
            }
        }

        state.game_phase = GamePhase::Playing;
        state.clear_gura();
        state.log(format!("{} ended the GURA round", roster.name_of(seat)));
        state.begin_turn(next_seat(seat, state.seat_count(), state.direction, false));
        Ok(())
    }

    fn declare_winner(state: &mut GameState, seat: SeatIndex, roster: &Roster) {
        state.game_phase = GamePhase::GameOver;
        state.winner = roster.seat(seat).map(|player| player.id.clone());
        state.potential_winner = None;
        state.pending_effect = None;
        state.pending_gura_decision = false;
        state.log(format!("{} has won the game!", roster.name_of(seat)));
        tracing::info!(seat, winner = ?state.winner, "game over");
    }

    /// 临时赢家：最后一张是 7 时，原玩家的下一家若没有 7 即确认获胜。
    fn settle_provisional_winner(state: &mut GameState, roster: &Roster) {
        if state.is_game_over() {
            return;
        }
        let Some(seat) = state
            .potential_winner
            .as_deref()
            .and_then(|id| roster.seat_of(id))
        else {
            return;
        };

        if !state.hand(seat).is_empty() {
            state.potential_winner = None;
            state.log(format!(
                "{} no longer has an empty hand",
                roster.name_of(seat)
            ));
            return;
        }

        let responder = next_seat(seat, state.seat_count(), state.direction, false);
        if !state.holds_value(responder, Value::Seven) {
            Self::declare_winner(state, seat, roster);
        }
    }
}

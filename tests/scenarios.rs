//! 通过公开接口跑完整场景。`game::fixtures` 只在单元测试中可见，这里保留一份同样的牌桌构造函数。

use gura_game::game::{
    create_deck, playable_indices, GameIntent, GamePhase, GameSettings, GameState, Roster,
    RuleEngine, Seat, Suit, Value, TOTAL_CARDS,
};
use gura_game::{GameSession, InMemoryChannel, RuleError};
use proptest::prelude::*;

fn roster(players: usize) -> Roster {
    (0..players)
        .map(|idx| Seat::new(format!("p{idx}"), format!("Player {idx}")))
        .collect()
}

/// 指定各家手牌和顶牌，其余牌作为牌堆。
fn table(hands: &[&[(Suit, Value)]], top: (Suit, Value)) -> GameState {
    let mut pool = create_deck();
    let mut take = |(suit, value): (Suit, Value)| {
        let pos = pool
            .iter()
            .position(|card| card.suit == suit && card.value == value)
            .expect("card left in pool");
        pool.remove(pos)
    };
    let hands: Vec<_> = hands
        .iter()
        .map(|faces| faces.iter().map(|face| take(*face)).collect())
        .collect();
    let top = take(top);
    GameState::new(pool, hands, vec![top], GameSettings::default())
}

fn play(engine: &mut RuleEngine, state: &GameState, seat: usize, suit: Suit, value: Value) -> gura_game::RuleResolution {
    let hand_index = state
        .hand(seat)
        .iter()
        .position(|card| card.suit == suit && card.value == value)
        .expect("card in hand");
    let card = state.hand(seat)[hand_index].clone();
    engine.play_card(state, &format!("p{seat}"), &roster(state.seat_count()), &card, hand_index)
}

#[test]
fn value_match_two_makes_previous_seat_draw() {
    let mut engine = RuleEngine::with_seed(7);
    let state = table(
        &[
            &[(Suit::Hearts, Value::Two), (Suit::Clubs, Value::Five)],
            &[(Suit::Spades, Value::Four)],
            &[(Suit::Spades, Value::Six)],
            &[(Suit::Spades, Value::Ten)],
        ],
        (Suit::Diamonds, Value::Two),
    );

    let resolution = play(&mut engine, &state, 0, Suit::Hearts, Value::Two);

    assert!(resolution.is_accepted());
    assert_eq!(resolution.state.hand(3).len(), 3);
    assert_eq!(resolution.state.current_player_index, 0);
    assert_eq!(resolution.state.integrity_check(), Ok(()));
}

#[test]
fn black_jack_on_unrelated_seven_is_a_no_op() {
    let mut engine = RuleEngine::with_seed(7);
    let mut state = table(
        &[
            &[(Suit::Hearts, Value::Four)],
            &[(Suit::Clubs, Value::Jack), (Suit::Hearts, Value::Five)],
            &[(Suit::Diamonds, Value::Five)],
        ],
        (Suit::Spades, Value::Seven),
    );
    state.begin_turn(1);

    let resolution = play(&mut engine, &state, 1, Suit::Clubs, Value::Jack);

    assert!(matches!(resolution.rejection, Some(RuleError::IllegalCard { .. })));
    assert_eq!(resolution.state, state);
}

#[test]
fn king_with_a_spare_king_opens_a_gura_round() {
    let mut engine = RuleEngine::with_seed(7);
    let roster = roster(4);
    let mut state = table(
        &[
            &[(Suit::Clubs, Value::Four)],
            &[(Suit::Clubs, Value::Five)],
            &[(Suit::Hearts, Value::King), (Suit::Clubs, Value::King), (Suit::Clubs, Value::Six)],
            &[(Suit::Diamonds, Value::Five)],
        ],
        (Suit::Hearts, Value::Four),
    );
    state.begin_turn(2);

    let pending = play(&mut engine, &state, 2, Suit::Hearts, Value::King).state;
    assert!(pending.pending_gura_decision);
    assert_eq!(pending.current_player_index, 2);

    let round = engine.confirm_gura(&pending, "p2", &roster, true).state;
    assert_eq!(round.game_phase, GamePhase::Gura);
    assert_eq!(round.gura_card_value, Some(Value::King));
    assert_eq!(round.current_player_index, 3);
}

#[test]
fn two_player_last_eight_draws_a_replacement() {
    let mut engine = RuleEngine::with_seed(7);
    let state = table(
        &[&[(Suit::Hearts, Value::Eight)], &[(Suit::Spades, Value::Four)]],
        (Suit::Hearts, Value::Ten),
    );

    let next = play(&mut engine, &state, 0, Suit::Hearts, Value::Eight).state;

    assert_eq!(next.game_phase, GamePhase::Playing);
    assert_eq!(next.hand(0).len(), 1);
    assert_eq!(next.current_player_index, 0);
}

#[test]
fn session_replays_a_full_turn_through_the_channel() {
    let mut session = GameSession::with_engine(InMemoryChannel::new(), roster(3), RuleEngine::with_seed(21));
    let started = session.start(GameSettings::default()).expect("publish");
    let actor = format!("p{}", started.current_player_index);

    session.submit(&actor, GameIntent::DrawCard).expect("channel healthy");
    let latest = session.state().expect("readable").expect("published");
    if latest.turn.has_drawn {
        let passed = session.submit(&actor, GameIntent::PassTurn).expect("channel healthy");
        assert!(passed.is_accepted());
        assert_ne!(passed.state.current_player_index, started.current_player_index);
    }
    let latest = session.state().expect("readable").expect("published");
    assert_eq!(latest.total_cards(), TOTAL_CARDS);
}

/// 为当前可以行动的玩家挑一个操作：`choice` 决定出哪张牌或摸牌/pass。
fn pick_intent(state: &GameState, choice: usize) -> (usize, GameIntent) {
    let seat = state.current_player_index;
    match state.game_phase {
        GamePhase::SuitSelection => {
            let seat = state.last_player_index.unwrap_or(seat);
            return (seat, GameIntent::SelectSuit { suit: Suit::ALL[choice % 4] });
        }
        GamePhase::PlayerSelection => {
            let seat = state.last_player_index.unwrap_or(seat);
            let others = state.seat_count() - 1;
            let target = (seat + 1 + choice % others) % state.seat_count();
            return (seat, GameIntent::SelectPlayer { target_seat: target });
        }
        GamePhase::Gura if state.gura_starter_index == Some(seat) && choice % 5 == 0 => {
            return (seat, GameIntent::EndGura);
        }
        _ => {}
    }
    if state.pending_gura_decision {
        return (seat, GameIntent::ConfirmGura { start: choice % 2 == 0 });
    }

    let playable = playable_indices(state, state.hand(seat));
    if !playable.is_empty() && choice % 4 != 0 {
        let hand_index = playable[choice % playable.len()];
        let card_id = state.hand(seat)[hand_index].id.clone();
        return (seat, GameIntent::PlayCard { card_id, hand_index });
    }
    if state.turn.has_drawn || state.turn.must_respond {
        (seat, GameIntent::PassTurn)
    } else {
        (seat, GameIntent::DrawCard)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn cards_are_conserved_across_random_games(
        seed in any::<u64>(),
        players in 2usize..=6,
        chaos in any::<bool>(),
        choices in proptest::collection::vec(any::<usize>(), 1..150),
    ) {
        let mut engine = RuleEngine::with_seed(seed);
        let roster = roster(players);
        let mode = if chaos { gura_game::GameMode::Chaos } else { gura_game::GameMode::Classic };
        let mut state = engine.initialize_game_state(players, GameSettings::default().with_mode(mode));
        prop_assert_eq!(state.integrity_check(), Ok(()));

        for choice in choices {
            if state.is_game_over() {
                break;
            }
            let (seat, intent) = pick_intent(&state, choice);
            let resolution = engine.apply(&state, &format!("p{seat}"), &roster, intent);
            prop_assert_eq!(resolution.state.total_cards(), TOTAL_CARDS);
            prop_assert_eq!(resolution.state.integrity_check(), Ok(()));
            if resolution.rejection.is_some() {
                prop_assert_eq!(&resolution.state.hands, &state.hands);
                prop_assert_eq!(resolution.state.current_player_index, state.current_player_index);
            }
            state = resolution.state;
        }
    }
}

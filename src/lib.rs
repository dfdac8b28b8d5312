pub mod channel;
pub mod game;
pub mod logging;

use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use std::str::FromStr;
use wasm_bindgen::prelude::*;

pub use channel::{ChannelError, GameSession, InMemoryChannel, StateChannel};
pub use game::{
    Card, CardEffect, ChainType, Direction, GameIntent, GameMode, GamePhase, GameSettings,
    GameState, IntegrityError, PlayBlock, Roster, RuleEngine, RuleError, RuleResolution, Seat,
    Suit, Value,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    logging::init_console_logging();
}

fn to_js_error<E: Serialize + std::fmt::Display>(error: E) -> JsValue {
    to_value(&error).unwrap_or_else(|_| JsValue::from_str(&error.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn make_resolution_json(resolution: &RuleResolution) -> Result<String, JsValue> {
    serde_json::to_string(resolution).map_err(serde_to_js_error)
}

fn parse_settings(settings_json: Option<String>) -> Result<GameSettings, JsValue> {
    match settings_json {
        Some(json) if !json.trim().is_empty() => {
            GameSettings::from_json(&json).map_err(serde_to_js_error)
        }
        _ => Ok(GameSettings::default()),
    }
}

fn engine_from_seed(seed: Option<u32>) -> RuleEngine {
    seed.map_or_else(RuleEngine::new, |seed| RuleEngine::with_seed(u64::from(seed)))
}

/// 一张牌桌的本地副本。界面把收到的快照交给它，再把操作结果发布出去。
#[wasm_bindgen]
pub struct GameEngine {
    state: Option<GameState>,
    engine: RuleEngine,
}

#[wasm_bindgen]
impl GameEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(initial_state_json: Option<String>, seed: Option<u32>) -> Result<GameEngine, JsValue> {
        let state = initial_state_json
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(serde_to_js_error)?;
        Ok(GameEngine {
            state,
            engine: engine_from_seed(seed),
        })
    }

    pub fn has_state(&self) -> bool {
        self.state.is_some()
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state: GameState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        self.state = Some(state);
        Ok(())
    }

    /// 按名单开一局，返回新状态的 JSON。
    pub fn start_game(
        &mut self,
        roster_json: &str,
        settings_json: Option<String>,
    ) -> Result<String, JsValue> {
        let roster: Roster = serde_json::from_str(roster_json).map_err(serde_to_js_error)?;
        let settings = parse_settings(settings_json)?;
        let state = self.engine.initialize_game_state(roster.len(), settings);
        let json = serde_json::to_string(&state).map_err(serde_to_js_error)?;
        self.state = Some(state);
        Ok(json)
    }

    /// 应用一个操作，返回 `RuleResolution` 的 JSON。被拒绝的操作不会报错，只带 `rejection`。
    pub fn apply_intent_json(
        &mut self,
        actor: &str,
        roster_json: &str,
        intent_json: &str,
    ) -> Result<String, JsValue> {
        let roster: Roster = serde_json::from_str(roster_json).map_err(serde_to_js_error)?;
        let intent: GameIntent = serde_json::from_str(intent_json).map_err(serde_to_js_error)?;

        let resolution = match self.state.as_ref() {
            Some(state) => self.engine.apply(state, actor, &roster, intent),
            None if intent == GameIntent::StartNewGame => {
                let state = self
                    .engine
                    .initialize_game_state(roster.len(), GameSettings::default());
                RuleResolution::new(state, None)
            }
            None => return Err(serde_to_js_error(ChannelError::NoGameState)),
        };
        let json = make_resolution_json(&resolution)?;
        self.state = Some(resolution.state);
        Ok(json)
    }

    /// 当前玩家手里此刻可以出的牌的位置。
    pub fn playable_indices(&self, seat: usize) -> Vec<usize> {
        self.state.as_ref().map_or_else(Vec::new, |state| {
            game::playable_indices(state, state.hand(seat))
        })
    }
}

#[wasm_bindgen(js_name = "initializeGameState")]
pub fn initialize_game_state(
    num_players: usize,
    settings: JsValue,
    seed: Option<u32>,
) -> Result<JsValue, JsValue> {
    let settings: GameSettings = if settings.is_undefined() || settings.is_null() {
        GameSettings::default()
    } else {
        from_value(settings).map_err(JsValue::from)?
    };
    let state = engine_from_seed(seed).initialize_game_state(num_players, settings);
    to_value(&state).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "applyIntent")]
pub fn apply_intent(
    state: JsValue,
    actor: &str,
    roster: JsValue,
    intent: JsValue,
) -> Result<JsValue, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    let roster: Roster = from_value(roster).map_err(JsValue::from)?;
    let intent: GameIntent = from_value(intent).map_err(JsValue::from)?;
    let resolution = RuleEngine::new().apply(&state, actor, &roster, intent);
    to_value(&resolution).map_err(JsValue::from)
}

/// 基础匹配（不考虑连锁与 GURA）。
#[wasm_bindgen(js_name = "canPlayCard")]
pub fn can_play_card(
    top_card: JsValue,
    card: JsValue,
    wild_suit: Option<String>,
) -> Result<bool, JsValue> {
    let top: Card = from_value(top_card).map_err(JsValue::from)?;
    let card: Card = from_value(card).map_err(JsValue::from)?;
    let wild_suit = wild_suit
        .as_deref()
        .and_then(|value| Suit::from_str(value).ok());
    Ok(game::can_play(&top, &card, wild_suit))
}

#[wasm_bindgen(js_name = "canPlayCardNow")]
pub fn can_play_card_now(state: JsValue, card: JsValue) -> Result<bool, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    let card: Card = from_value(card).map_err(JsValue::from)?;
    Ok(game::can_play_now(&state, &card))
}

#[wasm_bindgen(js_name = "cardEffect")]
pub fn card_effect(card: JsValue, mode: Option<String>) -> Result<JsValue, JsValue> {
    let card: Option<Card> = from_value(card).map_err(JsValue::from)?;
    let mode = mode
        .as_deref()
        .and_then(|value| GameMode::from_str(value).ok())
        .unwrap_or_default();
    let effect = game::effect_of_top(card.as_ref(), mode);
    to_value(&effect).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "cardEffectDescription")]
pub fn card_effect_description(card: JsValue, mode: Option<String>) -> Result<String, JsValue> {
    let card: Option<Card> = from_value(card).map_err(JsValue::from)?;
    let mode = mode
        .as_deref()
        .and_then(|value| GameMode::from_str(value).ok())
        .unwrap_or_default();
    Ok(game::effect_of_top(card.as_ref(), mode).description().to_owned())
}

#[wasm_bindgen(js_name = "nextSeat")]
pub fn next_seat(current: usize, seat_count: usize, counter_clockwise: bool, skip: bool) -> usize {
    let direction = if counter_clockwise {
        Direction::CounterClockwise
    } else {
        Direction::Clockwise
    };
    game::next_seat(current, seat_count, direction, skip)
}

#[wasm_bindgen(js_name = "validateState")]
pub fn validate_state(state: JsValue) -> Result<(), JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    state.integrity_check().map_err(to_js_error)
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}

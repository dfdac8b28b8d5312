use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::cards::{Card, Value};

/// 游戏模式。`Chaos` 模式下 4/5/6/10 带有指定玩家的效果。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Classic,
    Chaos,
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" | "normal" => Ok(GameMode::Classic),
            "chaos" => Ok(GameMode::Chaos),
            _ => Err(()),
        }
    }
}

/// 需要出牌者选择目标玩家后才能结算的效果（仅 Chaos 模式）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetedEffect {
    SwapHands,
    StealCard,
    SwapRandom,
    SeeHand,
}

impl TargetedEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetedEffect::SwapHands => "swap_hands",
            TargetedEffect::StealCard => "steal_card",
            TargetedEffect::SwapRandom => "swap_random",
            TargetedEffect::SeeHand => "see_hand",
        }
    }
}

impl fmt::Display for TargetedEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 打出一张牌后产生的效果类别。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "effect", rename_all = "snake_case")]
pub enum CardEffect {
    Wild,
    DrawTwo,
    Reverse,
    DrawChain,
    PlayAgain,
    Skip,
    DrawTen,
    Negate,
    Gura,
    Targeted(TargetedEffect),
    Normal,
    /// 没有牌时的占位，仅供展示层使用。
    None,
}

impl CardEffect {
    pub fn is_normal(self) -> bool {
        matches!(self, CardEffect::Normal)
    }

    pub fn description(self) -> &'static str {
        match self {
            CardEffect::Wild => "Can be played on any card and change the suit",
            CardEffect::DrawTwo => "Makes the previous player draw 2 cards",
            CardEffect::Reverse => "Changes the direction of play",
            CardEffect::DrawChain => "Next player draws 2 cards or plays another 7 to chain",
            CardEffect::PlayAgain => "Player can play again",
            CardEffect::Skip => "Makes the next player lose a turn",
            CardEffect::DrawTen => {
                "Next player draws 10 cards or plays another black Jack to chain"
            }
            CardEffect::Negate => "Negates the effect of a black Jack",
            CardEffect::Gura => "Starts a GURA round if you have more in hand",
            CardEffect::Targeted(TargetedEffect::SwapHands) => "Swap hands with an opponent",
            CardEffect::Targeted(TargetedEffect::StealCard) => "Take one card from an opponent",
            CardEffect::Targeted(TargetedEffect::SwapRandom) => {
                "Swap a random card with an opponent"
            }
            CardEffect::Targeted(TargetedEffect::SeeHand) => {
                "Reveal an opponent's hand to everyone"
            }
            CardEffect::Normal => "",
            CardEffect::None => "No card effect",
        }
    }
}

/// 根据牌面（与当前模式）求出效果。对任意合法牌都是全函数。
pub fn effect_of(card: &Card, mode: GameMode) -> CardEffect {
    match card.value {
        Value::Ace => CardEffect::Wild,
        Value::Two => CardEffect::DrawTwo,
        Value::Three => CardEffect::Reverse,
        Value::Seven => CardEffect::DrawChain,
        Value::Eight => CardEffect::PlayAgain,
        Value::Nine => CardEffect::Skip,
        Value::Jack if card.suit.is_red() => CardEffect::Negate,
        Value::Jack => CardEffect::DrawTen,
        Value::Queen | Value::King => CardEffect::Gura,
        Value::Four | Value::Five | Value::Six | Value::Ten => match mode {
            GameMode::Classic => CardEffect::Normal,
            GameMode::Chaos => CardEffect::Targeted(match card.value {
                Value::Four => TargetedEffect::SwapHands,
                Value::Five => TargetedEffect::StealCard,
                Value::Six => TargetedEffect::SwapRandom,
                _ => TargetedEffect::SeeHand,
            }),
        },
    }
}

/// 展示层可能在弃牌堆为空时查询效果。
pub fn effect_of_top(card: Option<&Card>, mode: GameMode) -> CardEffect {
    card.map_or(CardEffect::None, |card| effect_of(card, mode))
}

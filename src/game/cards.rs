use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 一副标准扑克的张数。
pub const CARDS_PER_DECK: usize = 52;
/// 每局使用的副数。
pub const DECK_COPIES: u8 = 2;
/// 一局牌的总张数（两副标准扑克）。
pub const TOTAL_CARDS: usize = CARDS_PER_DECK * DECK_COPIES as usize;

/// 全局唯一的卡牌标识，形如 `hearts_king_1`。
pub type CardId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Suit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hearts" => Ok(Suit::Hearts),
            "diamonds" => Ok(Suit::Diamonds),
            "clubs" => Ok(Suit::Clubs),
            "spades" => Ok(Suit::Spades),
            _ => Err(()),
        }
    }
}

/// 牌面点数。`Ace` 即 "1"，作为万能牌。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Value {
    #[serde(rename = "1")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "jack")]
    Jack,
    #[serde(rename = "queen")]
    Queen,
    #[serde(rename = "king")]
    King,
}

impl Value {
    pub const ALL: [Value; 13] = [
        Value::Ace,
        Value::Two,
        Value::Three,
        Value::Four,
        Value::Five,
        Value::Six,
        Value::Seven,
        Value::Eight,
        Value::Nine,
        Value::Ten,
        Value::Jack,
        Value::Queen,
        Value::King,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Value::Ace => "1",
            Value::Two => "2",
            Value::Three => "3",
            Value::Four => "4",
            Value::Five => "5",
            Value::Six => "6",
            Value::Seven => "7",
            Value::Eight => "8",
            Value::Nine => "9",
            Value::Ten => "10",
            Value::Jack => "jack",
            Value::Queen => "queen",
            Value::King => "king",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Value {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Value::ALL
            .into_iter()
            .find(|value| value.as_str() == lowered)
            .or(match lowered.as_str() {
                "ace" | "a" => Some(Value::Ace),
                "j" => Some(Value::Jack),
                "q" => Some(Value::Queen),
                "k" => Some(Value::King),
                _ => None,
            })
            .ok_or(())
    }
}

/// 一张牌。创建后不可变，`id` 区分两副牌中的同点同花色。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub value: Value,
    pub id: CardId,
}

impl Card {
    pub fn new(suit: Suit, value: Value, copy: u8) -> Self {
        Self {
            suit,
            value,
            id: format!("{suit}_{value}_{copy}"),
        }
    }

    pub fn is_wild(&self) -> bool {
        self.value == Value::Ace
    }

    pub fn is_red_jack(&self) -> bool {
        self.value == Value::Jack && self.suit.is_red()
    }

    pub fn is_black_jack(&self) -> bool {
        self.value == Value::Jack && !self.suit.is_red()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.suit, self.value)
    }
}

/// 生成两副完整扑克（共 104 张）。顺序固定，需要洗牌请使用 `shuffle_deck`。
pub fn create_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(TOTAL_CARDS);
    for copy in 0..DECK_COPIES {
        for suit in Suit::ALL {
            for value in Value::ALL {
                deck.push(Card::new(suit, value, copy));
            }
        }
    }
    deck
}

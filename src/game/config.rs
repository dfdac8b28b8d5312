//! 对局设置：模式、起手张数以及 GURA 期间摸牌的处理方式。

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::effects::GameMode;

pub const DEFAULT_HAND_SIZE: usize = 7;

/// GURA 轮中摸到的牌仍不匹配时，回合如何处理。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GuraDrawPolicy {
    /// 回合留在摸牌者手里，需要自行 pass。
    #[default]
    KeepTurn,
    /// 摸牌后仍无匹配牌时自动轮到下一家。
    AutoAdvance,
}

impl FromStr for GuraDrawPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "keep_turn" | "manual" => Ok(GuraDrawPolicy::KeepTurn),
            "auto_advance" | "auto" => Ok(GuraDrawPolicy::AutoAdvance),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    #[serde(default)]
    pub mode: GameMode,
    #[serde(default = "default_hand_size")]
    pub hand_size: usize,
    #[serde(default)]
    pub gura_draw_policy: GuraDrawPolicy,
}

fn default_hand_size() -> usize {
    DEFAULT_HAND_SIZE
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            hand_size: default_hand_size(),
            gura_draw_policy: GuraDrawPolicy::default(),
        }
    }
}

impl GameSettings {
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_gura_draw_policy(mut self, policy: GuraDrawPolicy) -> Self {
        self.gura_draw_policy = policy;
        self
    }

    /// 解析大厅下发的 JSON 设置，缺省字段取默认值。
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

//! 共享状态通道：所有客户端读写同一份 JSON 快照。
//!
//! 没有锁，也没有服务器裁决，最后一次写入生效。引擎只负责每份发布的快照自身一致。

use std::collections::HashMap;

use thiserror::Error;

use crate::game::{GameIntent, GameSettings, GameState, Roster, RuleEngine, RuleResolution};

/// 通道中保存对局状态的键。
pub const GAME_STATE_KEY: &str = "gameState";

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to encode or decode the shared game state: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("no game state has been published yet")]
    NoGameState,
}

/// 共享状态通道的端口。`reliable` 表示有序、去重地投递给所有订阅者。
pub trait StateChannel {
    fn read(&self) -> Result<Option<GameState>, ChannelError>;
    fn write(&mut self, state: &GameState, reliable: bool) -> Result<(), ChannelError>;
}

/// 进程内的通道实现，按键保存序列化后的 JSON。测试和单机调试使用。
#[derive(Debug, Default)]
pub struct InMemoryChannel {
    slots: HashMap<String, String>,
    writes: usize,
}

impl InMemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }

    /// 直接写入原始 JSON，模拟其他客户端的发布。
    pub fn put_raw(&mut self, key: impl Into<String>, json: impl Into<String>) {
        self.slots.insert(key.into(), json.into());
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl StateChannel for InMemoryChannel {
    fn read(&self) -> Result<Option<GameState>, ChannelError> {
        self.slots
            .get(GAME_STATE_KEY)
            .map(|json| serde_json::from_str(json))
            .transpose()
            .map_err(ChannelError::from)
    }

    fn write(&mut self, state: &GameState, reliable: bool) -> Result<(), ChannelError> {
        let json = serde_json::to_string(state)?;
        tracing::trace!(reliable, bytes = json.len(), "publishing game state");
        self.slots.insert(GAME_STATE_KEY.to_owned(), json);
        self.writes += 1;
        Ok(())
    }
}

/// 一个客户端的会话：读取最新快照、应用本地玩家的操作、发布结果。
pub struct GameSession<C: StateChannel> {
    channel: C,
    roster: Roster,
    engine: RuleEngine,
}

impl<C: StateChannel> GameSession<C> {
    pub fn new(channel: C, roster: Roster) -> Self {
        Self::with_engine(channel, roster, RuleEngine::new())
    }

    pub fn with_engine(channel: C, roster: Roster, engine: RuleEngine) -> Self {
        Self {
            channel,
            roster,
            engine,
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// 更新名单（玩家加入或离开）。进行中的对局会拒绝人数不符的操作，下一局按新名单发牌。
    pub fn set_roster(&mut self, roster: Roster) {
        self.roster = roster;
    }

    pub fn state(&self) -> Result<Option<GameState>, ChannelError> {
        self.channel.read()
    }

    /// 按名单人数开一局并发布。
    pub fn start(&mut self, settings: GameSettings) -> Result<GameState, ChannelError> {
        let state = self
            .engine
            .initialize_game_state(self.roster.len(), settings);
        self.channel.write(&state, true)?;
        Ok(state)
    }

    /// 对最新快照应用一个操作。状态有变化（包括提示日志）才发布。
    pub fn submit(
        &mut self,
        actor: &str,
        intent: GameIntent,
    ) -> Result<RuleResolution, ChannelError> {
        let Some(state) = self.channel.read()? else {
            if intent == GameIntent::StartNewGame {
                let state = self.start(GameSettings::default())?;
                return Ok(RuleResolution::new(state, None));
            }
            return Err(ChannelError::NoGameState);
        };

        let resolution = self.engine.apply(&state, actor, &self.roster, intent);
        if resolution.state != state {
            self.channel.write(&resolution.state, true)?;
        }
        Ok(resolution)
    }
}

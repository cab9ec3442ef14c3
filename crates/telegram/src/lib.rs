// Telegram: 平台事件的类型定义 + 对Bot API的出站调用客户端

mod client;
mod types;

pub use client::{BotApiTrait, DynBotApi, TelegramBot};
pub use types::*;

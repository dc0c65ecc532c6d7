//! Decision provider implementations for different seat behaviors.

mod channel;
mod scripted;
mod tactical;

pub use channel::ChannelProvider;
pub use scripted::ScriptedProvider;
pub use tactical::TacticalAi;

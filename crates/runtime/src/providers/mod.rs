//! Built-in action providers.

mod ai;
mod channel;
mod scripted;

pub use ai::AiActionProvider;
pub use channel::{ActionSender, ChannelActionProvider};
pub use scripted::ScriptedActionProvider;

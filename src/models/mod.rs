//! Data models for the community site backend.
//!
//! Wire names are camelCase for seamless interoperability with the frontend.

mod chat;
mod news;
mod scoreboard;
mod suggestion;

pub use chat::*;
pub use news::*;
pub use scoreboard::*;
pub use suggestion::*;

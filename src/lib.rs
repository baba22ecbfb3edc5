//! River Lobby: a terminal casino-style entertainment lobby. One shared
//! session owns the wallet, the progressive jackpot, and the active view;
//! a "pit boss" chat assistant rides along, fed by an external response
//! service and by probabilistic commentary on in-game events.

pub mod chat;
pub mod client;
pub mod commentary;
pub mod games;
pub mod pitboss;
pub mod session;
pub mod test_helpers;
pub mod transcript;
pub mod ui;

pub mod creative;
pub mod fish;
pub mod slots;

pub use creative::CreativeStudio;
pub use fish::FishArena;
pub use slots::SlotMachine;

/// Delta intents a mini-game hands back to the orchestrator. Games never
/// touch the session directly; the orchestrator applies these through the
/// wallet/jackpot accessors and the commentary trigger.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEffect {
    /// Chip delta against the shared wallet.
    Credit(i64),
    /// Delta against the shared progressive jackpot.
    Jackpot(i64),
    /// A notable in-game event, candidate for pit boss commentary.
    Notable(String),
    /// Back to the lobby.
    Leave,
}

//! Reasons a player action was refused
//!
//! Refused actions never change state. The session reports each refusal as a
//! notice so the UI can show it; callers are free to ignore the `Result`.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("not enough gold")]
    InsufficientGold,
    #[error("not enough jade")]
    InsufficientJade,
    #[error("item already active")]
    AlreadyActive,
    #[error("already owned")]
    AlreadyOwned,
    #[error("not owned")]
    NotOwned,
    #[error("no charges left")]
    NoCharges,
    #[error("not playing")]
    NotPlaying,
    #[error("not available from this screen")]
    InvalidScreen,
    #[error("no revives left this run")]
    ReviveLimitReached,
    #[error("revive offer has expired")]
    ReviveWindowClosed,
    #[error("quest not complete")]
    QuestIncomplete,
    #[error("quest reward already claimed")]
    QuestAlreadyClaimed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rejection_has_a_message() {
        let all = [
            Rejection::InsufficientGold,
            Rejection::InsufficientJade,
            Rejection::AlreadyActive,
            Rejection::AlreadyOwned,
            Rejection::NotOwned,
            Rejection::NoCharges,
            Rejection::NotPlaying,
            Rejection::InvalidScreen,
            Rejection::ReviveLimitReached,
            Rejection::ReviveWindowClosed,
            Rejection::QuestIncomplete,
            Rejection::QuestAlreadyClaimed,
        ];
        for rejection in all {
            // Exhaustive: a new variant must be added to the list above
            match rejection {
                Rejection::InsufficientGold
                | Rejection::InsufficientJade
                | Rejection::AlreadyActive
                | Rejection::AlreadyOwned
                | Rejection::NotOwned
                | Rejection::NoCharges
                | Rejection::NotPlaying
                | Rejection::InvalidScreen
                | Rejection::ReviveLimitReached
                | Rejection::ReviveWindowClosed
                | Rejection::QuestIncomplete
                | Rejection::QuestAlreadyClaimed => {}
            }
            assert!(!rejection.to_string().is_empty());
        }
    }
}

use serde::Serialize;
use crate::domain::models::participant::Participant;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MatchPair {
    pub giver: Participant,
    pub recipient: Participant,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MatchAssignment {
    pub event_id: String,
    pub pairs: Vec<MatchPair>,
}

impl MatchAssignment {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn recipient_of(&self, giver_user_id: &str) -> Option<&Participant> {
        self.pairs
            .iter()
            .find(|p| p.giver.user_id == giver_user_id)
            .map(|p| &p.recipient)
    }
}

/// Result of the guarded OPEN -> MATCHED write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    Committed,
    /// The event was no longer OPEN; someone else matched it.
    StatusConflict,
    /// The participant set changed between load and write.
    StaleParticipants,
}

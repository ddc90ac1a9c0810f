use std::fmt;
use std::sync::Arc;
use rand::{Rng, seq::SliceRandom};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::domain::models::{
    event::Event,
    participant::Participant,
    matching::{MatchAssignment, MatchPair, TransitionResult},
};
use crate::domain::ports::{EventRepository, ParticipantRepository};
use crate::error::AppError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("cannot derange {participants} participant(s), at least 2 are required")]
    DerangementInfeasible { participants: usize },
    #[error("participant set kept changing, gave up after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ineligibility {
    CountMismatch { joined: usize, target: usize },
    TooFewParticipants { joined: usize },
    EmptyWishlists { missing: usize },
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::CountMismatch { joined, target } => write!(f, "{}/{} participants joined", joined, target),
            Ineligibility::TooFewParticipants { joined } => write!(f, "{} participant(s) cannot be matched", joined),
            Ineligibility::EmptyWishlists { missing } => write!(f, "{} participant(s) have an empty wishlist", missing),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched(MatchAssignment),
    NotEligible(Ineligibility),
    AlreadyMatched,
    LostRace,
}

impl MatchOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            MatchOutcome::Matched(_) => "MATCHED",
            MatchOutcome::NotEligible(_) => "NOT_ELIGIBLE",
            MatchOutcome::AlreadyMatched => "ALREADY_MATCHED",
            MatchOutcome::LostRace => "LOST_RACE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchPlan {
    AlreadyMatched,
    NotEligible(Ineligibility),
    Ready(MatchAssignment),
}

pub fn check_eligibility(event: &Event, participants: &[Participant]) -> Result<(), Ineligibility> {
    let joined = participants.len();
    let target = usize::try_from(event.target_count).unwrap_or(0);

    if joined != target {
        return Err(Ineligibility::CountMismatch { joined, target });
    }
    if joined < 2 {
        return Err(Ineligibility::TooFewParticipants { joined });
    }

    let missing = participants.iter().filter(|p| !p.has_wishlist()).count();
    if missing > 0 {
        return Err(Ineligibility::EmptyWishlists { missing });
    }
    Ok(())
}

/// Random derangement of `0..n` as a single cycle: shuffle the order, then
/// every element gives to the one after it. `targets[i]` is the recipient of `i`.
pub fn derangement<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Vec<usize>, MatchError> {
    if n < 2 {
        return Err(MatchError::DerangementInfeasible { participants: n });
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut targets = vec![0; n];
    for (pos, &giver) in order.iter().enumerate() {
        targets[giver] = order[(pos + 1) % n];
    }
    Ok(targets)
}

pub fn plan_match<R: Rng + ?Sized>(
    event: &Event,
    participants: &[Participant],
    rng: &mut R,
) -> Result<MatchPlan, MatchError> {
    if !event.is_open() {
        return Ok(MatchPlan::AlreadyMatched);
    }
    if let Err(reason) = check_eligibility(event, participants) {
        return Ok(MatchPlan::NotEligible(reason));
    }

    let targets = derangement(participants.len(), rng)?;

    let pairs = participants
        .iter()
        .zip(targets)
        .map(|(giver, target)| {
            let recipient = participants[target].clone();
            let mut giver = giver.clone();
            giver.santa_for_user_id = Some(recipient.user_id.clone());
            MatchPair { giver, recipient }
        })
        .collect();

    Ok(MatchPlan::Ready(MatchAssignment { event_id: event.id.clone(), pairs }))
}

enum AttemptStep {
    Done(MatchOutcome),
    Retry,
}

pub struct MatchingService {
    event_repo: Arc<dyn EventRepository>,
    participant_repo: Arc<dyn ParticipantRepository>,
    max_attempts: u32,
}

impl MatchingService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        participant_repo: Arc<dyn ParticipantRepository>,
        max_attempts: u32,
    ) -> Self {
        Self { event_repo, participant_repo, max_attempts: max_attempts.max(1) }
    }

    /// Matches the event if it has just become eligible. Safe to call on
    /// every join or wishlist update: ineligible and already matched events
    /// are left untouched.
    pub async fn evaluate_and_maybe_match(&self, event_id: &str) -> Result<MatchOutcome, AppError> {
        for attempt in 1..=self.max_attempts {
            let span = info_span!("match_attempt", event_id = %event_id, attempt);
            match self.attempt(event_id).instrument(span).await? {
                AttemptStep::Done(outcome) => return Ok(outcome),
                AttemptStep::Retry => {
                    warn!("Participant set of event {} changed during matching (attempt {}), retrying", event_id, attempt);
                }
            }
        }
        Err(MatchError::RetriesExhausted { attempts: self.max_attempts }.into())
    }

    async fn attempt(&self, event_id: &str) -> Result<AttemptStep, AppError> {
        let event = self.event_repo.find_by_id(event_id).await?
            .ok_or(AppError::NotFound(format!("Event {} not found", event_id)))?;

        if !event.is_open() {
            debug!("Event already matched, nothing to do");
            return Ok(AttemptStep::Done(MatchOutcome::AlreadyMatched));
        }

        let participants = self.participant_repo.load_participants(event_id).await?;

        let plan = {
            let mut rng = rand::thread_rng();
            plan_match(&event, &participants, &mut rng)?
        };

        let assignment = match plan {
            MatchPlan::AlreadyMatched => return Ok(AttemptStep::Done(MatchOutcome::AlreadyMatched)),
            MatchPlan::NotEligible(reason) => {
                debug!("Event not eligible for matching: {}", reason);
                return Ok(AttemptStep::Done(MatchOutcome::NotEligible(reason)));
            }
            MatchPlan::Ready(assignment) => assignment,
        };

        match self.participant_repo.transition_and_assign(event_id, &assignment).await? {
            TransitionResult::Committed => {
                info!("Event {} matched with {} participants", event_id, assignment.len());
                Ok(AttemptStep::Done(MatchOutcome::Matched(assignment)))
            }
            TransitionResult::StatusConflict => {
                info!("Event {} was matched concurrently, discarding assignment", event_id);
                Ok(AttemptStep::Done(MatchOutcome::LostRace))
            }
            TransitionResult::StaleParticipants => Ok(AttemptStep::Retry),
        }
    }
}

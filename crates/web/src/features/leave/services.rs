use storage::{
    dto::leave::LeaveCompetitionResponse,
    models::SubscriptionTier,
    repository::competition::CompetitionRepository,
    repository::participant::ParticipantRepository,
    repository::profile::ProfileRepository,
};
use uuid::Uuid;

use crate::collaborators::notify::SocialEvent;
use crate::collaborators::payment::PaymentError;
use crate::error::{WebError, WebResult};
use crate::state::AppState;

/// Facts gathered server-side before any decision is taken. The tier comes
/// from the profile row, never from the client.
#[derive(Debug, Clone, Copy)]
pub struct LeaveFacts {
    pub is_participant: bool,
    pub creator_id: Uuid,
    pub tier: SubscriptionTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveRejection {
    NotParticipant,
    IsCreator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveDecision {
    Reject(LeaveRejection),
    /// Free tier, no receipt: tell the caller what the exit costs. Nothing
    /// is mutated, so the same request can be repeated any number of times.
    PaymentRequired,
    /// Free tier with a claimed receipt: verify it, then remove.
    VerifyThenRemove,
    /// Paid tier: remove straight away.
    Remove,
}

/// The gate's branching, separated from its effects. Participant existence
/// is checked before the creator rule, and the creator rule before anything
/// payment-related: a creator with a valid receipt is still refused.
pub fn decide(facts: &LeaveFacts, requester: Uuid, has_receipt: bool) -> LeaveDecision {
    if !facts.is_participant {
        return LeaveDecision::Reject(LeaveRejection::NotParticipant);
    }
    if requester == facts.creator_id {
        return LeaveDecision::Reject(LeaveRejection::IsCreator);
    }
    match facts.tier {
        SubscriptionTier::Premium => LeaveDecision::Remove,
        SubscriptionTier::Free if has_receipt => LeaveDecision::VerifyThenRemove,
        SubscriptionTier::Free => LeaveDecision::PaymentRequired,
    }
}

/// Run the leave gate for one request.
pub async fn leave_competition(
    state: &AppState,
    competition_id: Uuid,
    requester: Uuid,
    transaction_id: Option<&str>,
) -> WebResult<LeaveCompetitionResponse> {
    let pool = state.db.pool();

    let competition = CompetitionRepository::new(pool)
        .find_by_id(competition_id)
        .await?;
    let participant = ParticipantRepository::new(pool)
        .find(competition_id, requester)
        .await?;
    let profile = ProfileRepository::new(pool).ensure(requester).await?;

    let facts = LeaveFacts {
        is_participant: participant.is_some(),
        creator_id: competition.creator_id,
        tier: profile.subscription_tier,
    };

    match decide(&facts, requester, transaction_id.is_some()) {
        LeaveDecision::Reject(LeaveRejection::NotParticipant) => Err(WebError::NotFound),
        LeaveDecision::Reject(LeaveRejection::IsCreator) => Err(WebError::Forbidden(
            "The creator cannot leave; delete the competition instead".to_string(),
        )),
        LeaveDecision::PaymentRequired => Ok(payment_required_response(
            state,
            "Payment is required to leave this competition",
        )),
        LeaveDecision::VerifyThenRemove => {
            let transaction_id = transaction_id.unwrap_or_default();
            match state
                .payments
                .verify(requester, transaction_id, &state.leave_terms.product_id)
                .await
            {
                Ok(()) => remove_participant(state, &competition, requester).await,
                Err(PaymentError::Rejected(reason)) => {
                    tracing::warn!(
                        %competition_id,
                        user_id = %requester,
                        reason,
                        "leave payment receipt rejected"
                    );
                    Ok(payment_required_response(
                        state,
                        "Payment verification failed",
                    ))
                }
                Err(PaymentError::Provider(e)) => {
                    tracing::warn!(
                        %competition_id,
                        user_id = %requester,
                        error = %e,
                        "payment provider unavailable during leave verification"
                    );
                    Ok(payment_required_response(
                        state,
                        "Payment verification failed, please try again",
                    ))
                }
            }
        }
        LeaveDecision::Remove => remove_participant(state, &competition, requester).await,
    }
}

/// The one terminal success transition: a single atomic delete. A failure
/// here after a verified payment means we took money and rendered nothing,
/// so it is logged as a server fault and surfaced as a hard error.
async fn remove_participant(
    state: &AppState,
    competition: &storage::models::Competition,
    user_id: Uuid,
) -> WebResult<LeaveCompetitionResponse> {
    let competition_id = competition.competition_id;

    if let Err(e) = ParticipantRepository::new(state.db.pool())
        .delete(competition_id, user_id)
        .await
    {
        tracing::error!(
            %competition_id,
            %user_id,
            error = %e,
            "participant removal failed after the leave gate approved it"
        );
        return Err(WebError::InternalServerError(
            "Failed to remove participant".to_string(),
        ));
    }

    state
        .notifier
        .notify(
            competition.creator_id,
            &SocialEvent::ParticipantLeft {
                competition_id,
                user_id,
            },
        )
        .await;

    Ok(LeaveCompetitionResponse::removed())
}

fn payment_required_response(state: &AppState, error: &str) -> LeaveCompetitionResponse {
    LeaveCompetitionResponse::payment_required(
        error,
        state.leave_terms.amount,
        state.leave_terms.currency.clone(),
        state.leave_terms.product_id.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(is_participant: bool, creator_id: Uuid, tier: SubscriptionTier) -> LeaveFacts {
        LeaveFacts {
            is_participant,
            creator_id,
            tier,
        }
    }

    #[test]
    fn test_non_participant_is_rejected_first() {
        let creator = Uuid::new_v4();
        // even the creator with a receipt gets the not-a-participant answer
        // when no membership row exists
        let decision = decide(&facts(false, creator, SubscriptionTier::Premium), creator, true);
        assert_eq!(decision, LeaveDecision::Reject(LeaveRejection::NotParticipant));
    }

    #[test]
    fn test_creator_cannot_leave_regardless_of_tier_or_receipt() {
        let creator = Uuid::new_v4();
        for tier in [SubscriptionTier::Free, SubscriptionTier::Premium] {
            for has_receipt in [false, true] {
                let decision = decide(&facts(true, creator, tier), creator, has_receipt);
                assert_eq!(
                    decision,
                    LeaveDecision::Reject(LeaveRejection::IsCreator),
                    "tier {tier:?}, receipt {has_receipt}"
                );
            }
        }
    }

    #[test]
    fn test_free_tier_without_receipt_requires_payment() {
        let decision = decide(
            &facts(true, Uuid::new_v4(), SubscriptionTier::Free),
            Uuid::new_v4(),
            false,
        );
        assert_eq!(decision, LeaveDecision::PaymentRequired);
    }

    #[test]
    fn test_payment_required_is_stable_across_retries() {
        let facts = facts(true, Uuid::new_v4(), SubscriptionTier::Free);
        let requester = Uuid::new_v4();
        // the decision is a pure function of unchanged facts, so resubmitting
        // without a receipt can never drift toward a removal
        for _ in 0..3 {
            assert_eq!(decide(&facts, requester, false), LeaveDecision::PaymentRequired);
        }
    }

    #[test]
    fn test_free_tier_with_receipt_goes_through_verification() {
        let decision = decide(
            &facts(true, Uuid::new_v4(), SubscriptionTier::Free),
            Uuid::new_v4(),
            true,
        );
        assert_eq!(decision, LeaveDecision::VerifyThenRemove);
    }

    #[test]
    fn test_premium_tier_skips_payment_entirely() {
        let facts = facts(true, Uuid::new_v4(), SubscriptionTier::Premium);
        let requester = Uuid::new_v4();
        assert_eq!(decide(&facts, requester, false), LeaveDecision::Remove);
        assert_eq!(decide(&facts, requester, true), LeaveDecision::Remove);
    }
}

//! Dialogue runtime: runs one chat turn against the session store

use super::traits::{SessionStore, TokenSource};
use crate::state_machine::{
    transition, Effect, Event, FlowSettings, Reply, Session, TransitionError, TransitionResult,
    TurnContext,
};
use chrono::Utc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Session store failure: {0}")]
    Store(String),
}

/// What the transport sends back for one turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session_id: String,
    pub reply: Reply,
}

/// Generic dialogue runtime that can work with any store and token source
pub struct DialogueRuntime<S, T>
where
    S: SessionStore,
    T: TokenSource,
{
    flow: FlowSettings,
    store: S,
    tokens: T,
}

impl<S, T> DialogueRuntime<S, T>
where
    S: SessionStore,
    T: TokenSource,
{
    pub fn new(flow: FlowSettings, store: S, tokens: T) -> Self {
        Self {
            flow,
            store,
            tokens,
        }
    }

    /// Process one inbound event to completion.
    ///
    /// The session's lock is held from lookup to write-back, so concurrent
    /// turns on the same session run one after the other. A fault leaves the
    /// stored session as it was before the turn.
    pub async fn handle_turn(
        &self,
        session_id: Option<&str>,
        event: Event,
    ) -> Result<TurnOutcome, RuntimeError> {
        let lease = self
            .store
            .checkout(session_id)
            .await
            .map_err(RuntimeError::Store)?;
        let mut session = lease.session.lock().await;
        tracing::debug!(
            session_id = %lease.session_id,
            created = lease.created,
            stage = %session.stage,
            "Turn started"
        );

        let ctx = TurnContext {
            flow: &self.flow,
            today: Utc::now().date_naive(),
            token: self.tokens.token(),
        };
        let from = session.stage;

        let TransitionResult {
            session: next,
            reply,
            effects,
        } = transition(&session, &ctx, event).inspect_err(|e| {
            tracing::error!(
                session_id = %lease.session_id,
                stage = %from,
                error = %e,
                "Transition failed"
            );
        })?;

        let mut next = Some(next);
        for effect in effects {
            match effect {
                Effect::PersistSession => {
                    if let Some(next) = next.take() {
                        *session = next;
                    }
                }
                other => self.execute_effect(&lease.session_id, &session, other),
            }
        }

        if session.stage != from {
            tracing::info!(
                session_id = %lease.session_id,
                from = %from,
                to = %session.stage,
                "Stage changed"
            );
        }

        Ok(TurnOutcome {
            session_id: lease.session_id,
            reply,
        })
    }

    /// Side effects besides persistence are notifications; in this service
    /// they end up in the log
    fn execute_effect(&self, session_id: &str, session: &Session, effect: Effect) {
        match effect {
            Effect::PersistSession => {}
            Effect::LeadCaptured {
                company_name,
                contact_email,
            } => {
                tracing::info!(
                    session_id,
                    company = %company_name,
                    email = %contact_email,
                    "Business lead captured"
                );
            }
            Effect::OrderCompleted { receipt } => {
                tracing::info!(
                    session_id,
                    amount = receipt.amount,
                    occasion = %receipt.occasion,
                    template = %receipt.template_id,
                    link = %receipt.link,
                    "Gift card order completed"
                );
            }
            Effect::BusinessOrderCompleted { receipt } => {
                tracing::info!(
                    session_id,
                    order_reference = %receipt.order_reference,
                    company = %receipt.company_name,
                    net = receipt.quotation.net,
                    cards = receipt.cards,
                    payment = receipt.payment_method.keyword(),
                    "Business order completed"
                );
            }
            Effect::FeedbackRecorded {
                order_reference,
                rating,
            } => {
                tracing::info!(
                    session_id,
                    order_reference = order_reference.as_deref().unwrap_or("-"),
                    rating = ?rating,
                    stage = %session.stage,
                    "Feedback recorded"
                );
            }
        }
    }

    pub async fn session(&self, session_id: &str) -> Option<Session> {
        self.store.snapshot(session_id).await
    }

    pub async fn live_sessions(&self) -> usize {
        self.store.len().await
    }
}

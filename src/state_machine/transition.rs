//! Pure state transition function
//!
//! Given a session, the turn context and one event, computes the next
//! session, the reply and the effects the runtime has to apply. No I/O:
//! randomness and the current date arrive through [`TurnContext`].

use super::event::{Event, FormSubmission};
use super::prompts::prompt;
use super::reply::Reply;
use super::state::{FlowSettings, FlowVariant, Session, Stage};
use super::{business, personal, Effect};
use crate::parse::{is_greeting, normalize_keyword};
use chrono::NaiveDate;
use thiserror::Error;

/// Everything a transition may consult besides the session itself
#[derive(Debug, Clone)]
pub struct TurnContext<'a> {
    pub flow: &'a FlowSettings,
    pub today: NaiveDate,
    /// Random token for links and reference codes minted during this turn
    pub token: String,
}

impl TurnContext<'_> {
    /// First eight characters of the token, for human-facing codes
    pub fn short_token(&self) -> String {
        self.token.chars().take(8).collect()
    }
}

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub session: Session,
    pub reply: Reply,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session, reply: Reply) -> Self {
        Self {
            session,
            reply,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn persists(&self) -> bool {
        self.effects.contains(&Effect::PersistSession)
    }
}

/// Internal faults. Bad user input is never an error; it re-prompts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Session at {stage} is missing draft field `{field}`")]
    MissingField { field: &'static str, stage: Stage },
}

/// Unwrap a draft field the current stage depends on
pub(super) fn required<T>(
    value: Option<T>,
    field: &'static str,
    stage: Stage,
) -> Result<T, TransitionError> {
    value.ok_or(TransitionError::MissingField { field, stage })
}

/// Move to `stage` and prompt for it
pub(super) fn advance(
    mut session: Session,
    stage: Stage,
) -> Result<TransitionResult, TransitionError> {
    session.stage = stage;
    let reply = prompt(&session)?;
    Ok(TransitionResult::new(session, reply).with_effect(Effect::PersistSession))
}

/// Like [`advance`], with a sentence in front of the prompt
pub(super) fn advance_with(
    session: Session,
    stage: Stage,
    lead: &str,
) -> Result<TransitionResult, TransitionError> {
    let mut result = advance(session, stage)?;
    result.reply = result.reply.prefixed(lead);
    Ok(result)
}

/// Invalid input: same session, explanation, then the same prompt again
pub(super) fn reprompt(session: &Session, why: &str) -> Result<TransitionResult, TransitionError> {
    tracing::debug!(stage = %session.stage, reason = why, "Rejected input");
    let reply = prompt(session)?.prefixed(why);
    Ok(TransitionResult::new(session.clone(), reply))
}

/// Discard the draft and go back to idle
pub(super) fn cancel(session: &Session, text: &str) -> TransitionResult {
    TransitionResult::new(session.reset_to(Stage::Idle), Reply::text(text))
        .with_effect(Effect::PersistSession)
}

/// Pure transition function
pub fn transition(
    session: &Session,
    ctx: &TurnContext<'_>,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    if let Event::UserMessage { text } = &event {
        // Greeting interrupt: wins over whatever the stage expects
        if is_greeting(text) {
            return welcome(session, ctx);
        }
        if let Some(target) = back_target(session.stage, text, ctx.flow.variant) {
            return advance_with(session.clone(), target, "Sure, let's go back.");
        }
        // `back` and `edit` are never taken as answers, even where there is
        // nowhere to go
        if is_navigation(text) && !matches!(session.stage, Stage::Idle | Stage::Completed) {
            return reprompt(session, "We can't go back from this step.");
        }
    }

    dispatch(session, ctx, event)
}

fn welcome(session: &Session, ctx: &TurnContext<'_>) -> Result<TransitionResult, TransitionError> {
    let fresh = session.reset_to(ctx.flow.welcome_stage());
    let reply = prompt(&fresh)?.prefixed("Hi there! Welcome to GiftFlow.");
    Ok(TransitionResult::new(fresh, reply).with_effect(Effect::PersistSession))
}

fn is_navigation(text: &str) -> bool {
    matches!(normalize_keyword(text).as_str(), "back" | "edit")
}

fn back_target(stage: Stage, text: &str, variant: FlowVariant) -> Option<Stage> {
    match (normalize_keyword(text).as_str(), stage) {
        ("edit", Stage::AwaitingQuotation) => Some(Stage::AwaitingOrderLines),
        ("edit" | "back", _) => stage.previous(variant),
        _ => None,
    }
}

fn dispatch(
    session: &Session,
    ctx: &TurnContext<'_>,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    use Event::{FormSubmit, UserMessage};

    match (session.stage, event) {
        // Anything other than a greeting from idle still opens the dialogue
        (Stage::Idle, _) => welcome(session, ctx),
        (Stage::Completed, _) => Ok(TransitionResult::new(
            session.reset_to(Stage::Idle),
            Reply::text("Ready for a new order! Say hi whenever you'd like to start."),
        )
        .with_effect(Effect::PersistSession)),

        (Stage::AwaitingBuyerType, UserMessage { text }) => {
            personal::buyer_type(session, &text)
        }
        (Stage::AwaitingOccasion, UserMessage { text }) => personal::occasion(session, &text),
        (Stage::AwaitingCustomOccasion, UserMessage { text }) => {
            personal::custom_occasion(session, &text)
        }
        (Stage::AwaitingTemplate, UserMessage { text }) => personal::template(session, &text),
        (Stage::AwaitingAmount, UserMessage { text }) => personal::amount(session, &text),
        (Stage::AwaitingRecipient, UserMessage { text }) => {
            personal::recipient(session, &text)
        }
        (Stage::AwaitingMessage, UserMessage { text }) => personal::message(session, &text),
        (Stage::AwaitingConfirmation, UserMessage { text }) => {
            personal::confirmation(session, &text, ctx)
        }

        (Stage::AwaitingCompanyName, UserMessage { text }) => {
            business::company_name(session, &text)
        }
        (
            Stage::AwaitingCompanyName,
            FormSubmit(FormSubmission::LeadDetails {
                company_name,
                email,
                phone,
            }),
        ) => business::lead_details(session, &company_name, &email, &phone),
        (Stage::AwaitingContactEmail, UserMessage { text }) => {
            business::contact_email(session, &text)
        }
        (Stage::AwaitingContactPhone, UserMessage { text }) => {
            business::contact_phone(session, &text)
        }
        (Stage::AwaitingTaxId, UserMessage { text }) => business::tax_id(session, &text),
        (Stage::AwaitingOrderLines, UserMessage { text }) => {
            business::order_line(session, &text)
        }
        (Stage::AwaitingOrderLines, FormSubmit(FormSubmission::OrderLines { lines })) => {
            business::replace_order_lines(session, &lines)
        }
        (Stage::AwaitingDeliveryDate, UserMessage { text }) => {
            business::delivery_date(session, &text, ctx)
        }
        (Stage::AwaitingDeliveryAddress, UserMessage { text }) => {
            business::delivery_address(session, &text, ctx)
        }
        (Stage::AwaitingQuotation, UserMessage { text }) => business::quotation(session, &text, ctx),
        (Stage::AwaitingPurchaseOrder, UserMessage { text }) => {
            business::purchase_order(session, &text, None)
        }
        (
            Stage::AwaitingPurchaseOrder,
            FormSubmit(FormSubmission::PurchaseOrder {
                po_number,
                file_name,
            }),
        ) => business::purchase_order(session, &po_number, file_name.as_deref()),
        (Stage::AwaitingPayment, UserMessage { text }) => business::payment(session, &text, ctx),
        (Stage::AwaitingFeedback, UserMessage { text }) => business::feedback(session, &text),

        (stage, FormSubmit(form)) => {
            tracing::debug!(%stage, form = form.kind(), "Form not expected at this stage");
            reprompt(session, "That form isn't needed right now.")
        }
    }
}

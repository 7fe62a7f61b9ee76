//! Personal purchase path: occasion, design, amount, recipient, message,
//! confirmation. Also the buyer-type fork that leads into it.

use super::prompts::MAX_GIFT_AMOUNT;
use super::reply::{Reply, UiHint};
use super::state::{BuyerType, Receipt, Session, Stage};
use super::transition::{
    advance, cancel, reprompt, required, TransitionError, TransitionResult, TurnContext,
};
use super::Effect;
use crate::catalog::{find_template, Occasion};
use crate::format::{format_inr, gift_link};
use crate::parse::{
    normalize_keyword, parse_amount, parse_custom_occasion, parse_message, parse_occasion,
    parse_recipient, strip_prefix_ignore_case, OccasionInput,
};

type Outcome = Result<TransitionResult, TransitionError>;

pub(super) fn buyer_type(session: &Session, text: &str) -> Outcome {
    let (buyer, next) = match normalize_keyword(text).as_str() {
        "personal" | "individual" | "myself" | "for myself" | "1" => {
            (BuyerType::Personal, Stage::AwaitingOccasion)
        }
        "business" | "corporate" | "bulk" | "for my business" | "2" => {
            (BuyerType::Business, Stage::AwaitingCompanyName)
        }
        _ => return reprompt(session, "Please choose personal or business."),
    };

    let mut next_session = session.clone();
    next_session.draft.buyer = Some(buyer);
    advance(next_session, next)
}

pub(super) fn occasion(session: &Session, text: &str) -> Outcome {
    match parse_occasion(text) {
        OccasionInput::Known(occasion) => with_occasion(session, occasion),
        OccasionInput::Custom(label) => with_occasion(session, Occasion::Custom(label)),
        OccasionInput::Other => advance(session.clone(), Stage::AwaitingCustomOccasion),
        OccasionInput::Invalid => reprompt(
            session,
            "Please pick one of the occasions or describe your own in up to 60 characters.",
        ),
    }
}

pub(super) fn custom_occasion(session: &Session, text: &str) -> Outcome {
    match parse_custom_occasion(text) {
        Some(label) => with_occasion(session, Occasion::Custom(label)),
        None => reprompt(session, "Please describe the occasion in 1 to 60 characters."),
    }
}

fn with_occasion(session: &Session, occasion: Occasion) -> Outcome {
    let mut next = session.clone();
    next.draft.personal.occasion = Some(occasion);
    advance(next, Stage::AwaitingTemplate)
}

pub(super) fn template(session: &Session, text: &str) -> Outcome {
    let trimmed = text.trim();
    let key = strip_prefix_ignore_case(trimmed, "template:")
        .unwrap_or(trimmed)
        .trim();

    let Some(template) = find_template(key) else {
        return reprompt(session, "Please pick one of the designs shown.");
    };

    let mut next = session.clone();
    next.draft.personal.template_id = Some(template.id.to_string());
    advance(next, Stage::AwaitingAmount)
}

pub(super) fn amount(session: &Session, text: &str) -> Outcome {
    match parse_amount(text) {
        Some(amount) if amount <= MAX_GIFT_AMOUNT => {
            let mut next = session.clone();
            next.draft.personal.amount = Some(amount);
            advance(next, Stage::AwaitingRecipient)
        }
        Some(_) => reprompt(
            session,
            &format!(
                "The most a single gift card can hold is {}.",
                format_inr(MAX_GIFT_AMOUNT)
            ),
        ),
        None => reprompt(session, "Please enter a valid amount in digits, for example 500."),
    }
}

pub(super) fn recipient(session: &Session, text: &str) -> Outcome {
    let Some(recipient) = parse_recipient(text) else {
        return reprompt(
            session,
            "That doesn't look like an email address or a phone number with 10 to 15 digits.",
        );
    };

    let mut next = session.clone();
    next.draft.personal.recipient = Some(recipient);
    advance(next, Stage::AwaitingMessage)
}

pub(super) fn message(session: &Session, text: &str) -> Outcome {
    let Some(message) = parse_message(text) else {
        return reprompt(session, "Messages can be up to 200 characters.");
    };

    let mut next = session.clone();
    next.draft.personal.message = message;
    advance(next, Stage::AwaitingConfirmation)
}

pub(super) fn confirmation(session: &Session, text: &str, ctx: &TurnContext<'_>) -> Outcome {
    match normalize_keyword(text).as_str() {
        "confirm" => {
            let receipt = build_receipt(session, ctx)?;
            let mut done = session.clone();
            done.stage = Stage::Completed;

            let reply = Reply::text(format!(
                "Your {} gift card for {} is confirmed! It's on its way to {}. Gift link: {}",
                receipt.amount_display, receipt.occasion, receipt.recipient, receipt.link
            ))
            .with_ui(UiHint::Receipt {
                receipt: receipt.clone(),
            });

            Ok(TransitionResult::new(done, reply)
                .with_effect(Effect::PersistSession)
                .with_effect(Effect::order_completed(receipt)))
        }
        "cancel" => Ok(cancel(
            session,
            "Your order has been cancelled. Say hi whenever you'd like to start again.",
        )),
        _ => reprompt(
            session,
            "Please reply confirm to place the order or cancel to discard it.",
        ),
    }
}

fn build_receipt(session: &Session, ctx: &TurnContext<'_>) -> Result<Receipt, TransitionError> {
    let stage = session.stage;
    let draft = &session.draft.personal;

    let amount = required(draft.amount, "amount", stage)?;
    let occasion = required(draft.occasion.as_ref(), "occasion", stage)?;
    let template = required(
        draft.template_id.as_deref().and_then(find_template),
        "template_id",
        stage,
    )?;
    let recipient = required(draft.recipient.as_ref(), "recipient", stage)?;

    Ok(Receipt {
        amount,
        amount_display: format_inr(amount),
        occasion: occasion.label().to_string(),
        template_id: template.id.to_string(),
        template_label: template.label.to_string(),
        recipient: recipient.to_string(),
        message: draft.message.clone(),
        link: gift_link(&ctx.flow.link_domain, &ctx.token),
    })
}

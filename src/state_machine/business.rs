//! Business-buyer path: lead capture, verification, order lines, delivery,
//! quotation, proforma invoice, purchase order, payment and feedback.

use super::event::OrderLineInput;
use super::prompts::describe_lines;
use super::reply::{FileDescriptor, Reply, UiHint};
use super::state::{
    BusinessReceipt, OrderLine, PurchaseOrder, Quotation, Session, Stage,
};
use super::transition::{
    advance, advance_with, cancel, reprompt, required, TransitionError, TransitionResult,
    TurnContext,
};
use super::Effect;
use crate::catalog::{registered_address, PaymentMethod};
use crate::format::{format_inr, invoice_link, reference_code, report_link};
use crate::parse::{
    is_valid_email, normalize_keyword, normalize_phone, normalize_tax_id, parse_delivery_date,
    parse_order_line, parse_po_number, parse_rating, passes_mock_verification,
};

pub const MAX_ORDER_LINES: usize = 20;
pub const MAX_DENOMINATION: u64 = 100_000;
pub const MAX_QUANTITY: u64 = 10_000;

const COMPANY_NAME_LEN: std::ops::RangeInclusive<usize> = 2..=100;
const ADDRESS_LEN: std::ops::RangeInclusive<usize> = 10..=300;
const PO_FILE_EXTENSIONS: [&str; 4] = [".pdf", ".png", ".jpg", ".jpeg"];

type Outcome = Result<TransitionResult, TransitionError>;

// ============================================================================
// Lead capture
// ============================================================================

fn valid_company_name(text: &str) -> Option<String> {
    let name = text.trim();
    COMPANY_NAME_LEN
        .contains(&name.chars().count())
        .then(|| name.to_string())
}

pub(super) fn company_name(session: &Session, text: &str) -> Outcome {
    let Some(name) = valid_company_name(text) else {
        return reprompt(session, "Company names need 2 to 100 characters.");
    };

    let mut next = session.clone();
    next.draft.business.company_name = Some(name);
    advance(next, Stage::AwaitingContactEmail)
}

pub(super) fn lead_details(session: &Session, company: &str, email: &str, phone: &str) -> Outcome {
    let Some(name) = valid_company_name(company) else {
        return reprompt(session, "Company names need 2 to 100 characters.");
    };
    if !is_valid_email(email) {
        return reprompt(session, "Please check the email address.");
    }
    let Some(phone) = normalize_phone(phone) else {
        return reprompt(session, "Please check the phone number (10 to 15 digits).");
    };

    let mut next = session.clone();
    let business = &mut next.draft.business;
    business.company_name = Some(name);
    business.contact_email = Some(email.trim().to_lowercase());
    business.contact_phone = Some(phone);
    lead_captured(next)
}

pub(super) fn contact_email(session: &Session, text: &str) -> Outcome {
    if !is_valid_email(text) {
        return reprompt(session, "That doesn't look like a valid email address.");
    }

    let mut next = session.clone();
    next.draft.business.contact_email = Some(text.trim().to_lowercase());
    advance(next, Stage::AwaitingContactPhone)
}

pub(super) fn contact_phone(session: &Session, text: &str) -> Outcome {
    let Some(phone) = normalize_phone(text) else {
        return reprompt(session, "Please enter a phone number with 10 to 15 digits.");
    };

    let mut next = session.clone();
    next.draft.business.contact_phone = Some(phone);
    lead_captured(next)
}

fn lead_captured(next: Session) -> Outcome {
    let stage = next.stage;
    let company_name = required(next.draft.business.company_name.clone(), "company_name", stage)?;
    let contact_email = required(
        next.draft.business.contact_email.clone(),
        "contact_email",
        stage,
    )?;

    Ok(advance(next, Stage::AwaitingTaxId)?.with_effect(Effect::LeadCaptured {
        company_name,
        contact_email,
    }))
}

// ============================================================================
// Verification
// ============================================================================

pub(super) fn tax_id(session: &Session, text: &str) -> Outcome {
    let Some(tax_id) = normalize_tax_id(text) else {
        return reprompt(session, "Please enter your GSTIN.");
    };
    if !passes_mock_verification(&tax_id) {
        return reprompt(
            session,
            &format!("We couldn't verify GSTIN {tax_id}. Please check it and try again."),
        );
    }

    let company = required(
        session.draft.business.company_name.as_deref(),
        "company_name",
        session.stage,
    )?;
    let address = registered_address(company, &tax_id);

    let mut next = session.clone();
    next.draft.business.tax_id = Some(tax_id);
    next.draft.business.registered_address = Some(address);
    advance_with(next, Stage::AwaitingOrderLines, "Your business is verified.")
}

// ============================================================================
// Order lines
// ============================================================================

fn validate_line(denomination: u64, quantity: u64) -> Result<OrderLine, String> {
    if denomination == 0 || denomination > MAX_DENOMINATION {
        return Err(format!(
            "Denominations must be between ₹1 and {}.",
            format_inr(MAX_DENOMINATION)
        ));
    }
    if quantity == 0 || quantity > MAX_QUANTITY {
        return Err(format!("Quantities must be between 1 and {MAX_QUANTITY}."));
    }
    Ok(OrderLine {
        denomination,
        quantity,
    })
}

pub(super) fn order_line(session: &Session, text: &str) -> Outcome {
    let lines = &session.draft.business.lines;

    match normalize_keyword(text).as_str() {
        "done" if lines.is_empty() => {
            return reprompt(session, "Add at least one order line first.");
        }
        "done" => return advance(session.clone(), Stage::AwaitingDeliveryDate),
        "clear" => {
            let mut next = session.clone();
            next.draft.business.lines.clear();
            return advance_with(next, Stage::AwaitingOrderLines, "Cleared all order lines.");
        }
        _ => {}
    }

    let Some((denomination, quantity)) = parse_order_line(text) else {
        return reprompt(session, "Please enter a line like 500 x 20, or type done.");
    };
    let line = match validate_line(denomination, quantity) {
        Ok(line) => line,
        Err(why) => return reprompt(session, &why),
    };
    if lines.len() >= MAX_ORDER_LINES {
        return reprompt(
            session,
            &format!("An order can have at most {MAX_ORDER_LINES} lines. Type done to continue."),
        );
    }

    let mut next = session.clone();
    next.draft.business.lines.push(line);
    let lead = format!(
        "Added {} x {}.",
        format_inr(line.denomination),
        line.quantity
    );
    advance_with(next, Stage::AwaitingOrderLines, &lead)
}

pub(super) fn replace_order_lines(session: &Session, inputs: &[OrderLineInput]) -> Outcome {
    if inputs.is_empty() {
        return reprompt(session, "Add at least one order line.");
    }
    if inputs.len() > MAX_ORDER_LINES {
        return reprompt(
            session,
            &format!("An order can have at most {MAX_ORDER_LINES} lines."),
        );
    }

    let mut lines = Vec::with_capacity(inputs.len());
    for input in inputs {
        match validate_line(input.denomination, input.quantity) {
            Ok(line) => lines.push(line),
            Err(why) => return reprompt(session, &why),
        }
    }

    let lead = format!("Got it: {}.", describe_lines(&lines));
    let mut next = session.clone();
    next.draft.business.lines = lines;
    advance_with(next, Stage::AwaitingDeliveryDate, &lead)
}

// ============================================================================
// Delivery
// ============================================================================

pub(super) fn delivery_date(session: &Session, text: &str, ctx: &TurnContext<'_>) -> Outcome {
    let Some(date) = parse_delivery_date(text, ctx.today) else {
        return reprompt(session, "Please reply now, or a date like 2026-05-01.");
    };

    let mut next = session.clone();
    next.draft.business.delivery_date = Some(date);
    advance(next, Stage::AwaitingDeliveryAddress)
}

pub(super) fn delivery_address(session: &Session, text: &str, ctx: &TurnContext<'_>) -> Outcome {
    let address = match normalize_keyword(text).as_str() {
        "yes" | "y" | "confirm" | "same" | "ok" => required(
            session.draft.business.registered_address.clone(),
            "registered_address",
            session.stage,
        )?,
        _ => {
            let custom = text.trim();
            if !ADDRESS_LEN.contains(&custom.chars().count()) {
                return reprompt(
                    session,
                    "Reply yes, or type a full delivery address (10 to 300 characters).",
                );
            }
            custom.to_string()
        }
    };

    let mut next = session.clone();
    let business = &mut next.draft.business;
    business.delivery_address = Some(address);
    business.quotation = Some(Quotation::price(&business.lines, ctx.flow.discount_percent));
    advance(next, Stage::AwaitingQuotation)
}

// ============================================================================
// Quotation and proforma invoice
// ============================================================================

pub(super) fn quotation(session: &Session, text: &str, ctx: &TurnContext<'_>) -> Outcome {
    match normalize_keyword(text).as_str() {
        "accept" | "approve" | "confirm" | "yes" => {
            let quotation = required(session.draft.business.quotation, "quotation", session.stage)?;
            let invoice_number = reference_code("PI", &ctx.short_token());

            let mut next = session.clone();
            next.stage = Stage::AwaitingPurchaseOrder;
            next.draft.business.proforma_number = Some(invoice_number.clone());

            let reply = Reply::text(format!(
                "Proforma invoice {invoice_number} for {} is ready to download. Once your purchase order is raised, upload it here or type the PO number.",
                format_inr(quotation.net)
            ))
            .with_ui(UiHint::Download {
                file: FileDescriptor {
                    file_name: format!("{invoice_number}.pdf"),
                    url: invoice_link(&ctx.flow.link_domain, &invoice_number),
                    mime_type: "application/pdf",
                },
            });

            Ok(TransitionResult::new(next, reply).with_effect(Effect::PersistSession))
        }
        "cancel" => Ok(cancel(
            session,
            "Quotation discarded. Say hi whenever you'd like to start again.",
        )),
        _ => reprompt(session, "Please reply accept, edit or cancel."),
    }
}

// ============================================================================
// Purchase order, payment, feedback
// ============================================================================

pub(super) fn purchase_order(session: &Session, po_number: &str, file_name: Option<&str>) -> Outcome {
    let Some(po_number) = parse_po_number(po_number) else {
        return reprompt(
            session,
            "PO numbers are 3 to 30 letters, digits, slashes or hyphens.",
        );
    };

    let file_name = match file_name.map(str::trim).filter(|f| !f.is_empty()) {
        None => None,
        Some(name) => {
            let lower = name.to_lowercase();
            if !PO_FILE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
                return reprompt(session, "Please upload the purchase order as a PDF or image.");
            }
            Some(name.to_string())
        }
    };

    let mut next = session.clone();
    next.draft.business.purchase_order = Some(PurchaseOrder {
        po_number,
        file_name,
    });
    advance_with(next, Stage::AwaitingPayment, "Purchase order received.")
}

pub(super) fn payment(session: &Session, text: &str, ctx: &TurnContext<'_>) -> Outcome {
    let Some(method) = PaymentMethod::from_keyword(text) else {
        return reprompt(session, "Please choose one of the payment options.");
    };

    let stage = session.stage;
    let business = &session.draft.business;
    let quotation = required(business.quotation, "quotation", stage)?;
    let order_reference = reference_code("ORD", &ctx.short_token());

    let receipt = BusinessReceipt {
        order_reference: order_reference.clone(),
        company_name: required(business.company_name.clone(), "company_name", stage)?,
        proforma_number: required(business.proforma_number.clone(), "proforma_number", stage)?,
        po_number: required(business.purchase_order.as_ref(), "purchase_order", stage)?
            .po_number
            .clone(),
        cards: business.lines.iter().map(|l| l.quantity).sum(),
        quotation,
        payment_method: method,
        delivery_date: required(business.delivery_date, "delivery_date", stage)?,
        delivery_address: required(business.delivery_address.clone(), "delivery_address", stage)?,
        report_link: report_link(&ctx.flow.link_domain, &ctx.token),
    };

    let mut next = session.clone();
    next.draft.business.payment_method = Some(method);
    next.draft.business.order_reference = Some(order_reference);

    let lead = format!(
        "Payment of {} via {} received (simulated). Order {} is confirmed for delivery on {}. Your order report: {}",
        format_inr(quotation.net),
        method.label(),
        receipt.order_reference,
        receipt.delivery_date.format("%Y-%m-%d"),
        receipt.report_link
    );
    let mut result = advance_with(next, Stage::AwaitingFeedback, &lead)?;
    result.reply.ui = Some(UiHint::BusinessReceipt {
        receipt: receipt.clone(),
    });
    Ok(result.with_effect(Effect::business_order_completed(receipt)))
}

pub(super) fn feedback(session: &Session, text: &str) -> Outcome {
    let rating = if normalize_keyword(text) == "skip" {
        None
    } else {
        match parse_rating(text) {
            Some(rating) => Some(rating),
            None => return reprompt(session, "Please reply with a rating from 1 to 5, or skip."),
        }
    };

    let mut next = session.clone();
    next.stage = Stage::Completed;
    next.draft.business.rating = rating;

    let reply = Reply::text(match rating {
        Some(_) => "Thanks for the feedback! Send any message to start a new order.",
        None => "All done. Send any message to start a new order.",
    });
    let order_reference = next.draft.business.order_reference.clone();

    Ok(TransitionResult::new(next, reply)
        .with_effect(Effect::PersistSession)
        .with_effect(Effect::FeedbackRecorded {
            order_reference,
            rating,
        }))
}

//! What each stage asks for. Re-prompts reuse the same text and hint.

use super::reply::{
    FieldKind, FormDescriptor, FormField, OrderSummary, Reply, SummaryLine, UiHint, UiOption,
};
use super::state::{OrderLine, Quotation, Session, Stage};
use super::transition::{required, TransitionError};
use crate::catalog::{find_template, Occasion, PaymentMethod, TEMPLATES};
use crate::format::{format_inr, format_optional_inr};

pub const MAX_GIFT_AMOUNT: u64 = 100_000;

pub fn prompt(session: &Session) -> Result<Reply, TransitionError> {
    let stage = session.stage;
    let personal = &session.draft.personal;
    let business = &session.draft.business;

    let reply = match stage {
        Stage::Idle => Reply::text("Say hi to start a new gift card order."),
        Stage::AwaitingBuyerType => {
            Reply::text("Are you buying a gift card for yourself or ordering for your business?")
                .with_ui(UiHint::options([
                    ("For myself", "personal"),
                    ("For my business", "business"),
                ]))
        }

        Stage::AwaitingOccasion => {
            let mut options: Vec<UiOption> = Occasion::FIXED
                .iter()
                .map(|o| UiOption::new(o.label(), o.keyword()))
                .collect();
            options.push(UiOption::new("Something else", "other"));
            Reply::text("What's the occasion?").with_ui(UiHint::Options { options })
        }
        Stage::AwaitingCustomOccasion => {
            Reply::text("Tell us the occasion in a few words (up to 60 characters).")
        }
        Stage::AwaitingTemplate => {
            let occasion = personal.occasion.as_ref().map_or("gift", Occasion::label);
            Reply::text(format!("Pick a design for your {occasion} card."))
                .with_ui(UiHint::TemplateGallery {
                    templates: TEMPLATES.to_vec(),
                })
        }
        Stage::AwaitingAmount => Reply::text(format!(
            "How much should the gift card be worth? Enter an amount up to {}.",
            format_inr(MAX_GIFT_AMOUNT)
        ))
        .with_ui(UiHint::options([
            ("₹500", "500"),
            ("₹1,000", "1000"),
            ("₹2,000", "2000"),
            ("₹5,000", "5000"),
        ])),
        Stage::AwaitingRecipient => {
            Reply::text("Who is it for? Share the recipient's email address or phone number.")
        }
        Stage::AwaitingMessage => Reply::text(
            "Add a personal message (up to 200 characters), or type skip.",
        )
        .with_ui(UiHint::options([("Skip", "skip")])),
        Stage::AwaitingConfirmation => confirmation_summary(session),

        Stage::AwaitingCompanyName => Reply::text(
            "Let's set up your bulk order. What's your company's name? You can also fill in all contact details at once.",
        )
        .with_ui(UiHint::Form {
            form: lead_form(),
        }),
        Stage::AwaitingContactEmail => Reply::text("What's the best work email to reach you?"),
        Stage::AwaitingContactPhone => Reply::text("And a phone number we can call?"),
        Stage::AwaitingTaxId => {
            Reply::text("Please share your company's GSTIN so we can verify your business.")
        }
        Stage::AwaitingOrderLines => {
            let mut text = String::from(
                "Add order lines as denomination x quantity (for example 500 x 20). Type done when finished, or clear to start over.",
            );
            if !business.lines.is_empty() {
                text.push_str(" So far: ");
                text.push_str(&describe_lines(&business.lines));
                text.push('.');
            }
            Reply::text(text).with_ui(UiHint::Form {
                form: order_lines_form(),
            })
        }
        Stage::AwaitingDeliveryDate => Reply::text(
            "When should the cards be delivered? Reply now, or a date as YYYY-MM-DD.",
        )
        .with_ui(UiHint::options([("As soon as possible", "now")])),
        Stage::AwaitingDeliveryAddress => {
            let address = required(
                business.registered_address.as_deref(),
                "registered_address",
                stage,
            )?;
            Reply::text(format!(
                "Should we deliver to your registered address: {address}? Reply yes, or type a different address."
            ))
            .with_ui(UiHint::options([("Yes, use this address", "yes")]))
        }
        Stage::AwaitingQuotation => {
            let quotation = required(business.quotation, "quotation", stage)?;
            quotation_summary(&business.lines, quotation)
        }
        Stage::AwaitingPurchaseOrder => Reply::text(
            "Please upload your purchase order, or type the PO number.",
        )
        .with_ui(UiHint::Form {
            form: purchase_order_form(),
        }),
        Stage::AwaitingPayment => {
            let quotation = required(business.quotation, "quotation", stage)?;
            let options = PaymentMethod::ALL
                .iter()
                .map(|m| UiOption::new(m.label(), m.keyword()))
                .collect();
            Reply::text(format!(
                "Net payable is {}. How would you like to pay?",
                format_inr(quotation.net)
            ))
            .with_ui(UiHint::Options { options })
        }
        Stage::AwaitingFeedback => Reply::text(
            "How would you rate your experience from 1 to 5? Type skip to finish.",
        )
        .with_ui(UiHint::options([
            ("1", "1"),
            ("2", "2"),
            ("3", "3"),
            ("4", "4"),
            ("5", "5"),
            ("Skip", "skip"),
        ])),
        Stage::Completed => {
            Reply::text("Your order is complete. Send any message to start a new one.")
        }
    };

    Ok(reply)
}

fn confirmation_summary(session: &Session) -> Reply {
    let personal = &session.draft.personal;
    let occasion = personal.occasion.as_ref().map_or("-", Occasion::label);
    let design = personal
        .template_id
        .as_deref()
        .and_then(find_template)
        .map_or("-", |t| t.label);
    let amount = format_optional_inr(personal.amount);
    let recipient = personal
        .recipient
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);

    let summary = OrderSummary {
        title: "Gift card order".to_string(),
        lines: vec![
            SummaryLine::new("Occasion", occasion),
            SummaryLine::new("Design", design),
            SummaryLine::new("Amount", amount.clone()),
            SummaryLine::new("Recipient", recipient.clone()),
            SummaryLine::new(
                "Message",
                personal.message.as_deref().unwrap_or("(none)"),
            ),
        ],
        total: personal.amount.unwrap_or(0),
        actions: vec![
            UiOption::new("Confirm", "confirm"),
            UiOption::new("Cancel", "cancel"),
        ],
    };

    Reply::text(format!(
        "Here's your order: a {amount} {occasion} gift card in the {design} design for {recipient}. Reply confirm to place it or cancel to discard it."
    ))
    .with_ui(UiHint::Confirmation { summary })
}

fn quotation_summary(lines: &[OrderLine], quotation: Quotation) -> Reply {
    let mut summary_lines: Vec<SummaryLine> = lines
        .iter()
        .map(|line| {
            SummaryLine::new(
                format!("{} x {}", format_inr(line.denomination), line.quantity),
                format_inr(line.subtotal()),
            )
        })
        .collect();
    summary_lines.push(SummaryLine::new("Gross value", format_inr(quotation.gross)));
    summary_lines.push(SummaryLine::new(
        format!("Bulk discount ({}%)", quotation.discount_percent),
        format!("-{}", format_inr(quotation.discount)),
    ));
    summary_lines.push(SummaryLine::new("Net payable", format_inr(quotation.net)));

    let summary = OrderSummary {
        title: "Quotation".to_string(),
        lines: summary_lines,
        total: quotation.net,
        actions: vec![
            UiOption::new("Accept", "accept"),
            UiOption::new("Edit order", "edit"),
            UiOption::new("Cancel", "cancel"),
        ],
    };

    Reply::text(format!(
        "Your quotation: gross {}, discount {}, net payable {}. Reply accept to receive a proforma invoice, edit to change the order, or cancel.",
        format_inr(quotation.gross),
        format_inr(quotation.discount),
        format_inr(quotation.net)
    ))
    .with_ui(UiHint::Confirmation { summary })
}

pub fn describe_lines(lines: &[OrderLine]) -> String {
    lines
        .iter()
        .map(|l| format!("{} x {}", format_inr(l.denomination), l.quantity))
        .collect::<Vec<_>>()
        .join(", ")
}

fn lead_form() -> FormDescriptor {
    FormDescriptor {
        form_type: "lead_details",
        title: "Company details",
        fields: vec![
            FormField::required("companyName", "Company name", FieldKind::Text),
            FormField::required("email", "Work email", FieldKind::Email),
            FormField::required("phone", "Phone", FieldKind::Phone),
        ],
        submit_label: "Continue",
    }
}

fn order_lines_form() -> FormDescriptor {
    FormDescriptor {
        form_type: "order_lines",
        title: "Order lines",
        fields: vec![FormField::required(
            "lines",
            "Denomination and quantity",
            FieldKind::OrderLines,
        )],
        submit_label: "Get quotation details",
    }
}

fn purchase_order_form() -> FormDescriptor {
    FormDescriptor {
        form_type: "purchase_order",
        title: "Purchase order",
        fields: vec![
            FormField::required("poNumber", "PO number", FieldKind::Text),
            FormField::optional("fileName", "PO document", FieldKind::File),
        ],
        submit_label: "Upload",
    }
}

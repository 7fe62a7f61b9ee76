//! Property-based tests for the dialogue state machine
//!
//! These tests verify key invariants hold across arbitrary user input.

use super::event::{FormSubmission, OrderLineInput};
use super::prompts::prompt;
use super::state::{OrderLine, Quotation, Recipient};
use crate::catalog::Occasion;
use super::*;
use crate::format::format_inr;
use chrono::{NaiveDate, Utc};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn flow(variant: FlowVariant) -> FlowSettings {
    FlowSettings {
        variant,
        ..FlowSettings::default()
    }
}

fn test_context<'a>(flow: &'a FlowSettings, token: &str) -> TurnContext<'a> {
    TurnContext {
        flow,
        today: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        token: token.to_string(),
    }
}

fn at(stage: Stage) -> Session {
    let mut session = Session::new(Utc::now());
    session.stage = stage;
    session
}

/// Words that carry meaning somewhere in the dialogue
const KEYWORDS: &[&str] = &[
    "hi", "Hello!", "back", "edit", "done", "clear", "confirm", "cancel", "accept", "skip",
    "yes", "now", "2026-05-01", "personal", "business", "birthday", "other", "Retirement",
    "t1", "Golden Ribbon", "500", "₹1,000", "250000", "500 x 20", "1000 x 5", "0 x 1",
    "asha@example.com", "9876543210", "Acme Traders", "29ABCDE1234F1Z5", "27AAAAA0000A1Z5",
    "12 MG Road, Pune 411001", "PO-2026-1", "upi", "card", "4", "Happy birthday!",
];

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_variant() -> impl Strategy<Value = FlowVariant> {
    prop_oneof![Just(FlowVariant::Personal), Just(FlowVariant::BusinessAware)]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => proptest::sample::select(KEYWORDS).prop_map(str::to_string),
        1 => "[a-zA-Z0-9 @.,x-]{0,24}",
    ]
}

fn arb_order_line_input() -> impl Strategy<Value = OrderLineInput> {
    (0u64..200_000, 0u64..20_000).prop_map(|(denomination, quantity)| OrderLineInput {
        denomination,
        quantity,
    })
}

fn arb_form() -> impl Strategy<Value = FormSubmission> {
    prop_oneof![
        ("[A-Za-z ]{1,20}", "[a-z]{1,8}@[a-z]{1,8}\\.in", "[0-9]{8,12}").prop_map(
            |(company_name, email, phone)| FormSubmission::LeadDetails {
                company_name,
                email,
                phone,
            }
        ),
        proptest::collection::vec(arb_order_line_input(), 0..25)
            .prop_map(|lines| FormSubmission::OrderLines { lines }),
        ("[A-Z0-9-]{1,12}", proptest::option::of("[a-z]{1,8}\\.(pdf|png|exe)")).prop_map(
            |(po_number, file_name)| FormSubmission::PurchaseOrder {
                po_number,
                file_name,
            }
        ),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        5 => arb_text().prop_map(Event::message),
        1 => arb_form().prop_map(Event::FormSubmit),
    ]
}

fn arb_greeting() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("hi".to_string()),
        Just("Hello!".to_string()),
        Just("  HEY ".to_string()),
        Just("hello.".to_string()),
    ]
}

/// Stages whose prompt needs nothing from the draft
fn arb_plain_stage() -> impl Strategy<Value = Stage> {
    prop_oneof![
        Just(Stage::AwaitingOccasion),
        Just(Stage::AwaitingTemplate),
        Just(Stage::AwaitingAmount),
        Just(Stage::AwaitingRecipient),
        Just(Stage::AwaitingConfirmation),
        Just(Stage::AwaitingCompanyName),
        Just(Stage::AwaitingContactEmail),
        Just(Stage::AwaitingOrderLines),
        Just(Stage::AwaitingDeliveryDate),
        Just(Stage::AwaitingPurchaseOrder),
        Just(Stage::AwaitingFeedback),
    ]
}

/// Stages that only take a keyword or a strictly shaped value. The occasion,
/// custom occasion, message, company name, GSTIN and PO number prompts take
/// free text and are left out.
fn arb_closed_stage() -> impl Strategy<Value = Stage> {
    proptest::sample::select(vec![
        Stage::AwaitingBuyerType,
        Stage::AwaitingTemplate,
        Stage::AwaitingAmount,
        Stage::AwaitingRecipient,
        Stage::AwaitingConfirmation,
        Stage::AwaitingContactEmail,
        Stage::AwaitingContactPhone,
        Stage::AwaitingOrderLines,
        Stage::AwaitingDeliveryDate,
        Stage::AwaitingDeliveryAddress,
        Stage::AwaitingQuotation,
        Stage::AwaitingPayment,
        Stage::AwaitingFeedback,
    ])
}

/// Session at `stage` with every draft field its prompt could ask for
fn filled_at(stage: Stage) -> Session {
    let mut session = at(stage);
    let personal = &mut session.draft.personal;
    personal.occasion = Some(Occasion::Birthday);
    personal.template_id = Some("t1".to_string());
    personal.amount = Some(1_000);
    personal.recipient = Some(Recipient::Email("asha@example.com".to_string()));

    let lines = vec![OrderLine {
        denomination: 500,
        quantity: 20,
    }];
    let business = &mut session.draft.business;
    business.company_name = Some("Acme Traders".to_string());
    business.contact_email = Some("buyer@acme.in".to_string());
    business.contact_phone = Some("9876543210".to_string());
    business.tax_id = Some("29ABCDE1234F1Z5".to_string());
    business.registered_address = Some("12 MG Road, Pune 411001".to_string());
    business.quotation = Some(Quotation::price(&lines, 2));
    business.lines = lines;
    business.delivery_date = NaiveDate::from_ymd_opt(2026, 3, 20);
    business.delivery_address = business.registered_address.clone();
    business.proforma_number = Some("PI-ABC123XY".to_string());
    session
}

const CURRENCY_PREFIXES: &[&str] = &["", "₹", "Rs ", "Rs. ", "INR "];

const TEMPLATE_IDS: &[&str] = &["t1", "t2", "t3", "t4", "t5", "t6"];

fn arb_currency_prefix() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(CURRENCY_PREFIXES)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: a session that only ever moved through transitions never
    // hits an internal fault, whatever the user sends
    #[test]
    fn prop_walk_from_fresh_session_never_faults(
        variant in arb_variant(),
        events in proptest::collection::vec(arb_event(), 0..40),
    ) {
        let flow = flow(variant);
        let ctx = test_context(&flow, "abc123xyz789");
        let mut session = Session::new(Utc::now());

        for event in events {
            let result = transition(&session, &ctx, event.clone());
            prop_assert!(result.is_ok(), "{:?} at {} -> {:?}", event, session.stage, result);
            session = result.unwrap().session;
        }
    }

    // Invariant 2: any stage or draft change is persisted; no effects means
    // the session is untouched
    #[test]
    fn prop_changes_persist(
        variant in arb_variant(),
        events in proptest::collection::vec(arb_event(), 1..40),
    ) {
        let flow = flow(variant);
        let ctx = test_context(&flow, "abc123xyz789");
        let mut session = Session::new(Utc::now());

        for event in events {
            let Ok(result) = transition(&session, &ctx, event) else { break };
            if result.session != session {
                prop_assert!(result.persists(), "unpersisted change at {}", session.stage);
            }
            if result.effects.is_empty() {
                prop_assert_eq!(&result.session, &session);
            }
            session = result.session;
        }
    }

    // Invariant 3: a greeting always lands on the welcome stage with an empty draft
    #[test]
    fn prop_greeting_resets(
        variant in arb_variant(),
        stage in arb_plain_stage(),
        greeting in arb_greeting(),
        amount in proptest::option::of(1u64..=100_000),
    ) {
        let flow = flow(variant);
        let mut session = at(stage);
        session.draft.personal.amount = amount;

        let result = transition(&session, &test_context(&flow, "t"), Event::message(greeting)).unwrap();
        prop_assert_eq!(result.session.stage, flow.welcome_stage());
        prop_assert!(result.session.draft.is_empty());
        prop_assert!(result.persists());
    }

    // Invariant 4: rejected input keeps the session and repeats the prompt's hint
    #[test]
    fn prop_invalid_input_reprompts(
        variant in arb_variant(),
        stage in arb_closed_stage(),
        text in "zq[a-z]{4,6}",
    ) {
        let flow = flow(variant);
        let session = filled_at(stage);
        let expected = prompt(&session).unwrap();

        let result = transition(&session, &test_context(&flow, "t"), Event::message(text)).unwrap();
        prop_assert_eq!(&result.session, &session);
        prop_assert!(result.effects.is_empty());
        prop_assert_eq!(result.reply.ui, expected.ui);
        prop_assert!(result.reply.text.ends_with(&expected.text));
    }

    // Invariant 5: the currency prefix and digit grouping never change the amount
    #[test]
    fn prop_amount_ignores_currency_prefix(
        amount in 1u64..=100_000,
        prefix in arb_currency_prefix(),
        grouped in any::<bool>(),
    ) {
        let flow = FlowSettings::default();
        let digits = if grouped {
            format_inr(amount).trim_start_matches('₹').to_string()
        } else {
            amount.to_string()
        };
        let text = format!("{prefix}{digits}");

        let result = transition(&at(Stage::AwaitingAmount), &test_context(&flow, "t"), Event::message(text)).unwrap();
        prop_assert_eq!(result.session.stage, Stage::AwaitingRecipient);
        prop_assert_eq!(result.session.draft.personal.amount, Some(amount));
    }

    // Invariant 6: confirming a complete draft always completes with the token's link
    #[test]
    fn prop_happy_path_issues_gift_link(
        amount in 1u64..=100_000,
        token in "[a-z0-9]{12}",
        template in proptest::sample::select(TEMPLATE_IDS),
    ) {
        let flow = FlowSettings::default();
        let ctx = test_context(&flow, &token);
        let mut session = Session::new(Utc::now());

        let amount_text = amount.to_string();
        for text in ["hi", "birthday", template, amount_text.as_str(), "asha@example.com", "skip"] {
            session = transition(&session, &ctx, Event::message(text)).unwrap().session;
        }
        prop_assert_eq!(session.stage, Stage::AwaitingConfirmation);

        let result = transition(&session, &ctx, Event::message("confirm")).unwrap();
        prop_assert_eq!(result.session.stage, Stage::Completed);
        let link = format!("https://gifts.example.com/gift/{token}");
        prop_assert!(result.reply.text.contains(&link));
        let receipt_link = result.effects.iter().find_map(|e| match e {
            Effect::OrderCompleted { receipt } => Some(receipt.link.clone()),
            _ => None,
        });
        prop_assert_eq!(receipt_link, Some(link));
    }

    // Invariant 7: gross = discount + net, and the discount never exceeds the rate
    #[test]
    fn prop_quotation_adds_up(
        lines in proptest::collection::vec((1u64..=100_000, 1u64..=10_000), 1..=20),
        percent in 1u8..=2,
    ) {
        let lines: Vec<OrderLine> = lines
            .into_iter()
            .map(|(denomination, quantity)| OrderLine { denomination, quantity })
            .collect();
        let q = Quotation::price(&lines, percent);
        prop_assert_eq!(q.gross, lines.iter().map(OrderLine::subtotal).sum::<u64>());
        prop_assert_eq!(q.discount + q.net, q.gross);
        prop_assert!(q.discount * 100 <= q.gross * u64::from(percent) + 50);
    }
}

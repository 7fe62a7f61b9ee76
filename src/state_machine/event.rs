//! Inputs that drive a session forward

use serde::{Deserialize, Serialize};

/// One user turn
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Free text typed or sent by a button
    UserMessage { text: String },
    /// A structured form filled in by the presentation layer
    FormSubmit(FormSubmission),
}

impl Event {
    pub fn message(text: impl Into<String>) -> Self {
        Event::UserMessage { text: text.into() }
    }
}

/// Multi-field inputs travel as one tagged object instead of a delimited string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum FormSubmission {
    /// Company lead details in a single step
    LeadDetails {
        company_name: String,
        email: String,
        phone: String,
    },
    /// Replaces every order line at once
    OrderLines { lines: Vec<OrderLineInput> },
    PurchaseOrder {
        po_number: String,
        #[serde(default)]
        file_name: Option<String>,
    },
}

impl FormSubmission {
    pub fn kind(&self) -> &'static str {
        match self {
            FormSubmission::LeadDetails { .. } => "lead_details",
            FormSubmission::OrderLines { .. } => "order_lines",
            FormSubmission::PurchaseOrder { .. } => "purchase_order",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    pub denomination: u64,
    pub quantity: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_submission_wire_shape() {
        let form: FormSubmission = serde_json::from_value(json!({
            "type": "purchase_order",
            "poNumber": "PO-17",
            "fileName": "po-17.pdf"
        }))
        .unwrap();
        assert_eq!(
            form,
            FormSubmission::PurchaseOrder {
                po_number: "PO-17".to_string(),
                file_name: Some("po-17.pdf".to_string()),
            }
        );

        let form: FormSubmission = serde_json::from_value(json!({
            "type": "order_lines",
            "lines": [{ "denomination": 500, "quantity": 10 }]
        }))
        .unwrap();
        assert_eq!(form.kind(), "order_lines");
    }

    #[test]
    fn test_unknown_form_type_rejected() {
        let parsed = serde_json::from_value::<FormSubmission>(json!({ "type": "shipping" }));
        assert!(parsed.is_err());
    }
}

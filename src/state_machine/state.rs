//! Session, stage and draft types

use crate::catalog::{Occasion, PaymentMethod};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Flow configuration
// ============================================================================

/// Which dialogue the service runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowVariant {
    /// Straight into the personal purchase path
    #[default]
    Personal,
    /// Ask for the buyer type first, then branch
    BusinessAware,
}

/// Immutable per-deployment settings consulted by every transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSettings {
    pub variant: FlowVariant,
    /// Flat bulk discount, 1 or 2 percent
    pub discount_percent: u8,
    /// Mock domain used for gift, invoice and report links (no trailing slash)
    pub link_domain: String,
}

impl FlowSettings {
    pub fn welcome_stage(&self) -> Stage {
        match self.variant {
            FlowVariant::Personal => Stage::AwaitingOccasion,
            FlowVariant::BusinessAware => Stage::AwaitingBuyerType,
        }
    }
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            variant: FlowVariant::Personal,
            discount_percent: 2,
            link_domain: "https://gifts.example.com".to_string(),
        }
    }
}

// ============================================================================
// Stage
// ============================================================================

/// The point in the dialogue a session currently occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    AwaitingBuyerType,

    // Personal path
    AwaitingOccasion,
    AwaitingCustomOccasion,
    AwaitingTemplate,
    AwaitingAmount,
    AwaitingRecipient,
    AwaitingMessage,
    AwaitingConfirmation,

    // Business path
    AwaitingCompanyName,
    AwaitingContactEmail,
    AwaitingContactPhone,
    AwaitingTaxId,
    AwaitingOrderLines,
    AwaitingDeliveryDate,
    AwaitingDeliveryAddress,
    AwaitingQuotation,
    AwaitingPurchaseOrder,
    AwaitingPayment,
    AwaitingFeedback,

    Completed,
}

impl Stage {
    #[cfg(test)]
    pub const ALL: [Stage; 21] = [
        Stage::Idle,
        Stage::AwaitingBuyerType,
        Stage::AwaitingOccasion,
        Stage::AwaitingCustomOccasion,
        Stage::AwaitingTemplate,
        Stage::AwaitingAmount,
        Stage::AwaitingRecipient,
        Stage::AwaitingMessage,
        Stage::AwaitingConfirmation,
        Stage::AwaitingCompanyName,
        Stage::AwaitingContactEmail,
        Stage::AwaitingContactPhone,
        Stage::AwaitingTaxId,
        Stage::AwaitingOrderLines,
        Stage::AwaitingDeliveryDate,
        Stage::AwaitingDeliveryAddress,
        Stage::AwaitingQuotation,
        Stage::AwaitingPurchaseOrder,
        Stage::AwaitingPayment,
        Stage::AwaitingFeedback,
        Stage::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::AwaitingBuyerType => "awaiting_buyer_type",
            Stage::AwaitingOccasion => "awaiting_occasion",
            Stage::AwaitingCustomOccasion => "awaiting_custom_occasion",
            Stage::AwaitingTemplate => "awaiting_template",
            Stage::AwaitingAmount => "awaiting_amount",
            Stage::AwaitingRecipient => "awaiting_recipient",
            Stage::AwaitingMessage => "awaiting_message",
            Stage::AwaitingConfirmation => "awaiting_confirmation",
            Stage::AwaitingCompanyName => "awaiting_company_name",
            Stage::AwaitingContactEmail => "awaiting_contact_email",
            Stage::AwaitingContactPhone => "awaiting_contact_phone",
            Stage::AwaitingTaxId => "awaiting_tax_id",
            Stage::AwaitingOrderLines => "awaiting_order_lines",
            Stage::AwaitingDeliveryDate => "awaiting_delivery_date",
            Stage::AwaitingDeliveryAddress => "awaiting_delivery_address",
            Stage::AwaitingQuotation => "awaiting_quotation",
            Stage::AwaitingPurchaseOrder => "awaiting_purchase_order",
            Stage::AwaitingPayment => "awaiting_payment",
            Stage::AwaitingFeedback => "awaiting_feedback",
            Stage::Completed => "completed",
        }
    }

    /// Stages that belong to the business-buyer branch
    #[cfg(test)]
    pub fn is_business(self) -> bool {
        matches!(
            self,
            Stage::AwaitingCompanyName
                | Stage::AwaitingContactEmail
                | Stage::AwaitingContactPhone
                | Stage::AwaitingTaxId
                | Stage::AwaitingOrderLines
                | Stage::AwaitingDeliveryDate
                | Stage::AwaitingDeliveryAddress
                | Stage::AwaitingQuotation
                | Stage::AwaitingPurchaseOrder
                | Stage::AwaitingPayment
                | Stage::AwaitingFeedback
        )
    }

    /// Where `back` leads. Stages after the proforma invoice is issued have
    /// no predecessor: the invoice number is already out.
    pub fn previous(self, variant: FlowVariant) -> Option<Stage> {
        match self {
            Stage::AwaitingOccasion => match variant {
                FlowVariant::BusinessAware => Some(Stage::AwaitingBuyerType),
                FlowVariant::Personal => None,
            },
            Stage::AwaitingCustomOccasion | Stage::AwaitingTemplate => {
                Some(Stage::AwaitingOccasion)
            }
            Stage::AwaitingAmount => Some(Stage::AwaitingTemplate),
            Stage::AwaitingRecipient => Some(Stage::AwaitingAmount),
            Stage::AwaitingMessage => Some(Stage::AwaitingRecipient),
            Stage::AwaitingConfirmation => Some(Stage::AwaitingMessage),
            Stage::AwaitingCompanyName => Some(Stage::AwaitingBuyerType),
            Stage::AwaitingContactEmail => Some(Stage::AwaitingCompanyName),
            Stage::AwaitingContactPhone => Some(Stage::AwaitingContactEmail),
            Stage::AwaitingTaxId => Some(Stage::AwaitingContactPhone),
            Stage::AwaitingOrderLines => Some(Stage::AwaitingTaxId),
            Stage::AwaitingDeliveryDate => Some(Stage::AwaitingOrderLines),
            Stage::AwaitingDeliveryAddress => Some(Stage::AwaitingDeliveryDate),
            Stage::AwaitingQuotation => Some(Stage::AwaitingDeliveryAddress),
            Stage::Idle
            | Stage::AwaitingBuyerType
            | Stage::AwaitingPurchaseOrder
            | Stage::AwaitingPayment
            | Stage::AwaitingFeedback
            | Stage::Completed => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Draft
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyerType {
    Personal,
    Business,
}

/// Where the gift card is sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Recipient {
    Email(String),
    Phone(String),
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Email(email) => f.write_str(email),
            Recipient::Phone(phone) => f.write_str(phone),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDraft {
    pub occasion: Option<Occasion>,
    pub template_id: Option<String>,
    pub amount: Option<u64>,
    pub recipient: Option<Recipient>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub denomination: u64,
    pub quantity: u64,
}

impl OrderLine {
    pub fn subtotal(&self) -> u64 {
        self.denomination.saturating_mul(self.quantity)
    }
}

/// Priced order: gross, flat discount and net payable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub gross: u64,
    pub discount_percent: u8,
    pub discount: u64,
    pub net: u64,
}

impl Quotation {
    pub fn price(lines: &[OrderLine], discount_percent: u8) -> Self {
        let gross = lines
            .iter()
            .map(OrderLine::subtotal)
            .fold(0u64, u64::saturating_add);
        let discount = crate::format::discount(gross, discount_percent);
        Self {
            gross,
            discount_percent,
            discount,
            net: gross.saturating_sub(discount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub po_number: String,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDraft {
    pub company_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub tax_id: Option<String>,
    pub registered_address: Option<String>,
    pub lines: Vec<OrderLine>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_address: Option<String>,
    pub quotation: Option<Quotation>,
    pub proforma_number: Option<String>,
    pub purchase_order: Option<PurchaseOrder>,
    pub payment_method: Option<PaymentMethod>,
    pub order_reference: Option<String>,
    pub rating: Option<u8>,
}

/// The partially filled order accumulated across turns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub buyer: Option<BuyerType>,
    pub personal: PersonalDraft,
    pub business: BusinessDraft,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        *self == Draft::default()
    }
}

// ============================================================================
// Session
// ============================================================================

/// One ongoing conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub stage: Stage,
    pub draft: Draft,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            stage: Stage::Idle,
            draft: Draft::default(),
            created_at,
        }
    }

    /// Same session, fresh draft, given stage
    pub fn reset_to(&self, stage: Stage) -> Self {
        Self {
            stage,
            draft: Draft::default(),
            created_at: self.created_at,
        }
    }
}

// ============================================================================
// Receipts
// ============================================================================

/// Snapshot of a completed personal order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub amount: u64,
    pub amount_display: String,
    pub occasion: String,
    pub template_id: String,
    pub template_label: String,
    pub recipient: String,
    pub message: Option<String>,
    pub link: String,
}

/// Snapshot of a paid business order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessReceipt {
    pub order_reference: String,
    pub company_name: String,
    pub proforma_number: String,
    pub po_number: String,
    pub cards: u64,
    pub quotation: Quotation,
    pub payment_method: PaymentMethod,
    pub delivery_date: NaiveDate,
    pub delivery_address: String,
    pub report_link: String,
}

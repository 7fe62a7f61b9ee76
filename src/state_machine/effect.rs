//! Effects produced by state transitions

use super::state::{BusinessReceipt, Receipt};

/// Effects to be executed after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Write the new session back to the store
    PersistSession,

    /// Business contact details are complete
    LeadCaptured {
        company_name: String,
        contact_email: String,
    },

    /// A personal order was confirmed
    OrderCompleted { receipt: Receipt },

    /// A business order was paid for
    BusinessOrderCompleted { receipt: BusinessReceipt },

    /// Post-sale rating (`None` when skipped)
    FeedbackRecorded {
        order_reference: Option<String>,
        rating: Option<u8>,
    },
}

impl Effect {
    pub fn order_completed(receipt: Receipt) -> Self {
        Effect::OrderCompleted { receipt }
    }

    pub fn business_order_completed(receipt: BusinessReceipt) -> Self {
        Effect::BusinessOrderCompleted { receipt }
    }
}

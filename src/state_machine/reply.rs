//! Reply payloads: text plus an optional structured hint for the client

use super::state::{BusinessReceipt, Receipt};
use crate::catalog::Template;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub ui: Option<UiHint>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ui: None,
        }
    }

    pub fn with_ui(mut self, ui: UiHint) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Put a sentence in front of the reply text, keeping the hint
    pub fn prefixed(mut self, lead: &str) -> Self {
        self.text = format!("{lead} {}", self.text);
        self
    }
}

/// Structured rendering hint; the shape varies by stage
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiHint {
    Options { options: Vec<UiOption> },
    TemplateGallery { templates: Vec<Template> },
    Confirmation { summary: OrderSummary },
    Form { form: FormDescriptor },
    Download { file: FileDescriptor },
    Receipt { receipt: Receipt },
    BusinessReceipt { receipt: BusinessReceipt },
}

impl UiHint {
    pub fn options<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        UiHint::Options {
            options: pairs
                .into_iter()
                .map(|(label, value)| UiOption::new(label, value))
                .collect(),
        }
    }
}

/// A button: `value` is sent back verbatim when clicked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiOption {
    pub label: String,
    pub value: String,
}

impl UiOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub label: String,
    pub value: String,
}

impl SummaryLine {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub title: String,
    pub lines: Vec<SummaryLine>,
    /// Amount due in whole rupees
    pub total: u64,
    pub actions: Vec<UiOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    File,
    /// Repeating group of denomination/quantity rows
    OrderLines,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FormField {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }
}

/// Describes a form whose submission comes back as a `FormSubmission`
/// tagged with `form_type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDescriptor {
    pub form_type: &'static str,
    pub title: &'static str,
    pub fields: Vec<FormField>,
    pub submit_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub file_name: String,
    pub url: String,
    pub mime_type: &'static str,
}

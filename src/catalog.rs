//! Static catalog data: occasions, card templates, payment methods and the
//! mock company directory used by business verification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gift occasion, either one of the fixed list or free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum Occasion {
    Birthday,
    Anniversary,
    Wedding,
    Festival,
    ThankYou,
    Congratulations,
    Custom(String),
}

impl Occasion {
    /// Fixed occasions offered as buttons, in display order
    pub const FIXED: [Occasion; 6] = [
        Occasion::Birthday,
        Occasion::Anniversary,
        Occasion::Wedding,
        Occasion::Festival,
        Occasion::ThankYou,
        Occasion::Congratulations,
    ];

    /// Match a keyword against the fixed list (case-insensitive)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim().to_lowercase();
        Self::FIXED
            .into_iter()
            .find(|o| o.keyword() == keyword || o.label().to_lowercase() == keyword)
    }

    pub fn keyword(&self) -> &str {
        match self {
            Occasion::Birthday => "birthday",
            Occasion::Anniversary => "anniversary",
            Occasion::Wedding => "wedding",
            Occasion::Festival => "festival",
            Occasion::ThankYou => "thank_you",
            Occasion::Congratulations => "congratulations",
            Occasion::Custom(text) => text,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Occasion::Birthday => "Birthday",
            Occasion::Anniversary => "Anniversary",
            Occasion::Wedding => "Wedding",
            Occasion::Festival => "Festival",
            Occasion::ThankYou => "Thank You",
            Occasion::Congratulations => "Congratulations",
            Occasion::Custom(text) => text,
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A gift card design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    pub id: &'static str,
    pub label: &'static str,
    pub preview_url: &'static str,
}

pub const TEMPLATES: [Template; 6] = [
    Template {
        id: "t1",
        label: "Confetti Burst",
        preview_url: "/static/templates/t1.png",
    },
    Template {
        id: "t2",
        label: "Golden Ribbon",
        preview_url: "/static/templates/t2.png",
    },
    Template {
        id: "t3",
        label: "Floral Classic",
        preview_url: "/static/templates/t3.png",
    },
    Template {
        id: "t4",
        label: "Minimal Ink",
        preview_url: "/static/templates/t4.png",
    },
    Template {
        id: "t5",
        label: "Festive Lights",
        preview_url: "/static/templates/t5.png",
    },
    Template {
        id: "t6",
        label: "Starry Night",
        preview_url: "/static/templates/t6.png",
    },
];

/// Look up a template by id or label, case-insensitive
pub fn find_template(key: &str) -> Option<&'static Template> {
    let key = key.trim();
    TEMPLATES
        .iter()
        .find(|t| t.id.eq_ignore_ascii_case(key) || t.label.eq_ignore_ascii_case(key))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Upi,
    Card,
    NetBanking,
    Neft,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Upi,
        PaymentMethod::Card,
        PaymentMethod::NetBanking,
        PaymentMethod::Neft,
    ];

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_lowercase().replace([' ', '-', '_'], "").as_str() {
            "upi" => Some(PaymentMethod::Upi),
            "card" | "creditcard" | "debitcard" => Some(PaymentMethod::Card),
            "netbanking" => Some(PaymentMethod::NetBanking),
            "neft" | "rtgs" | "banktransfer" => Some(PaymentMethod::Neft),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
            PaymentMethod::NetBanking => "netbanking",
            PaymentMethod::Neft => "neft",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Credit / Debit Card",
            PaymentMethod::NetBanking => "Net Banking",
            PaymentMethod::Neft => "NEFT / RTGS",
        }
    }
}

/// Registered office for a verified company.
///
/// The first two characters of an Indian tax id encode the state; the
/// directory only knows a handful of them and falls back to a generic line.
pub fn registered_address(company: &str, tax_id: &str) -> String {
    let state_code: String = tax_id.chars().take(2).collect();
    let locality = match state_code.as_str() {
        "07" => "Connaught Place, New Delhi 110001",
        "27" => "Bandra Kurla Complex, Mumbai 400051",
        "29" => "Outer Ring Road, Bengaluru 560103",
        "33" => "Anna Salai, Chennai 600002",
        "36" => "HITEC City, Hyderabad 500081",
        _ => "Registered office on file, India",
    };
    format!("{company}, {locality}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occasion_keywords() {
        assert_eq!(Occasion::from_keyword("BIRTHDAY"), Some(Occasion::Birthday));
        assert_eq!(Occasion::from_keyword("thank you"), Some(Occasion::ThankYou));
        assert_eq!(Occasion::from_keyword("thank_you"), Some(Occasion::ThankYou));
        assert_eq!(Occasion::from_keyword("graduation"), None);
    }

    #[test]
    fn test_find_template_by_id_or_label() {
        assert_eq!(find_template("T2").map(|t| t.id), Some("t2"));
        assert_eq!(find_template("minimal ink").map(|t| t.id), Some("t4"));
        assert!(find_template("t9").is_none());
    }

    #[test]
    fn test_payment_method_aliases() {
        assert_eq!(PaymentMethod::from_keyword("Net Banking"), Some(PaymentMethod::NetBanking));
        assert_eq!(PaymentMethod::from_keyword("RTGS"), Some(PaymentMethod::Neft));
        assert_eq!(PaymentMethod::from_keyword("cash"), None);
    }

    #[test]
    fn test_registered_address_uses_state_code() {
        let addr = registered_address("Acme Traders", "29ABCDE1234F1Z5");
        assert!(addr.starts_with("Acme Traders, "));
        assert!(addr.contains("Bengaluru"));
        assert!(registered_address("X", "99ZZZ").contains("on file"));
    }
}

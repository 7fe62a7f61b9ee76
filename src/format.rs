//! Formatting helpers: currency, mock links and reference codes, discounts

/// Render an amount as Indian rupees with lakh grouping (`₹1,00,000`)
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 2 + 3);
    let len = digits.len();

    for (i, ch) in digits.chars().enumerate() {
        let remaining = len - i;
        if i > 0 && remaining >= 3 && (remaining == 3 || (remaining - 3) % 2 == 0) {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("₹{grouped}")
}

/// A missing amount renders as `₹0` rather than failing
pub fn format_optional_inr(amount: Option<u64>) -> String {
    format_inr(amount.unwrap_or(0))
}

pub fn gift_link(domain: &str, token: &str) -> String {
    format!("{domain}/gift/{token}")
}

pub fn report_link(domain: &str, token: &str) -> String {
    format!("{domain}/report/{token}")
}

pub fn invoice_link(domain: &str, invoice_number: &str) -> String {
    format!("{domain}/invoice/{invoice_number}.pdf")
}

/// `PI-7QX2K9AB` style codes
pub fn reference_code(prefix: &str, token: &str) -> String {
    format!("{prefix}-{}", token.to_uppercase())
}

/// Flat percentage discount rounded to the nearest whole rupee (half up)
pub fn discount(gross: u64, percent: u8) -> u64 {
    let scaled = u128::from(gross) * u128::from(percent);
    u64::try_from((scaled + 50) / 100).unwrap_or(u64::MAX)
}

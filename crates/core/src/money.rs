//! Money formatting for storefront money templates (`${{amount}}`).

use serde::{Deserialize, Serialize};

/// Default template used when the page does not declare one.
pub const DEFAULT_MONEY_FORMAT: &str = "${{amount}}";

/// Format minor units as a plain `0.00` amount.
///
/// This is the fallback used whenever a template cannot be applied.
pub fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// A storefront money template, e.g. `${{amount}}` or `{{amount_with_comma_separator}} €`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoneyFormat(String);

impl Default for MoneyFormat {
    fn default() -> Self {
        Self(DEFAULT_MONEY_FORMAT.to_string())
    }
}

impl MoneyFormat {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn template(&self) -> &str {
        &self.0
    }

    /// Render `cents` through the template.
    ///
    /// Falls back to [`format_cents`] when the template has no placeholder or
    /// names one we don't know.
    pub fn format(&self, cents: u64) -> String {
        let Some(start) = self.0.find("{{") else {
            return format_cents(cents);
        };
        let Some(len) = self.0[start + 2..].find("}}") else {
            return format_cents(cents);
        };
        let end = start + 2 + len;
        let Some(amount) = render_placeholder(self.0[start + 2..end].trim(), cents) else {
            return format_cents(cents);
        };

        let mut out = String::with_capacity(self.0.len() + amount.len());
        out.push_str(&self.0[..start]);
        out.push_str(&amount);
        out.push_str(&self.0[end + 2..]);
        out
    }
}

fn render_placeholder(name: &str, cents: u64) -> Option<String> {
    let rendered = match name {
        "amount" => with_delimiters(cents, 2, ',', '.'),
        "amount_no_decimals" => with_delimiters(cents, 0, ',', '.'),
        "amount_with_comma_separator" => with_delimiters(cents, 2, '.', ','),
        "amount_no_decimals_with_comma_separator" => with_delimiters(cents, 0, '.', ','),
        "amount_with_apostrophe_separator" => with_delimiters(cents, 2, '\'', '.'),
        "amount_no_decimals_with_space_separator" => with_delimiters(cents, 0, ' ', ','),
        "amount_with_space_separator" => with_delimiters(cents, 2, ' ', ','),
        "amount_with_period_and_space_separator" => with_delimiters(cents, 2, ' ', '.'),
        _ => return None,
    };
    Some(rendered)
}

fn with_delimiters(cents: u64, precision: u8, thousands: char, decimal: char) -> String {
    let (units, fraction) = if precision == 0 {
        // Round half up to whole units.
        (cents.saturating_add(50) / 100, None)
    } else {
        (cents / 100, Some(cents % 100))
    };

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(thousands);
        }
        grouped.push(c);
    }

    match fraction {
        Some(f) => format!("{grouped}{decimal}{f:02}"),
        None => grouped,
    }
}

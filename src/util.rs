//! Misc small formatting helpers shared across modules.

/// Format a monetary amount with thousands separators and two decimals,
/// e.g. `1234567.5` -> `"1,234,567.50"`.
pub fn format_amount(value: f64) -> String {
    let negative = value.is_sign_negative() && value != 0.0;
    let abs = value.abs();
    let mut whole = abs.trunc() as i64;
    let mut cents = (abs.fract() * 100.0).round() as i64;
    if cents >= 100 {
        whole += 1;
        cents -= 100;
    }

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{cents:02}")
}

/// Escape the characters Telegram's HTML parse mode treats as markup.
/// Lot titles and descriptions are user-supplied and must never break the message.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Mask a bidder's username for public display: keep the first three
/// characters, hide the rest. `"champion"` -> `"@cha**"`.
pub fn mask_username(username: &str) -> String {
    let prefix: String = username.chars().take(3).collect();
    format!("@{prefix}**")
}

/// Same masking for a first name (no `@` prefix).
pub fn mask_first_name(first_name: &str) -> String {
    let prefix: String = first_name.chars().take(3).collect();
    format!("{prefix}**")
}

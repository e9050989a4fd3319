//! Number and date formatting for labels and tooltips

use chrono::NaiveDate;

/// Integer with thousands separators: `1234567.8` -> `"1,234,568"`.
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 {
        out.insert(0, '-');
    }
    out
}

/// Ratio as a percentage with `decimals` places: `0.8732` -> `"87.3%"`.
pub fn percent(ratio: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, ratio * 100.0)
}

pub fn price(value: f64) -> String {
    if value <= 0.0 {
        "Free to Play".to_string()
    } else {
        format!("${value:.2}")
    }
}

/// Dollar amount with an SI suffix: `2_500_000` -> `"$2.5M"`.
pub fn revenue(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "k")
    } else {
        (value, "")
    };
    let text = format!("{scaled:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("${text}{suffix}")
}

/// "87.3% Positive (1,234 reviews)", or "No reviews".
pub fn review_summary(positive: f64, negative: f64) -> String {
    let total = positive + negative;
    if total <= 0.0 {
        return "No reviews".to_string();
    }
    format!("{} Positive ({} reviews)", percent(positive / total, 1), thousands(total))
}

pub fn long_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

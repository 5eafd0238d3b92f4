//! Display helpers for the dashboard.

/// Compresses large magnitudes: `1234567.0` -> `"1.23M"`.
pub fn format_compact(num: f64) -> String {
    if num >= 1e9 {
        format!("{:.2}B", num / 1e9)
    } else if num >= 1e6 {
        format!("{:.2}M", num / 1e6)
    } else if num >= 1e3 {
        format!("{:.2}K", num / 1e3)
    } else {
        format!("{:.2}", num)
    }
}

fn trim_fraction(formatted: &str) -> &str {
    if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted
    }
}

/// Drops trailing zero fractional digits: `120.50` -> `"120.5"`, `3.0` -> `"3"`.
pub fn trim_trailing_zeros(value: f64) -> String {
    // Display is the shortest exact form and never switches to exponent notation.
    let formatted = format!("{}", value);
    match trim_fraction(&formatted) {
        "-0" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Thousands separators with at most three fractional digits.
pub fn with_thousands(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    let trimmed = trim_fraction(&formatted);
    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) if rest != "0" => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", trimmed),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// `+1.23%` for gains, `-4.50%` for losses.
pub fn format_change(change: f64) -> String {
    if change > 0.0 {
        format!("+{:.2}%", change)
    } else {
        format!("{:.2}%", change)
    }
}

pub fn format_floor(floor: Option<f64>) -> String {
    match floor {
        Some(price) if price != 0.0 => format!("{} sats", trim_trailing_zeros(price)),
        _ => "-".to_string(),
    }
}

/// Depth cell: `-` when unset or zero, `high` at the ceiling, otherwise the
/// value rounded up to two decimals.
pub fn format_depth(value: Option<f64>, cap: f64) -> String {
    match value {
        Some(v) if v != 0.0 => {
            if v >= cap {
                "high".to_string()
            } else {
                trim_trailing_zeros((v * 100.0).ceil() / 100.0)
            }
        }
        _ => "-".to_string(),
    }
}

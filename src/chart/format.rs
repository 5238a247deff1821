//! Number formatting for axes and annotations.

/// Throughput style: "1.2M", "35K", "950".
pub fn format_ops(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.0}K", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

/// Compact display of a value of any magnitude.
pub fn format_value(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e3 {
        format_ops(value)
    } else if abs >= 100. || abs == 0. {
        format!("{value:.0}")
    } else if abs >= 1. {
        format!("{value:.1}")
    } else {
        format!("{value:.3}")
    }
}

/// "2.00x"
pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}x")
}

/// Thousands separators, no decimals: "1,234,567".
pub fn format_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut out = String::new();
    for (i, c) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0. && rounded != "0" {
        out.insert(0, '-');
    }
    out
}

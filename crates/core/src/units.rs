//! Value formatting helpers shared by sensors

use crate::constants::{BINARY_STEP, BYTE_UNITS, DECIMAL_STEP};

/// Format a byte count (or rate) with SI steps of 1000, two decimals.
///
/// `1500.0` becomes `"1.50 KB"`, `12.0` becomes `"12.00 B"`.
pub fn bytes_to_human(num: f64) -> String {
    let mut num = num;
    for unit in BYTE_UNITS {
        if num.abs() < DECIMAL_STEP {
            return format!("{:3.2} {}", num, unit);
        }
        num /= DECIMAL_STEP;
    }
    format!("{:.2} YB", num)
}

/// Format a byte count with binary steps of 1024.
///
/// Plain bytes are printed as integers (`"512 B"`); larger units are rounded
/// to two decimals and keep at least one fractional digit (`"3.0 GB"`,
/// `"12.35 GB"`).
pub fn format_binary_size(bytes: u64) -> String {
    if (bytes as f64) < BINARY_STEP {
        return format!("{} {}", bytes, BYTE_UNITS[0]);
    }

    let mut value = bytes as f64;
    for unit in BYTE_UNITS {
        if value < BINARY_STEP {
            let rounded = (value * 100.0).round() / 100.0;
            return if rounded.fract() == 0.0 {
                format!("{:.1} {}", rounded, unit)
            } else {
                format!("{} {}", rounded, unit)
            };
        }
        value /= BINARY_STEP;
    }
    format!("{:.2} YB", value)
}

/// Percentage with no decimals, zero-padded to two digits: `7.2` -> `"07%"`
pub fn format_percent(value: f64) -> String {
    format!("{:02.0}%", value)
}

/// Temperature in degrees Celsius, zero-padded to two digits
pub fn format_celsius(value: f64) -> String {
    format!("{:02.0}\u{00B0}C", value)
}

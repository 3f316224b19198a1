pub fn format_decimal(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn format_currency(amount: Option<f64>, currency: Option<&str>) -> String {
    match amount {
        Some(amount) => match currency {
            Some(code) if !code.is_empty() => format!("{} {}", format_decimal(amount), code),
            _ => format_decimal(amount),
        },
        None => "-".to_string(),
    }
}

// Quantities are decimals on the wire but almost always whole numbers in
// practice; keep whole values short.
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_includes_code_when_present() {
        assert_eq!(format_currency(Some(24.5), Some("USD")), "24.50 USD");
        assert_eq!(format_currency(Some(24.5), None), "24.50");
        assert_eq!(format_currency(Some(24.5), Some("")), "24.50");
        assert_eq!(format_currency(None, Some("USD")), "-");
    }

    #[test]
    fn quantities_drop_trailing_fraction() {
        assert_eq!(format_quantity(3.0), "3");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(format_quantity(0.0), "0");
    }
}

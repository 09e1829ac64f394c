/// Currency conversions for the Stripe boundary.
///
/// Amounts cross the payment gateway in minor units (cents); everywhere else
/// in the application they are major units (dollars).

/// Convert dollars to cents (multiply by 100)
pub fn dollars_to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

/// Convert cents to dollars (divide by 100)
pub fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Format cents as a dollar string with 2 decimal places
pub fn format_cents_as_dollars(cents: i64) -> String {
    format!("${:.2}", cents_to_dollars(cents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollars_to_cents() {
        assert_eq!(dollars_to_cents(100.0), 10000);
        assert_eq!(dollars_to_cents(0.50), 50);
        assert_eq!(dollars_to_cents(9.99), 999);
    }

    #[test]
    fn test_cents_to_dollars() {
        assert_eq!(cents_to_dollars(10000), 100.0);
        assert_eq!(cents_to_dollars(50), 0.50);
        assert_eq!(cents_to_dollars(999), 9.99);
    }

    #[test]
    fn test_format_cents_as_dollars() {
        assert_eq!(format_cents_as_dollars(10000), "$100.00");
        assert_eq!(format_cents_as_dollars(50), "$0.50");
        assert_eq!(format_cents_as_dollars(999), "$9.99");
    }
}

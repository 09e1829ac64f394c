/// Pure input checks for the purchase/referral workflow. No side effects;
/// callers map failures onto their own error types.

pub const MAX_PURCHASE_AMOUNT: f64 = 1_000_000.0;
pub const MAX_PRODUCT_ID_LENGTH: usize = 100;
pub const REFERRAL_CODE_PREFIX: &str = "REF";

/// Purchase amounts must be finite, positive and below the configured ceiling.
pub fn validate_amount(amount: f64) -> Result<(), String> {
    if !amount.is_finite() {
        return Err("Amount must be a valid number".to_string());
    }
    if amount <= 0.0 {
        return Err("Amount must be greater than 0".to_string());
    }
    if amount > MAX_PURCHASE_AMOUNT {
        return Err("Amount cannot exceed 1,000,000".to_string());
    }
    Ok(())
}

pub fn validate_product_id(product_id: &str) -> Result<(), String> {
    if product_id.trim().is_empty() {
        return Err("Product ID cannot be empty".to_string());
    }
    if product_id.len() > MAX_PRODUCT_ID_LENGTH {
        return Err("Product ID is too long".to_string());
    }
    Ok(())
}

pub fn validate_referral_code(referral_code: &str) -> Result<(), String> {
    if referral_code.trim().is_empty() {
        return Err("Referral code cannot be empty".to_string());
    }
    if !referral_code.starts_with(REFERRAL_CODE_PREFIX) {
        return Err("Invalid referral code format".to_string());
    }
    Ok(())
}

/// Clamp pagination parameters server-side: page >= 1, 1 <= limit <= 100.
pub fn clamp_pagination(page: Option<usize>, limit: Option<usize>) -> (u32, usize) {
    let page = page.unwrap_or(1).max(1) as u32;
    let limit = limit.unwrap_or(10).clamp(1, 100);
    (page, limit)
}

pub fn sanitize_string(input: &str) -> String {
    input.trim().replace(['<', '>'], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(9.99).is_ok());
        assert!(validate_amount(1_000_000.0).is_ok());
        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-5.0).is_err());
        assert!(validate_amount(1_000_000.01).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("PROD_123").is_ok());
        assert!(validate_product_id("").is_err());
        assert!(validate_product_id("   ").is_err());
        assert!(validate_product_id(&"x".repeat(101)).is_err());
        assert!(validate_product_id(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_referral_code() {
        assert!(validate_referral_code("REFABC123").is_ok());
        assert!(validate_referral_code("").is_err());
        assert!(validate_referral_code("ABC123").is_err());
    }

    #[test]
    fn test_clamp_pagination() {
        assert_eq!(clamp_pagination(None, None), (1, 10));
        assert_eq!(clamp_pagination(Some(0), Some(0)), (1, 1));
        assert_eq!(clamp_pagination(Some(3), Some(25)), (3, 25));
        assert_eq!(clamp_pagination(Some(1), Some(500)), (1, 100));
    }

    #[test]
    fn test_sanitize_string() {
        assert_eq!(sanitize_string("  hello  "), "hello");
        assert_eq!(sanitize_string("<b>bold</b>"), "bboldb");
    }
}

use rand::{distr::Alphanumeric, Rng};

use crate::utils::validation::REFERRAL_CODE_PREFIX;

pub fn generate_referral_code() -> String {
    let suffix = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();

    format!("{}{}", REFERRAL_CODE_PREFIX, suffix)
}

pub fn generate_referral_link(base_url: &str, code: &str) -> String {
    format!("{}/register?r={}", base_url, code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referral_code_shape() {
        let code = generate_referral_code();
        assert_eq!(code.len(), 11);
        assert!(code.starts_with("REF"));
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(code, code.to_uppercase());
    }

    #[test]
    fn test_referral_codes_vary() {
        let a = generate_referral_code();
        let b = generate_referral_code();
        assert_ne!(a, b);
    }

    #[test]
    fn test_referral_link() {
        assert_eq!(
            generate_referral_link("https://neomarket.app", "REFABC12345"),
            "https://neomarket.app/register?r=REFABC12345"
        );
    }
}

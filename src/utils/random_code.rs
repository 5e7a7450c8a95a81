use rand::Rng;
use rand::distr::Alphanumeric;

/// 随机字母数字串，用于初始管理员密码和支付流水号
pub fn generate_random_code(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// 支付流水号：PAY-时间戳-随机串
pub fn generate_payment_reference() -> String {
    format!(
        "PAY-{}-{}",
        chrono::Utc::now().format("%Y%m%d%H%M%S"),
        generate_random_code(8).to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_code() {
        let code = generate_random_code(16);
        assert_eq!(code.len(), 16);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(code, generate_random_code(16));
    }

    #[test]
    fn test_payment_reference_shape() {
        let reference = generate_payment_reference();
        assert!(reference.starts_with("PAY-"));
        assert_eq!(reference.split('-').count(), 3);
    }
}

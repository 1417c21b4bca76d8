use rust_decimal::Decimal;

/// 필수 문자열 정리 (앞뒤 공백 제거, 빈 값/길이 초과 거부)
/// Trim a required text field and enforce a maximum length
///
/// 에러 메시지는 그대로 400 응답 본문에 들어갑니다.
pub fn required_text(raw: &str, field: &str, max_len: usize) -> Result<String, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    if value.chars().count() > max_len {
        return Err(format!("{} must be at most {} characters", field, max_len));
    }
    Ok(value.to_string())
}

/// 금액 절댓값 상한 (10^15)
/// Largest accepted absolute money amount
pub const MAX_MONEY_ABS: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// 금액 범위 확인 (±10^15)
/// Reject money amounts beyond `MAX_MONEY_ABS`
pub fn money_in_range(value: Decimal, field: &str) -> Result<Decimal, String> {
    if value.abs() > MAX_MONEY_ABS {
        return Err(format!("{} must be between -{} and {}", field, MAX_MONEY_ABS, MAX_MONEY_ABS));
    }
    Ok(value)
}

/// 이메일 정규화 (소문자, 공백 제거) + 최소 형식 확인
/// Normalize an email address
pub fn normalize_email(raw: &str) -> Result<String, String> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(format!("Invalid email address: {}", raw.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("  Groceries ", "name", 10).unwrap(), "Groceries");
        assert!(required_text("   ", "name", 10).is_err());
        assert!(required_text("abcdefghijk", "name", 10).is_err());
    }

    #[test]
    fn test_max_money_is_ten_to_the_fifteenth() {
        assert_eq!(MAX_MONEY_ABS, Decimal::from(1_000_000_000_000_000i64));
    }

    #[test]
    fn test_money_in_range() {
        assert_eq!(money_in_range(Decimal::new(-12_345, 2), "amount").unwrap(), Decimal::new(-12_345, 2));
        assert!(money_in_range(MAX_MONEY_ABS, "amount").is_ok());
        assert!(money_in_range(-MAX_MONEY_ABS, "amount").is_ok());
        assert!(money_in_range(MAX_MONEY_ABS + Decimal::ONE, "amount").is_err());
        assert!(money_in_range(Decimal::MIN, "balance").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" Alice@Example.COM ").unwrap(), "alice@example.com");
        assert!(normalize_email("alice").is_err());
        assert!(normalize_email("@example.com").is_err());
    }
}

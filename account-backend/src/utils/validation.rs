use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

/// プラン識別子用正規表現（小文字英数字、ハイフン、アンダースコアのみ）
pub static PLAN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("valid plan regex"));

/// プラン識別子バリデーション
pub fn validate_plan(plan: &str) -> Result<(), ValidationError> {
    if PLAN_REGEX.is_match(plan) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_plan");
        error.message = Some("The plan format is invalid.".into());
        Err(error)
    }
}

/// 空白のみの文字列を拒否
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("The field must not be blank.".into());
        Err(error)
    } else {
        Ok(())
    }
}

/// 前後の空白を除去してデシリアライズ（検証前に適用される）
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

pub fn trimmed_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|value| value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_regex() {
        assert!(PLAN_REGEX.is_match("pro"));
        assert!(PLAN_REGEX.is_match("price_monthly-2024"));
        assert!(!PLAN_REGEX.is_match("Pro"));
        assert!(!PLAN_REGEX.is_match("-pro"));
        assert!(!PLAN_REGEX.is_match("pro plan"));
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Jane").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }
}

// src/utils/token.rs

use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// 平文トークンのシークレット部分の長さ
pub const SECRET_LENGTH: usize = 40;

/// ランダムな英数字シークレットを生成
pub fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LENGTH)
        .map(char::from)
        .collect()
}

/// トークンをハッシュ化（保存・照合用）
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// 比較時間が一致位置に依存しない文字列比較
pub fn constant_time_eq(provided: &str, expected: &str) -> bool {
    let (a, b) = (provided.as_bytes(), expected.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// クライアントへ返す平文トークン `{id}|{secret}`
pub fn format_plain_text_token(id: Uuid, secret: &str) -> String {
    format!("{}|{}", id, secret)
}

/// 平文トークンの分解結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlainTextToken<'a> {
    /// `{id}|{secret}` 形式
    WithId { id: Uuid, secret: &'a str },
    /// ID なしのシークレットのみ
    SecretOnly(&'a str),
}

/// 平文トークンを分解する。ID部分がUUIDとして不正な場合は None
pub fn parse_plain_text_token(token: &str) -> Option<PlainTextToken<'_>> {
    match token.split_once('|') {
        Some((id, secret)) => {
            let id = Uuid::parse_str(id).ok()?;
            if secret.is_empty() {
                return None;
            }
            Some(PlainTextToken::WithId { id, secret })
        }
        None if token.is_empty() => None,
        None => Some(PlainTextToken::SecretOnly(token)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret() {
        let a = generate_secret();
        let b = generate_secret();
        assert_eq!(a.len(), SECRET_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_token_is_sha256_hex() {
        let hash = hash_token("secret");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("secret", "secret"));
        assert!(!constant_time_eq("secret", "secreT"));
        assert!(!constant_time_eq("secret", "secret2"));
        assert!(!constant_time_eq("", "secret"));
        assert!(constant_time_eq(&hash_token("abc"), &hash_token("abc")));
        assert!(!constant_time_eq(&hash_token("abc"), &hash_token("abd")));
    }

    #[test]
    fn test_parse_plain_text_token() {
        let id = Uuid::new_v4();
        let plain = format_plain_text_token(id, "abc");
        assert_eq!(
            parse_plain_text_token(&plain),
            Some(PlainTextToken::WithId { id, secret: "abc" })
        );
        assert_eq!(
            parse_plain_text_token("abc"),
            Some(PlainTextToken::SecretOnly("abc"))
        );
        assert_eq!(parse_plain_text_token("not-a-uuid|abc"), None);
        assert_eq!(parse_plain_text_token(&format!("{}|", id)), None);
        assert_eq!(parse_plain_text_token(""), None);
    }
}

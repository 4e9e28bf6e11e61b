// src/utils/password.rs

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::env;
use thiserror::Error;

/// パスワード関連のエラー
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingError(#[from] argon2::password_hash::Error),

    #[error("Argon2 parameter error: {0}")]
    Argon2Error(#[from] argon2::Error),

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Password configuration error: {0}")]
    ConfigurationError(String),
}

/// パスワード強度要件
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// 最小文字数
    pub min_length: usize,
    /// 最大文字数
    pub max_length: usize,
    /// 英字と数字の両方が必要
    pub require_letters_and_digits: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            require_letters_and_digits: false,
        }
    }
}

impl PasswordPolicy {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_length: env_or("PASSWORD_MIN_LENGTH", defaults.min_length),
            max_length: env_or("PASSWORD_MAX_LENGTH", defaults.max_length),
            require_letters_and_digits: env_or(
                "PASSWORD_REQUIRE_LETTERS_AND_DIGITS",
                defaults.require_letters_and_digits,
            ),
        }
    }

    /// パスワードポリシーを検証
    pub fn validate(&self) -> Result<(), PasswordError> {
        if self.min_length < 4 {
            return Err(PasswordError::ConfigurationError(
                "Minimum password length must be at least 4".to_string(),
            ));
        }

        if self.max_length < self.min_length {
            return Err(PasswordError::ConfigurationError(
                "Maximum password length must be greater than minimum".to_string(),
            ));
        }

        Ok(())
    }
}

/// Argon2 設定
#[derive(Debug, Clone)]
pub struct Argon2Config {
    /// メモリコスト（KB）
    pub memory_cost: u32,
    /// 時間コスト（反復回数）
    pub time_cost: u32,
    /// 並列度
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 19456, // 19MB
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Config {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            memory_cost: env_or("ARGON2_MEMORY_COST", defaults.memory_cost),
            time_cost: env_or("ARGON2_TIME_COST", defaults.time_cost),
            parallelism: env_or("ARGON2_PARALLELISM", defaults.parallelism),
        }
    }

    /// テスト用の軽量設定
    pub fn for_testing() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// パスワードハッシュマネージャー
pub struct PasswordManager {
    argon2: Argon2<'static>,
    policy: PasswordPolicy,
}

impl PasswordManager {
    /// 新しいPasswordManagerを作成
    pub fn new(argon2_config: Argon2Config, policy: PasswordPolicy) -> Result<Self, PasswordError> {
        policy.validate()?;

        let argon2 = Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            argon2::Params::new(
                argon2_config.memory_cost,
                argon2_config.time_cost,
                argon2_config.parallelism,
                None,
            )
            .map_err(PasswordError::Argon2Error)?,
        );

        Ok(Self { argon2, policy })
    }

    /// 環境変数から設定を読み込んでPasswordManagerを作成
    pub fn from_env() -> Result<Self, PasswordError> {
        Self::new(Argon2Config::from_env(), PasswordPolicy::from_env())
    }

    /// パスワードをハッシュ化
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.validate_password_strength(password)?;

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(PasswordError::HashingError)?;

        Ok(password_hash.to_string())
    }

    /// パスワードを検証
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(PasswordError::HashingError)?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::HashingError(e)),
        }
    }

    /// パスワード強度をチェック
    pub fn validate_password_strength(&self, password: &str) -> Result<(), PasswordError> {
        let length = password.chars().count();

        if length < self.policy.min_length {
            return Err(PasswordError::WeakPassword(format!(
                "The password must be at least {} characters.",
                self.policy.min_length
            )));
        }

        if length > self.policy.max_length {
            return Err(PasswordError::WeakPassword(format!(
                "The password may not be greater than {} characters.",
                self.policy.max_length
            )));
        }

        if self.policy.require_letters_and_digits
            && !(password.chars().any(|c| c.is_alphabetic())
                && password.chars().any(|c| c.is_ascii_digit()))
        {
            return Err(PasswordError::WeakPassword(
                "The password must contain at least one letter and one number.".to_string(),
            ));
        }

        Ok(())
    }
}

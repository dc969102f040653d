// 入力ドラフトのバリデーション

use super::error::{ProcessingError, ProcessingResult};
use super::types::ItemDraft;
use regex::Regex;
use std::sync::LazyLock;

const EMAIL_REGEX: &str = concat!(
    r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+",
    r"@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?",
    r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$",
);

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_REGEX).expect("valid email regex"));

/// メールアドレスの構文チェック
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

impl ItemDraft {
    /// ドラフトを検証し、正規化済みのドラフトを返す
    ///
    /// 空白のみのメールアドレスは未指定として扱う。
    pub fn validate(mut self) -> ProcessingResult<Self> {
        if self.name.trim().is_empty() {
            return Err(ProcessingError::validation("name", "名前は必須です"));
        }

        self.email = match self.email.take() {
            Some(email) if email.trim().is_empty() => None,
            Some(email) if !is_valid_email(email.trim()) => {
                return Err(ProcessingError::validation(
                    "email",
                    format!("メールアドレスの形式が不正です: {email}"),
                ));
            }
            Some(email) => Some(email.trim().to_string()),
            None => None,
        };

        Ok(self)
    }
}

//! Session token value object.

use std::fmt;

/// Opaque Discord session token with masking.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    value: String,
}

impl AuthToken {
    /// Creates a token from raw text.
    ///
    /// Surrounding whitespace is dropped. Returns `None` for empty input or
    /// values that could not be sent as a header.
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let value = value.as_ref().trim();

        if value.is_empty() || value.chars().any(char::is_control) {
            return None;
        }

        Some(Self {
            value: value.to_string(),
        })
    }

    /// Creates token without validation.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns token as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consumes token and returns inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.value
    }

    /// Returns masked token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        let len = self.value.chars().count();
        if len <= 10 {
            return "*".repeat(len);
        }

        let prefix: String = self.value.chars().take(4).collect();
        let suffix: String = self.value.chars().skip(len - 4).collect();
        format!("{prefix}...{suffix}")
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token() -> String {
        "MTIzNDU2Nzg5MDEyMzQ1Njc4OQ.XXXXXX.YYYYYYYYYYYYYYYYYYYYYYYYYYYY".to_string()
    }

    #[test]
    fn test_token_is_trimmed() {
        let token = AuthToken::new(format!("  {}\n", make_token())).unwrap();
        assert_eq!(token.as_str(), make_token());
    }

    #[test]
    fn test_short_opaque_token_accepted() {
        let token = AuthToken::new("mfa.abc");
        assert!(token.is_some());
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(AuthToken::new("").is_none());
        assert!(AuthToken::new("   \n").is_none());
    }

    #[test]
    fn test_token_with_inner_newline_rejected() {
        assert!(AuthToken::new("abc\ndef").is_none());
    }

    #[test]
    fn test_token_masking() {
        let token = AuthToken::new_unchecked(make_token());
        let masked = token.masked();

        assert!(masked.contains("..."));
        assert!(!masked.contains(&make_token()));
    }

    #[test]
    fn test_short_token_fully_masked() {
        let token = AuthToken::new_unchecked("secret");
        assert_eq!(token.masked(), "******");
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = AuthToken::new_unchecked(make_token());
        let debug_output = format!("{token:?}");

        assert!(!debug_output.contains(&make_token()));
    }
}

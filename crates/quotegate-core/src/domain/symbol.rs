use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 5;

/// Normalized ticker: 1-5 uppercase ASCII letters.
///
/// Format only; allow-list membership is checked by [`crate::SymbolValidator`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        for (index, ch) in normalized.chars().enumerate() {
            if !ch.is_ascii_uppercase() {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_symbol() {
        let parsed = Symbol::parse(" aapl ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "AAPL");
    }

    #[test]
    fn rejects_digits_and_punctuation() {
        let err = Symbol::parse("BRK.B").expect_err("must fail");
        assert_eq!(err, ValidationError::SymbolInvalidChar { ch: '.', index: 3 });

        let err = Symbol::parse("1AAP").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidChar { index: 0, .. }));
    }

    #[test]
    fn rejects_symbols_longer_than_five_letters() {
        let err = Symbol::parse("GOOGLE").expect_err("must fail");
        assert_eq!(err, ValidationError::SymbolTooLong { len: 6, max: 5 });
    }

    #[test]
    fn rejects_non_ascii_letters() {
        let err = Symbol::parse("ÄPL").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidChar { index: 0, .. }));
    }
}

//! Symbol format and allow-list check.

use std::collections::BTreeSet;

use crate::{Symbol, ValidationError};

/// Symbols served when no allow-list is configured.
pub const DEFAULT_ALLOW_LIST: &[&str] = &[
    "AAPL", "ADBE", "AMD", "AMZN", "BA", "BAC", "CRM", "CSCO", "DIS", "GOOG", "GOOGL", "HD", "IBM",
    "INTC", "JNJ", "JPM", "KO", "MA", "META", "MSFT", "NFLX", "NKE", "NVDA", "ORCL", "PEP", "PFE",
    "PG", "QQQ", "SPY", "T", "TSLA", "UNH", "V", "VOO", "VZ", "WMT",
];

/// Pure predicate deciding which symbols the gateway is willing to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolValidator {
    allowed: BTreeSet<Symbol>,
}

impl Default for SymbolValidator {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOW_LIST.iter().copied())
    }
}

impl SymbolValidator {
    /// Builds a validator from an allow-list. Entries that are not well-formed
    /// symbols can never match a request and are dropped.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = symbols
            .into_iter()
            .filter_map(|symbol| Symbol::parse(symbol.as_ref()).ok())
            .collect();
        Self { allowed }
    }

    /// Normalizes `input` and checks format plus allow-list membership.
    pub fn validate(&self, input: &str) -> Result<Symbol, ValidationError> {
        let symbol = Symbol::parse(input)?;
        if !self.allowed.contains(&symbol) {
            return Err(ValidationError::SymbolNotSupported {
                symbol: symbol.into(),
            });
        }
        Ok(symbol)
    }

    pub fn is_valid(&self, input: &str) -> bool {
        self.validate(input).is_ok()
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

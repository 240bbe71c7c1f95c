//! Enabled currency state
//!
//! Owns the ordered list of enabled currencies. Callers get a `&mut AppState`
//! handle instead of reaching for a global container.

use thiserror::Error;

/// Currencies that can never be disabled.
pub const ALWAYS_ENABLED_CURRENCIES: &[&str] = &["KMD", "CHIPS"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("{0} is always enabled and cannot be disabled")]
    AlwaysEnabled(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    enabled_coins: Vec<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl AppState {
    /// Start from `initial`, dropping duplicates and adding any missing
    /// always-enabled currency in front.
    pub fn new<S: Into<String>>(initial: impl IntoIterator<Item = S>) -> Self {
        let mut enabled_coins: Vec<String> = ALWAYS_ENABLED_CURRENCIES
            .iter()
            .map(|s| s.to_string())
            .collect();

        for symbol in initial {
            let symbol = symbol.into();
            if !enabled_coins.contains(&symbol) {
                enabled_coins.push(symbol);
            }
        }

        Self { enabled_coins }
    }

    /// Restore from the JSON array written by [`AppState::to_json`].
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let coins: Vec<String> = serde_json::from_str(raw)?;
        Ok(Self::new(coins))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.enabled_coins)
    }

    pub fn enabled_coins(&self) -> &[String] {
        &self.enabled_coins
    }

    pub fn is_enabled(&self, symbol: &str) -> bool {
        self.enabled_coins.iter().any(|s| s == symbol)
    }

    /// Append `symbol` unless already enabled.
    pub fn enable_currency(&mut self, symbol: &str) -> &[String] {
        if !self.is_enabled(symbol) {
            tracing::info!("Enabling currency {}", symbol);
            self.enabled_coins.push(symbol.to_string());
        }
        &self.enabled_coins
    }

    /// Remove `symbol`. Disabling a currency that is not enabled is a no-op.
    pub fn disable_coin(&mut self, symbol: &str) -> Result<&[String], StateError> {
        if ALWAYS_ENABLED_CURRENCIES.iter().any(|s| *s == symbol) {
            return Err(StateError::AlwaysEnabled(symbol.to_string()));
        }

        if let Some(index) = self.enabled_coins.iter().position(|s| s == symbol) {
            tracing::info!("Disabling currency {}", symbol);
            self.enabled_coins.remove(index);
        }
        Ok(&self.enabled_coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_always_enabled() {
        let state = AppState::new(["BTC", "KMD", "BTC"]);
        assert_eq!(state.enabled_coins(), ["KMD", "CHIPS", "BTC"]);
    }

    #[test]
    fn test_enable_is_idempotent() {
        let mut state = AppState::default();
        assert_eq!(state.enable_currency("LTC"), ["KMD", "CHIPS", "LTC"]);
        assert_eq!(state.enable_currency("LTC"), ["KMD", "CHIPS", "LTC"]);
    }

    #[test]
    fn test_disable_removes_symbol() {
        let mut state = AppState::new(["BTC", "ETH"]);
        assert_eq!(state.disable_coin("BTC").unwrap(), ["KMD", "CHIPS", "ETH"]);
        // Not enabled: nothing to do
        assert_eq!(state.disable_coin("BTC").unwrap(), ["KMD", "CHIPS", "ETH"]);
    }

    #[test]
    fn test_disable_always_enabled_rejected() {
        let mut state = AppState::new(["BTC"]);
        assert_eq!(
            state.disable_coin("KMD"),
            Err(StateError::AlwaysEnabled("KMD".to_string()))
        );
        assert!(state.is_enabled("KMD"));
    }

    #[test]
    fn test_json_restore_reinserts_protected() {
        let state = AppState::from_json(r#"["BTC","ETH"]"#).unwrap();
        assert_eq!(state.enabled_coins(), ["KMD", "CHIPS", "BTC", "ETH"]);

        let again = AppState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(again, state);

        assert!(AppState::from_json("{").is_err());
    }
}

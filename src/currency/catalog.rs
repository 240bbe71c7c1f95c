//! Supported currency catalog
//!
//! Static list of the currencies the marketmaker can trade, plus the option
//! list the enabled-currency selector is built from.

use crate::currency::state::ALWAYS_ENABLED_CURRENCIES;

/// A supported currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub symbol: &'static str,
    pub name: &'static str,
}

const SUPPORTED_CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo { symbol: "BTC", name: "Bitcoin" },
    CurrencyInfo { symbol: "BCH", name: "Bitcoin Cash" },
    CurrencyInfo { symbol: "CHIPS", name: "Chips" },
    CurrencyInfo { symbol: "DASH", name: "Dash" },
    CurrencyInfo { symbol: "DGB", name: "DigiByte" },
    CurrencyInfo { symbol: "DOGE", name: "Dogecoin" },
    CurrencyInfo { symbol: "ETH", name: "Ethereum" },
    CurrencyInfo { symbol: "KMD", name: "Komodo" },
    CurrencyInfo { symbol: "LTC", name: "Litecoin" },
    CurrencyInfo { symbol: "MNZ", name: "Monaize" },
    CurrencyInfo { symbol: "QTUM", name: "Qtum" },
    CurrencyInfo { symbol: "SUPERNET", name: "SuperNET" },
    CurrencyInfo { symbol: "VTC", name: "Vertcoin" },
    CurrencyInfo { symbol: "ZEC", name: "Zcash" },
    CurrencyInfo { symbol: "PIZZA", name: "Pizza" },
    CurrencyInfo { symbol: "BEER", name: "Beer" },
];

/// Test currencies hidden from release builds.
pub const DEVELOPMENT_ONLY_CURRENCIES: &[&str] = &["PIZZA", "BEER"];

/// Read-only source of supported currencies.
pub trait CurrencyCatalog {
    fn currency_symbols(&self) -> Vec<&'static str>;

    fn currency_name(&self, symbol: &str) -> Option<&'static str>;
}

/// The built-in catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl CurrencyCatalog for StaticCatalog {
    fn currency_symbols(&self) -> Vec<&'static str> {
        SUPPORTED_CURRENCIES.iter().map(|c| c.symbol).collect()
    }

    fn currency_name(&self, symbol: &str) -> Option<&'static str> {
        SUPPORTED_CURRENCIES
            .iter()
            .find(|c| c.symbol == symbol)
            .map(|c| c.name)
    }
}

/// An entry of the enabled-currency multi-select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    /// Whether the user may remove this currency from the selection
    pub clearable: bool,
}

/// Build the selector options, dropping development-only currencies unless
/// `development_mode` is set.
pub fn currency_options(catalog: &impl CurrencyCatalog, development_mode: bool) -> Vec<SelectOption> {
    catalog
        .currency_symbols()
        .into_iter()
        .filter(|symbol| development_mode || !DEVELOPMENT_ONLY_CURRENCIES.contains(symbol))
        .map(|symbol| {
            let name = catalog.currency_name(symbol).unwrap_or(symbol);
            SelectOption {
                label: format!("{} ({})", name, symbol),
                value: symbol.to_string(),
                clearable: !ALWAYS_ENABLED_CURRENCIES.contains(&symbol),
            }
        })
        .collect()
}

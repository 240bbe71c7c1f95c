use crate::currency::catalog::{currency_options, CurrencyCatalog, SelectOption};
use crate::currency::reconcile::{reconcile, Action};
use crate::currency::state::{AppState, StateError};


/// One entry of the value a multi-select reports on change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedValue {
    pub value: String,
}

impl SelectedValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}


/// Enabled-currency multi-select.
#[derive(Debug, Clone)]
pub struct CurrencySelection {

    options: Vec<SelectOption>,
}

impl CurrencySelection {
    pub fn new(catalog: &impl CurrencyCatalog, development_mode: bool) -> Self {
        Self {
            options: currency_options(catalog, development_mode),
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Apply the complete new selection to `state`.
    ///
    /// Only one item is expected to change per call, see [`reconcile`].
    pub fn handle_select_change(
        &self,
        state: &mut AppState,
        selected: &[SelectedValue],
    ) -> Result<Action, StateError> {
        let new_selection: Vec<&str> = selected.iter().map(|s| s.value.as_str()).collect();
        let action = reconcile(state.enabled_coins(), &new_selection);

        match &action {
            Action::Enable(symbol) => {
                state.enable_currency(symbol);
            }
            Action::Disable(symbol) => {
                if let Err(e) = state.disable_coin(symbol) {
                    tracing::warn!("Ignoring selection change: {}", e);
                    return Err(e);
                }
            }
            Action::NoOp => {}
        }

        Ok(action)
    }
}

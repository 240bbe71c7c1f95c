//! Advanced settings form
//!
//! Headless state of the settings form. Edits show up in the field at once
//! and reach the config store through the debounced writer.

use crate::config::store::{ConfigStore, MARKETMAKER_URL_KEY};
use crate::persist::debounce::DebouncedWriter;
use crate::ui::validation::{is_valid_marketmaker_url, INVALID_URL_MESSAGE};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    MarketmakerUrl,
}

impl Field {
    /// Config key the field persists under.
    pub fn key(&self) -> &'static str {
        match self {
            Field::MarketmakerUrl => MARKETMAKER_URL_KEY,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            MARKETMAKER_URL_KEY => Some(Field::MarketmakerUrl),
            _ => None,
        }
    }
}


pub struct SettingsForm {

    marketmaker_url: String,

    writer: DebouncedWriter,
}

impl SettingsForm {
    /// Read the persisted field values once and take over `writer`.
    pub fn load(store: &dyn ConfigStore, writer: DebouncedWriter) -> Self {
        Self {
            marketmaker_url: store.get(MARKETMAKER_URL_KEY).unwrap_or_default(),
            writer,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::MarketmakerUrl => &self.marketmaker_url,
        }
    }

    pub fn marketmaker_url(&self) -> &str {
        &self.marketmaker_url
    }

    /// Keystroke handler: update the field now, persist later.
    pub fn handle_change(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::MarketmakerUrl => self.marketmaker_url = value.clone(),
        }
        self.writer.on_edit(field.key(), value);
    }

    /// Focus loss: an invalid URL is cleared, and the cleared value goes
    /// through the same debounced path as a keystroke.
    pub fn handle_blur(&mut self, field: Field) {
        match field {
            Field::MarketmakerUrl => {
                if !self.is_marketmaker_url_valid() {
                    tracing::info!("Clearing invalid marketmaker URL {:?}", self.marketmaker_url);
                    self.handle_change(field, "");
                }
            }
        }
    }

    pub fn is_marketmaker_url_valid(&self) -> bool {
        is_valid_marketmaker_url(&self.marketmaker_url)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        (!self.is_marketmaker_url_valid()).then_some(INVALID_URL_MESSAGE)
    }

    pub fn writer(&self) -> &DebouncedWriter {
        &self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::MemoryConfigStore;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::runtime::Handle;
    use tokio::time::sleep;

    const WINDOW: Duration = Duration::from_millis(500);

    fn form_with(store: Arc<MemoryConfigStore>) -> SettingsForm {
        let writer = DebouncedWriter::new(Handle::current(), store.clone(), WINDOW);
        SettingsForm::load(store.as_ref(), writer)
    }

    #[test]
    fn test_field_names() {
        assert_eq!(Field::from_name("marketmakerUrl"), Some(Field::MarketmakerUrl));
        assert_eq!(Field::from_name("nope"), None);
        assert_eq!(Field::MarketmakerUrl.key(), "marketmakerUrl");
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_reads_persisted_value() {
        let store = Arc::new(MemoryConfigStore::with_values([(
            MARKETMAKER_URL_KEY,
            "http://saved:7783",
        )]));
        let form = form_with(store);
        assert_eq!(form.marketmaker_url(), "http://saved:7783");
        assert_eq!(form.error_message(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_echoes_immediately_and_persists_later() {
        let store = Arc::new(MemoryConfigStore::new());
        let mut form = form_with(store.clone());

        form.handle_change(Field::MarketmakerUrl, "http://l");
        assert_eq!(form.marketmaker_url(), "http://l");
        assert_eq!(form.error_message(), Some("Invalid URL"));

        form.handle_change(Field::MarketmakerUrl, "http://localhost:7783");
        form.handle_blur(Field::MarketmakerUrl);
        assert_eq!(form.value(Field::MarketmakerUrl), "http://localhost:7783");
        assert_eq!(store.get(MARKETMAKER_URL_KEY), None);

        sleep(WINDOW + Duration::from_millis(10)).await;
        assert_eq!(
            store.get(MARKETMAKER_URL_KEY).as_deref(),
            Some("http://localhost:7783")
        );
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_blur_resets_and_persists_empty() {
        let store = Arc::new(MemoryConfigStore::with_values([(
            MARKETMAKER_URL_KEY,
            "http://old:7783",
        )]));
        let mut form = form_with(store.clone());

        form.handle_change(Field::MarketmakerUrl, "bad");
        form.handle_blur(Field::MarketmakerUrl);
        assert_eq!(form.marketmaker_url(), "");
        assert_eq!(form.error_message(), None);

        // Old value stays until the window passes
        assert_eq!(store.get(MARKETMAKER_URL_KEY).as_deref(), Some("http://old:7783"));

        sleep(WINDOW + Duration::from_millis(10)).await;
        assert_eq!(store.get(MARKETMAKER_URL_KEY).as_deref(), Some(""));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_blur_does_not_write() {
        let store = Arc::new(MemoryConfigStore::new());
        let mut form = form_with(store.clone());

        form.handle_blur(Field::MarketmakerUrl);
        sleep(WINDOW * 2).await;
        assert_eq!(store.write_count(), 0);
        assert_eq!(form.writer().pending_count(), 0);
    }
}

//! Settings application driver
//!
//! Owns the enabled-currency state, the config store and the settings form,
//! and maps line commands onto them the way the settings view maps widget
//! events.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::config::settings::Settings;
use crate::config::store::{ConfigStore, ENABLED_COINS_KEY};
use crate::currency::catalog::StaticCatalog;
use crate::currency::reconcile::{reconcile, Action};
use crate::currency::state::AppState;
use crate::persist::debounce::{DebouncedWriter, PersistEvent};
use crate::ui::currency_selection::{CurrencySelection, SelectedValue};
use crate::ui::settings_form::{Field, SettingsForm};


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Full new selection, as the multi-select reports it
    Select(Vec<String>),
    Enable(String),
    Disable(String),
    /// Marketmaker URL keystroke
    Url(String),
    Blur,
    Show,
    Options,
    Flush,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (verb, arg) = match line.trim_start().split_once(' ') {
            Some((verb, arg)) => (verb, arg),
            None => (line.trim_start(), ""),
        };

        let symbol = |arg: &str| {
            let symbol = arg.trim().to_uppercase();
            if symbol.is_empty() {
                Err(format!("{} needs a currency symbol", verb))
            } else {
                Ok(symbol)
            }
        };

        match verb {
            "select" => Ok(Command::Select(
                arg.split(',')
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
                    .collect(),
            )),
            "enable" => symbol(arg).map(Command::Enable),
            "disable" => symbol(arg).map(Command::Disable),
            // Keep the value verbatim, spaces included
            "url" => Ok(Command::Url(arg.to_string())),
            "blur" => Ok(Command::Blur),
            "show" => Ok(Command::Show),
            "options" => Ok(Command::Options),
            "flush" => Ok(Command::Flush),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Err("Empty command".to_string()),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}


pub struct SettingsApp {

    store: Arc<dyn ConfigStore>,

    state: AppState,

    selection: CurrencySelection,

    form: SettingsForm,

    persist_rx: mpsc::UnboundedReceiver<PersistEvent>,

    last_persist: Option<PersistEvent>,
}

impl SettingsApp {
    pub fn new(runtime: Handle, store: Arc<dyn ConfigStore>, settings: &Settings) -> Self {
        let state = load_state(store.as_ref());

        let (persist_tx, persist_rx) = mpsc::unbounded_channel();
        let writer = DebouncedWriter::new(runtime, Arc::clone(&store), settings.debounce_window())
            .with_events(persist_tx);
        let form = SettingsForm::load(store.as_ref(), writer);
        let selection = CurrencySelection::new(&StaticCatalog, settings.development_mode);

        tracing::info!(
            "Settings loaded: {} enabled currencies, debounce {}ms",
            state.enabled_coins().len(),
            settings.debounce_ms
        );

        Self {
            store,
            state,
            selection,
            form,
            persist_rx,
            last_persist: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn form(&self) -> &SettingsForm {
        &self.form
    }

    /// Run one command and return the text to show the user.
    pub fn handle_command(&mut self, command: Command) -> Result<String> {
        match command {
            Command::Select(symbols) => self.select(symbols),
            Command::Enable(symbol) => {
                let mut symbols = self.state.enabled_coins().to_vec();
                symbols.push(symbol);
                self.select(symbols)
            }
            Command::Disable(symbol) => {
                let symbols = self
                    .state
                    .enabled_coins()
                    .iter()
                    .filter(|s| **s != symbol)
                    .cloned()
                    .collect();
                self.select(symbols)
            }
            Command::Url(value) => {
                self.form.handle_change(Field::MarketmakerUrl, value);
                Ok(self.url_line())
            }
            Command::Blur => {
                self.form.handle_blur(Field::MarketmakerUrl);
                Ok(self.url_line())
            }
            Command::Show => Ok(self.summary()),
            Command::Options => Ok(self
                .selection
                .options()
                .iter()
                .map(|o| {
                    let marker = if self.state.is_enabled(&o.value) { "[x]" } else { "[ ]" };
                    let lock = if o.clearable { "" } else { " (always enabled)" };
                    format!("{} {}{}", marker, o.label, lock)
                })
                .collect::<Vec<_>>()
                .join("\n")),
            Command::Flush => {
                let events = self.form.writer().flush_pending();
                self.record_events(events.iter().cloned());
                Ok(format!("Flushed {} pending edit(s)", events.len()))
            }
            Command::Quit => Ok(String::new()),
        }
    }

    /// Drain flush outcomes reported by the debounced writer.
    pub fn poll_persist_events(&mut self) -> Vec<PersistEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.persist_rx.try_recv() {
            events.push(event);
        }
        self.record_events(events.iter().cloned());
        events
    }

    /// Commit anything still inside the debounce window.
    pub fn shutdown(&mut self) -> Vec<PersistEvent> {
        let pending = self.form.writer().pending_count();
        if pending > 0 {
            tracing::info!("Flushing {} pending edit(s) before exit", pending);
        }
        let events = self.form.writer().flush_pending();
        self.record_events(events.iter().cloned());
        events
    }

    /// Apply commands read from `input` until `quit` or end of input.
    ///
    /// Edits still inside the debounce window are flushed on the way out,
    /// also when reading `input` fails.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        let result = self.command_loop(input).await;
        for event in self.shutdown() {
            print_event(&event);
        }
        result
    }

    async fn command_loop<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        let mut tick = tokio::time::interval(Duration::from_millis(100));

        println!("{}", self.handle_command(Command::Show)?);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };

                    let command = match Command::parse(&line) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}", e);
                            continue;
                        }
                    };
                    if command == Command::Quit {
                        break;
                    }

                    match self.handle_command(command) {
                        Ok(output) => println!("{}", output),
                        Err(e) => {
                            tracing::warn!("Command failed: {:#}", e);
                            eprintln!("error: {:#}", e);
                        }
                    }
                }
                _ = tick.tick() => {
                    for event in self.poll_persist_events() {
                        print_event(&event);
                    }
                }
            }
        }

        Ok(())
    }

    fn select(&mut self, symbols: Vec<String>) -> Result<String> {
        // Only a newly added currency has to be on offer. Enabled ones hidden
        // in this mode stay untouched.
        if let Action::Enable(added) = reconcile(self.state.enabled_coins(), &symbols) {
            if !self.selection.options().iter().any(|o| o.value == added) {
                anyhow::bail!("{} is not a selectable currency", added);
            }
        }

        let selected: Vec<SelectedValue> = symbols.into_iter().map(SelectedValue::new).collect();
        let action = self.selection.handle_select_change(&mut self.state, &selected)?;

        let message = match &action {
            Action::Enable(symbol) => format!("Enabled {}", symbol),
            Action::Disable(symbol) => format!("Disabled {}", symbol),
            Action::NoOp => return Ok("No change".to_string()),
        };

        let json = self.state.to_json().context("Failed to encode enabled currencies")?;
        self.store
            .set(ENABLED_COINS_KEY, &json)
            .context("Failed to save enabled currencies")?;

        Ok(message)
    }

    fn record_events(&mut self, events: impl Iterator<Item = PersistEvent>) {
        for event in events {
            if let PersistEvent::Failed { key, error, .. } = &event {
                tracing::warn!("Setting {} not saved: {}", key, error);
            }
            self.last_persist = Some(event);
        }
    }

    fn url_line(&self) -> String {
        match self.form.error_message() {
            Some(message) => format!("marketmakerUrl = {:?} ({})", self.form.marketmaker_url(), message),
            None => format!("marketmakerUrl = {:?}", self.form.marketmaker_url()),
        }
    }

    fn summary(&self) -> String {
        let mut lines = vec![
            format!("Enabled currencies: {}", self.state.enabled_coins().join(", ")),
            self.url_line(),
        ];

        if let Some(pending) = self.form.writer().pending_value(Field::MarketmakerUrl.key()) {
            lines.push(format!("Pending save: {:?}", pending));
        }

        match &self.last_persist {
            Some(PersistEvent::Flushed { key, at, .. }) => {
                lines.push(format!("Last saved {} at {}", key, at.format("%H:%M:%S")));
            }
            Some(PersistEvent::Failed { key, error, at, .. }) => {
                lines.push(format!("Saving {} failed at {}: {}", key, at.format("%H:%M:%S"), error));
            }
            None => {}
        }

        lines.join("\n")
    }
}

pub fn print_event(event: &PersistEvent) {
    match event {
        PersistEvent::Flushed { key, value, .. } => println!("saved {} = {:?}", key, value),
        PersistEvent::Failed { key, error, .. } => eprintln!("could not save {}: {}", key, error),
    }
}

/// Enabled currencies from the store, or only the always-enabled ones.
fn load_state(store: &dyn ConfigStore) -> AppState {
    match store.get(ENABLED_COINS_KEY) {
        Some(raw) => AppState::from_json(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable {}: {}", ENABLED_COINS_KEY, e);
            AppState::default()
        }),
        None => AppState::default(),
    }
}

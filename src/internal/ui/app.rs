use anyhow::Result;
use serde::{Deserialize, Serialize};

use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use crate::config::AppConfig;
use crate::harness::{InteractiveDriver, SharedHarness, TriggerBinding};
use crate::internal::notification::Notification;
use crate::internal::ui::keybindings::KeyBindingMap;
use crate::internal::ui::view::{self, ViewState};
use crate::scene::Scene;

/// Actions/messages sent through the app action channel.
///
/// Only the key-bindable variants can appear in config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Advance,
    Quit,
    ToggleHelp,
    #[serde(skip)]
    StepFailed(String),
}

/// Interactive front-end: draws the scene and turns key presses into advances.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub harness: SharedHarness<Scene>,
    pub keybindings: KeyBindingMap,
    pub notification: Option<Notification>,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
    binding: Option<TriggerBinding>,
}

impl App {
    #[tracing::instrument(skip_all)]
    pub fn new(harness: SharedHarness<Scene>, config: &AppConfig) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let mut keybindings = KeyBindingMap::with_defaults();
        keybindings.merge_config(&config.keybindings);

        Self {
            running: true,
            show_help: false,
            harness,
            keybindings,
            notification: None,
            action_tx,
            action_rx,
            binding: None,
        }
    }

    /// Subscribe the harness to advance triggers. Failures come back as
    /// [`Action::StepFailed`]. Binding twice keeps the first subscription.
    pub async fn bind_triggers(&mut self) -> Result<()> {
        if self.binding.is_some() {
            tracing::warn!("trigger binding already established");
            return Ok(());
        }
        let tx = self.action_tx.clone();
        let binding = InteractiveDriver::new(self.harness.clone())
            .bind(move |err| {
                let _ = tx.send(Action::StepFailed(err.to_string()));
            })
            .await?;
        self.binding = Some(binding);
        Ok(())
    }

    pub fn notify_info(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::info(message));
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::error(message));
    }

    pub async fn run(&mut self, mut tui: crate::tui::Tui) -> Result<()> {
        self.bind_triggers().await?;
        let keys = self.keybindings.keys_for(&Action::Advance).join("/");
        self.notify_info(format!("{keys} applies the next mutation"));

        let mut event_interval = tokio::time::interval(std::time::Duration::from_millis(16));

        loop {
            if let Some(notification) = &self.notification
                && notification.should_dismiss()
            {
                self.notification = None;
            }

            {
                let harness = self.harness.lock().await;
                let state = ViewState {
                    index: harness.current_index(),
                    len: harness.len(),
                    notification: self.notification.as_ref(),
                    keybindings: &self.keybindings,
                    show_help: self.show_help,
                };
                tui.draw(|f| view::draw(f, harness.entities(), &state))?;
            }

            tokio::select! {
                _ = event_interval.tick() => {
                    if event::poll(std::time::Duration::from_millis(0))?
                        && let Event::Key(key) = event::read()?
                            && key.kind == KeyEventKind::Press {
                                self.handle_key_event(key);
                            }
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action).await;
                }
            }

            if !self.running {
                break;
            }
        }

        if let Some(binding) = self.binding.take() {
            binding.shutdown().await;
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if let Some(action) = self.keybindings.get_action(&key) {
            let _ = self.action_tx.send(action);
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Advance => {
                let queued = self.binding.as_ref().is_some_and(|b| b.advance());
                if !queued {
                    tracing::warn!("advance requested without an active trigger binding");
                    self.notify_error("Trigger binding is not active");
                }
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            // Expires through `Notification::should_dismiss` in the run loop.
            Action::StepFailed(msg) => self.notify_error(msg),
        }
    }
}

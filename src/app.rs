//! Main application loop.
//!
//! Owns the terminal, the tokio runtime, and the controller. Fetches run as
//! spawned tasks; their outcomes come back over a channel and are applied in
//! arrival order, so when two fetches overlap the last one to complete wins.

use crate::backend::{ContactFetcher, ContactRecord, FetchError};
use crate::controller::{ContactListController, FetchRequest};
use crate::tui::Tui;
use crate::view;
use crate::widgets::{TextInput, ToastManager};
use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

type FetchOutcome = Result<Vec<ContactRecord>, FetchError>;

/// Main application state
pub struct App {
    tui: Tui,
    runtime: Runtime,
    controller: ContactListController,
    fetcher: Arc<dyn ContactFetcher>,
    toasts: ToastManager,
    search_input: TextInput,
    completion_tx: UnboundedSender<FetchOutcome>,
    completion_rx: UnboundedReceiver<FetchOutcome>,
    should_quit: bool,
}

impl App {
    pub fn new(
        fetcher: Arc<dyn ContactFetcher>,
        account_id: Option<String>,
        page_size: Option<String>,
        link_base: String,
    ) -> Result<Self> {
        let tui = Tui::new()?;
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Ok(Self {
            tui,
            runtime,
            controller: ContactListController::new(account_id, page_size, link_base),
            fetcher,
            toasts: ToastManager::new(),
            search_input: TextInput::new(),
            completion_tx,
            completion_rx,
            should_quit: false,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.tui.enter()?;
        info!("rolodex started (active: {})", self.controller.is_active());

        if let Some(request) = self.controller.on_mount() {
            self.spawn_fetch(request);
        }

        // Main event loop
        loop {
            self.drain_completions();
            if let Some(request) = self.controller.poll_debounce(Instant::now()) {
                self.spawn_fetch(request);
            }
            self.toasts.tick();

            self.draw()?;

            if self.should_quit {
                break;
            }

            // The poll timeout is the loop tick; it bounds debounce latency.
            if let Some(event) = self.tui.poll_event(Duration::from_millis(100))? {
                self.handle_event(&event);
            }
        }

        self.tui.exit()?;
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let Self {
            tui,
            controller,
            search_input,
            toasts,
            ..
        } = self;
        tui.terminal_mut().draw(|frame| {
            view::render(frame, &controller.view(), search_input, controller.is_active());
            toasts.render(frame, frame.area());
        })?;
        Ok(())
    }

    /// Run one fetch request as a background task. The task reports back
    /// through the completion channel; it is never cancelled.
    fn spawn_fetch(&self, request: FetchRequest) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.completion_tx.clone();
        self.runtime.spawn(async move {
            let outcome = fetcher
                .fetch_contacts(&request.account_id, &request.search_term)
                .await;
            if tx.send(outcome).is_err() {
                debug!("fetch completed after shutdown; outcome dropped");
            }
        });
    }

    /// Apply every completed fetch that has arrived since the last tick.
    fn drain_completions(&mut self) {
        while let Ok(outcome) = self.completion_rx.try_recv() {
            self.controller.apply_fetch(outcome, &mut self.toasts);
        }
    }

    fn handle_event(&mut self, event: &Event) {
        let Event::Key(key) = event else { return };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::PageUp => self.controller.prev_page(),
            KeyCode::PageDown => self.controller.next_page(),
            code => {
                // Everything else edits the search text (when the widget
                // is active at all). Only actual text changes re-arm the
                // debounce; cursor movement does not.
                if self.controller.is_active()
                    && !key.modifiers.contains(KeyModifiers::CONTROL)
                    && self.search_input.handle_key(code)
                {
                    self.controller
                        .set_search_term(self.search_input.text(), Instant::now());
                }
            }
        }
    }
}

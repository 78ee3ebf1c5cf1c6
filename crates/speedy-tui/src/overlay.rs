//! Search overlay controller.
//!
//! Owns everything the overlay shows: visibility, the query line, results,
//! the selection and the scroll offset. Work that takes time (the debounce
//! window, searches, activations) runs in spawned tasks that report back
//! through [`OverlayMsg`]s on the controller's inbox; the event loop feeds
//! them to [`Overlay::handle_message`].
//!
//! Late messages are recognised and dropped:
//! - debounce firings carry a generation that is bumped on every reschedule
//! - search completions carry the sequence number of their request and only
//!   the one matching the current in-flight request is applied
//! - activation completions carry the overlay session they started in

use crate::dispatch::dispatch;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use speedy_core::config::OverlayConfig;
use speedy_core::{Result, SearchEngine, SearchResult, Shell};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Completions posted back to the controller.
#[derive(Debug)]
pub enum OverlayMsg {
    DebounceElapsed {
        generation: u64,
    },
    SearchFinished {
        seq: u64,
        result: Result<Vec<SearchResult>>,
    },
    ActivationFinished {
        session: u64,
        target: SearchResult,
        result: Result<()>,
    },
}

/// Observable overlay phase, derived from the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    /// Open with a query too short to search
    OpenEmpty,
    /// A search is waiting on the debounce window or the engine
    OpenPending,
    OpenResults,
    OpenNoMatch,
}

/// Reschedulable one-shot timer.
///
/// Each schedule aborts the previous timer task and bumps the generation,
/// so a firing that was already queued before the reschedule is rejected by
/// [`Debounce::fire`].
#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl Debounce {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            handle: None,
        }
    }

    pub fn schedule(&mut self, tx: &mpsc::UnboundedSender<OverlayMsg>) {
        self.cancel();
        let generation = self.generation;
        let delay = self.delay;
        let tx = tx.clone();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(OverlayMsg::DebounceElapsed { generation });
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// Accept a firing. Returns false for firings of an earlier schedule.
    pub fn fire(&mut self, generation: u64) -> bool {
        if self.handle.is_some() && generation == self.generation {
            self.handle = None;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for Debounce {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// First visible row of the results list, kept so that the selection is
/// on screen with the smallest possible move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    offset: usize,
    viewport: usize,
}

impl ScrollState {
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Scroll just enough to show `index`.
    pub fn reveal(&mut self, index: usize) {
        if self.viewport == 0 {
            return;
        }
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + self.viewport {
            self.offset = index + 1 - self.viewport;
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

pub struct Overlay {
    engine: Arc<dyn SearchEngine>,
    shell: Arc<dyn Shell>,
    tx: mpsc::UnboundedSender<OverlayMsg>,
    min_query_length: usize,
    debounce: Debounce,

    visible: bool,
    query: String,
    /// Cursor position in characters
    cursor: usize,
    results: Vec<SearchResult>,
    searching: bool,
    selection: Option<usize>,
    scroll: ScrollState,
    status: Option<String>,

    next_seq: u64,
    in_flight: Option<u64>,
    session: u64,
    activating: bool,
}

impl Overlay {
    /// Create a closed overlay and the inbox its tasks report to.
    pub fn new(
        engine: Arc<dyn SearchEngine>,
        shell: Arc<dyn Shell>,
        config: &OverlayConfig,
    ) -> (Self, mpsc::UnboundedReceiver<OverlayMsg>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let overlay = Self {
            engine,
            shell,
            tx,
            min_query_length: config.min_query_length.max(1),
            debounce: Debounce::new(config.debounce()),
            visible: false,
            query: String::new(),
            cursor: 0,
            results: Vec::new(),
            searching: false,
            selection: None,
            scroll: ScrollState::default(),
            status: None,
            next_seq: 0,
            in_flight: None,
            session: 0,
            activating: false,
        };
        (overlay, rx)
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.searching
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll.offset()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if !self.visible {
            Phase::Closed
        } else if self.searching || self.debounce.is_pending() {
            Phase::OpenPending
        } else if !self.query_is_searchable() {
            Phase::OpenEmpty
        } else if self.results.is_empty() {
            Phase::OpenNoMatch
        } else {
            Phase::OpenResults
        }
    }

    pub fn toggle(&mut self) {
        if self.visible {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn open(&mut self) {
        if !self.visible {
            info!("Overlay opened");
            self.visible = true;
        }
    }

    /// Hide the overlay and drop all per-session state. Pending timers and
    /// requests are cancelled so nothing can repopulate the closed view.
    pub fn close(&mut self) {
        if !self.visible {
            return;
        }
        info!("Overlay closed");
        self.visible = false;
        self.debounce.cancel();
        self.cancel_search();
        self.query.clear();
        self.cursor = 0;
        self.clear_results();
        self.status = None;
        self.activating = false;
        self.session = self.session.wrapping_add(1);
    }

    /// Replace the whole query line.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.cursor = self.query.chars().count();
        self.query_changed();
    }

    /// Number of result rows the list can show; updated after every draw.
    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.scroll.viewport = rows;
        if let Some(index) = self.selection {
            self.scroll.reveal(index);
        }
    }

    /// Handle a key the shortcut bus did not claim.
    ///
    /// Returns true when the key was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if !self.visible || key.kind == KeyEventKind::Release {
            return false;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Esc => self.close(),
            KeyCode::Enter => self.activate_selected(),
            KeyCode::Down => self.select_next(),
            KeyCode::Up => self.select_previous(),
            KeyCode::Char('u') if ctrl => {
                if !self.query.is_empty() {
                    self.set_query(String::new());
                }
            }
            KeyCode::Char(c) if !ctrl && !alt => self.insert_char(c),
            KeyCode::Backspace => self.delete_before_cursor(),
            KeyCode::Delete => self.delete_at_cursor(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.query.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.query.chars().count(),
            _ => return false,
        }
        true
    }

    /// Move the selection down, entering the list at the first row.
    pub fn select_next(&mut self) {
        if self.results.is_empty() {
            return;
        }
        let last = self.results.len() - 1;
        let next = self.selection.map_or(0, |i| (i + 1).min(last));
        self.select(Some(next));
    }

    /// Move the selection up; from the first row it leaves the list.
    pub fn select_previous(&mut self) {
        let previous = self.selection.and_then(|i| i.checked_sub(1));
        self.select(previous);
    }

    /// Select and activate the row at `row` within the visible window.
    pub fn click_row(&mut self, row: usize) {
        let index = self.scroll.offset() + row;
        if index < self.results.len() {
            self.select(Some(index));
            self.activate_selected();
        }
    }

    /// Activate the selected result, if any.
    pub fn activate_selected(&mut self) {
        let Some(target) = self.selection.and_then(|i| self.results.get(i)).cloned() else {
            return;
        };
        if self.activating {
            debug!("Activation already running, ignoring {}", target.path);
            return;
        }

        self.activating = true;
        self.status = None;

        let shell = Arc::clone(&self.shell);
        let tx = self.tx.clone();
        let session = self.session;
        tokio::spawn(async move {
            let result = dispatch(shell.as_ref(), &target).await;
            let _ = tx.send(OverlayMsg::ActivationFinished {
                session,
                target,
                result,
            });
        });
    }

    pub fn handle_message(&mut self, msg: OverlayMsg) {
        match msg {
            OverlayMsg::DebounceElapsed { generation } => {
                if self.debounce.fire(generation) {
                    self.start_search();
                } else {
                    debug!("Ignoring stale debounce firing {}", generation);
                }
            }
            OverlayMsg::SearchFinished { seq, result } => self.finish_search(seq, result),
            OverlayMsg::ActivationFinished {
                session,
                target,
                result,
            } => self.finish_activation(session, &target, result),
        }
    }

    fn select(&mut self, selection: Option<usize>) {
        self.selection = selection;
        if let Some(index) = selection {
            self.scroll.reveal(index);
        }
    }

    fn query_is_searchable(&self) -> bool {
        self.query.trim().chars().count() >= self.min_query_length
    }

    fn query_changed(&mut self) {
        self.status = None;
        self.cancel_search();

        if self.query_is_searchable() {
            self.debounce.schedule(&self.tx);
        } else {
            self.debounce.cancel();
            self.clear_results();
        }
    }

    fn start_search(&mut self) {
        if !self.visible || !self.query_is_searchable() {
            return;
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        let query = self.query.trim().to_string();
        debug!("Search #{} for {:?}", seq, query);

        self.in_flight = Some(seq);
        self.searching = true;

        let search = self.engine.search(query);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = search.await;
            let _ = tx.send(OverlayMsg::SearchFinished { seq, result });
        });
    }

    fn finish_search(&mut self, seq: u64, result: Result<Vec<SearchResult>>) {
        if self.in_flight != Some(seq) {
            debug!("Discarding stale search #{}", seq);
            return;
        }

        self.in_flight = None;
        self.searching = false;
        self.results = result.unwrap_or_else(|e| {
            warn!("Search failed: {}", e);
            Vec::new()
        });
        self.selection = None;
        self.scroll.reset();
        debug!("Search #{} returned {} results", seq, self.results.len());
    }

    fn finish_activation(&mut self, session: u64, target: &SearchResult, result: Result<()>) {
        if session != self.session {
            debug!("Ignoring activation from closed session {}", session);
            return;
        }
        self.activating = false;

        match result {
            Ok(()) => {
                self.engine.record_activation(target);
                self.close();
            }
            Err(e) => {
                warn!("Activation of {} failed: {}", target.path, e);
                self.status = Some(format!("Could not open {}: {e}", target.name));
            }
        }
    }

    /// Logically cancel the in-flight search; its completion will be dropped.
    fn cancel_search(&mut self) {
        self.in_flight = None;
        self.searching = false;
    }

    fn clear_results(&mut self) {
        self.results.clear();
        self.selection = None;
        self.scroll.reset();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.query
            .char_indices()
            .nth(char_index)
            .map_or(self.query.len(), |(i, _)| i)
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.query.insert(at, c);
        self.cursor += 1;
        self.query_changed();
    }

    fn delete_before_cursor(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.query.remove(at);
        self.query_changed();
    }

    fn delete_at_cursor(&mut self) {
        if self.cursor >= self.query.chars().count() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.query.remove(at);
        self.query_changed();
    }
}

use tracing::{debug, warn};

use crate::error::{ExplorerError, Result};
use crate::query::{QueryResponse, Row};
use super::canned::CannedQuery;
use super::client::QueryBackend;
use super::render::View;

pub const CONNECT_ERROR: &str = "Failed to connect to the database server";
pub const EXECUTE_ERROR: &str = "Failed to execute query";

/// Identifies one accepted submission. Completions carrying anything but
/// the outstanding ticket are stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank text; nothing was sent and nothing changed.
    Ignored,
    /// A submission is still outstanding.
    Busy,
    Started(Ticket),
}

/// Console state without any I/O.
///
/// After a submission completes exactly one of `results` and `error` is
/// set. `loading` is cleared on every completion, whatever the outcome.
#[derive(Debug, Default)]
pub struct ConsoleState {
    query: String,
    results: Option<Vec<Row>>,
    affected_rows: Option<u64>,
    error: Option<String>,
    loading: bool,
    selected_table: Option<String>,
    tables: Vec<String>,
    next_ticket: u64,
    in_flight: Option<Ticket>,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn results(&self) -> Option<&[Row]> {
        self.results.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn selected_table(&self) -> Option<&str> {
        self.selected_table.as_deref()
    }

    /// Applies a table listing and returns whether it succeeded. Failure is
    /// not fatal: the list stays empty and the connection error is shown. A
    /// later successful listing clears that error but leaves query errors
    /// alone.
    pub fn load_tables(&mut self, listing: Result<Vec<String>>) -> bool {
        let loaded = match listing {
            Ok(tables) => {
                debug!("Loaded {} tables", tables.len());
                self.tables = tables;
                if self.error.as_deref() == Some(CONNECT_ERROR) {
                    self.error = None;
                }
                true
            }
            Err(e) => {
                warn!("Table listing failed: {}", e);
                self.tables.clear();
                self.error = Some(CONNECT_ERROR.to_string());
                false
            }
        };

        if let Some(selected) = &self.selected_table {
            if !self.tables.contains(selected) {
                self.selected_table = None;
            }
        }

        loaded
    }

    /// Selects a table from the listed ones. Names that were not returned by
    /// the table listing are refused, so canned statements only ever name
    /// real tables.
    pub fn select_table(&mut self, name: &str) -> bool {
        if self.tables.iter().any(|t| t == name) {
            self.selected_table = Some(name.to_string());
            true
        } else {
            false
        }
    }

    /// Canned actions for the selected table, empty when none is selected.
    pub fn canned_actions(&self) -> Vec<(CannedQuery, String)> {
        match &self.selected_table {
            Some(table) => CannedQuery::ALL
                .iter()
                .map(|canned| (*canned, canned.sql(table)))
                .collect(),
            None => vec![],
        }
    }

    pub fn begin_submit(&mut self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }

        if self.loading {
            return SubmitOutcome::Busy;
        }

        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);

        self.loading = true;
        self.error = None;
        self.in_flight = Some(ticket);

        SubmitOutcome::Started(ticket)
    }

    /// Applies a completion. Returns false for a stale ticket, which leaves
    /// the state untouched.
    pub fn finish_submit(&mut self, ticket: Ticket, outcome: Result<QueryResponse>) -> bool {
        if self.in_flight != Some(ticket) {
            debug!("Dropping stale completion {:?}", ticket);
            return false;
        }

        self.in_flight = None;
        self.loading = false;

        match outcome {
            Ok(response) => {
                self.results = Some(response.results);
                self.affected_rows = response.affected_rows;
                self.error = None;
            }
            Err(ExplorerError::Gateway(message)) => {
                self.results = None;
                self.affected_rows = None;
                self.error = Some(message);
            }
            Err(e) => {
                warn!("Query transport failure: {}", e);
                self.results = None;
                self.affected_rows = None;
                self.error = Some(EXECUTE_ERROR.to_string());
            }
        }

        true
    }

    pub fn view(&self) -> View<'_> {
        if self.loading {
            return View::Loading;
        }

        if let Some(error) = &self.error {
            return View::Error(error);
        }

        match &self.results {
            Some(rows) if rows.is_empty() => View::Empty {
                affected_rows: self.affected_rows,
            },
            Some(rows) => View::Rows(rows),
            None => View::Initial,
        }
    }
}

/// Console state wired to a gateway.
///
/// Every operation takes `&mut self`, so one console never has two
/// submissions outstanding.
pub struct Console<B> {
    backend: B,
    state: ConsoleState,
}

impl<B: QueryBackend> Console<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: ConsoleState::new(),
        }
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ConsoleState {
        &mut self.state
    }

    /// Fetches the table listing; false when the gateway could not be reached.
    pub async fn load_tables(&mut self) -> bool {
        let listing = self.backend.list_tables().await;
        self.state.load_tables(listing)
    }

    /// Submits the current query text.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let text = self.state.query.clone();
        self.submit_text(&text).await
    }

    pub async fn submit_text(&mut self, text: &str) -> SubmitOutcome {
        let outcome = self.state.begin_submit(text);

        if let SubmitOutcome::Started(ticket) = outcome {
            let response = self.backend.run_query(text).await;
            self.state.finish_submit(ticket, response);
        }

        outcome
    }

    /// Runs the canned action at `index` for the selected table; `None` when
    /// no table is selected or the index is out of range.
    pub async fn run_canned(&mut self, index: usize) -> Option<SubmitOutcome> {
        let sql = self.state.canned_actions().into_iter().nth(index)?.1;
        Some(self.submit_text(&sql).await)
    }
}

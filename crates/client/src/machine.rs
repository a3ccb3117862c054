//! Search lifecycle state machine.
//!
//! Pure and synchronous: the controller drives it from timers and network
//! completions. Stale completions are recognised purely by comparing query
//! identities.

use tvsearch_core::types::SearchResult;

/// Identity of one logical search. Strictly increasing per machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryId(u64);

impl std::fmt::Display for QueryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of a search as shown to the user.
pub type Outcome = Result<Vec<SearchResult>, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    #[default]
    Idle,
    Pending(QueryId),
    Settled(QueryId, Outcome),
}

impl SearchState {
    pub fn loading(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    pub fn results(&self) -> &[SearchResult] {
        match self {
            Self::Settled(_, Ok(results)) => results,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Settled(_, Err(message)) => Some(message),
            _ => None,
        }
    }

    pub fn query_id(&self) -> Option<QueryId> {
        match self {
            Self::Idle => None,
            Self::Pending(id) | Self::Settled(id, _) => Some(*id),
        }
    }
}

#[derive(Debug, Default)]
pub struct SearchMachine {
    issued: u64,
    state: SearchState,
}

impl SearchMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// The debounced input settled on `text`.
    ///
    /// Blank text returns to `Idle` and yields `None`. Anything else starts
    /// a new logical search and yields the identity its request must carry.
    /// Either way, whatever was pending before is superseded.
    pub fn begin(&mut self, text: &str) -> Option<QueryId> {
        if text.trim().is_empty() {
            self.clear();
            return None;
        }

        self.issued += 1;
        let id = QueryId(self.issued);
        self.state = SearchState::Pending(id);
        Some(id)
    }

    /// Drop results, error and any pending search.
    pub fn clear(&mut self) {
        self.state = SearchState::Idle;
    }

    /// Whether a completion tagged `id` would still be accepted.
    pub fn is_current(&self, id: QueryId) -> bool {
        matches!(self.state, SearchState::Pending(current) if current == id)
    }

    /// Apply a completed request. Returns `false` and leaves the state
    /// untouched when `id` is no longer the pending search.
    pub fn resolve(&mut self, id: QueryId, outcome: Outcome) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.state = SearchState::Settled(id, outcome);
        true
    }
}

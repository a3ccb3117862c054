use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tvsearch_client::{SearchBackend, SearchController, SearchFailure, SearchHandle, SearchState};
use tvsearch_core::types::{SearchResult, Show};

/// Backend whose answer for each query is one result named after the
/// query, delivered after a per-query delay.
#[derive(Default)]
struct ScriptedBackend {
    delays: HashMap<&'static str, Duration>,
    failures: HashMap<&'static str, SearchFailure>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn delay(mut self, query: &'static str, ms: u64) -> Self {
        self.delays.insert(query, Duration::from_millis(ms));
        self
    }

    fn fail(mut self, query: &'static str, failure: SearchFailure) -> Self {
        self.failures.insert(query, failure);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SearchBackend for ScriptedBackend {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchFailure> {
        self.calls.lock().unwrap().push(query.to_string());
        let delay = self
            .delays
            .get(query)
            .copied()
            .unwrap_or(Duration::from_millis(20));
        tokio::time::sleep(delay).await;

        if let Some(failure) = self.failures.get(query) {
            return Err(failure.clone());
        }
        Ok(vec![SearchResult {
            score: 1.0,
            show: Show {
                id: query.len() as u64,
                name: query.to_string(),
                ..Default::default()
            },
        }])
    }
}

fn start(backend: &Arc<ScriptedBackend>) -> (SearchHandle, watch::Receiver<SearchState>) {
    let handle = SearchController::spawn(backend.clone(), Duration::from_millis(500));
    let rx = handle.subscribe();
    (handle, rx)
}

async fn wait_settled(rx: &mut watch::Receiver<SearchState>) -> SearchState {
    rx.wait_for(|s| matches!(s, SearchState::Settled(..)))
        .await
        .unwrap()
        .clone()
}

fn names(state: &SearchState) -> Vec<String> {
    state.results().iter().map(|r| r.show.name.clone()).collect()
}

#[tokio::test(start_paused = true)]
async fn rapid_typing_is_debounced_into_one_search() {
    let backend = Arc::new(ScriptedBackend::default());
    let (handle, mut rx) = start(&backend);

    handle.set_query("a");
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.set_query("ab");
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.set_query("abc");

    let state = wait_settled(&mut rx).await;
    assert_eq!(names(&state), vec!["abc"]);
    assert_eq!(backend.calls(), vec!["abc"]);
}

#[tokio::test(start_paused = true)]
async fn nothing_is_searched_before_the_debounce_elapses() {
    let backend = Arc::new(ScriptedBackend::default());
    let (handle, _rx) = start(&backend);

    handle.set_query("lost");
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(backend.calls().is_empty());
    assert_eq!(handle.state(), SearchState::Idle);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(backend.calls(), vec!["lost"]);
}

#[tokio::test(start_paused = true)]
async fn last_issued_query_wins_over_later_completions() {
    let backend = Arc::new(
        ScriptedBackend::default()
            .delay("a", 300)
            .delay("ab", 200)
            .delay("abc", 50),
    );
    let (handle, mut rx) = start(&backend);

    handle.submit("a");
    handle.submit("ab");
    handle.submit("abc");

    let state = wait_settled(&mut rx).await;
    assert_eq!(names(&state), vec!["abc"]);

    // Let the superseded requests run past their own completion times.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(handle.state(), state);
    assert!(!handle.state().loading());
}

#[tokio::test(start_paused = true)]
async fn blank_query_clears_state_and_ignores_in_flight_request() {
    let backend = Arc::new(ScriptedBackend::default().delay("frasier", 300));
    let (handle, mut rx) = start(&backend);

    handle.submit("friends");
    let settled = wait_settled(&mut rx).await;
    assert_eq!(names(&settled), vec!["friends"]);

    handle.submit("frasier");
    rx.wait_for(|s| s.loading()).await.unwrap();

    handle.submit("   ");
    let idle = rx
        .wait_for(|s| matches!(s, SearchState::Idle))
        .await
        .unwrap()
        .clone();
    assert!(idle.results().is_empty());
    assert!(idle.error().is_none());
    assert!(!idle.loading());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(handle.state(), SearchState::Idle);
}

#[tokio::test(start_paused = true)]
async fn debounced_blank_input_also_clears() {
    let backend = Arc::new(ScriptedBackend::default());
    let (handle, mut rx) = start(&backend);

    handle.set_query("office");
    wait_settled(&mut rx).await;

    handle.set_query("");
    rx.wait_for(|s| matches!(s, SearchState::Idle)).await.unwrap();
    assert_eq!(backend.calls(), vec!["office"]);
}

#[tokio::test(start_paused = true)]
async fn clear_cancels_pending_search() {
    let backend = Arc::new(ScriptedBackend::default().delay("slow", 500));
    let (handle, mut rx) = start(&backend);

    handle.submit("slow");
    rx.wait_for(|s| s.loading()).await.unwrap();
    handle.clear();
    rx.wait_for(|s| matches!(s, SearchState::Idle)).await.unwrap();

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(handle.state(), SearchState::Idle);
}

#[tokio::test(start_paused = true)]
async fn failures_surface_as_a_single_message() {
    let backend = Arc::new(ScriptedBackend::default().fail(
        "boom",
        SearchFailure::Server {
            kind: "TVMaze API is unavailable".into(),
            message: "Could not reach TVMaze API".into(),
        },
    ));
    let (handle, mut rx) = start(&backend);

    handle.submit("boom");
    let state = wait_settled(&mut rx).await;
    assert_eq!(state.error(), Some("Could not reach TVMaze API"));
    assert!(state.results().is_empty());
    assert!(!state.loading());
}

#[tokio::test(start_paused = true)]
async fn network_failure_message() {
    let backend = Arc::new(ScriptedBackend::default().fail("down", SearchFailure::Network));
    let (handle, mut rx) = start(&backend);

    handle.submit("down");
    let state = wait_settled(&mut rx).await;
    assert_eq!(
        state.error(),
        Some("Failed to connect to the server. Please check if the backend is running.")
    );
}

#[tokio::test(start_paused = true)]
async fn same_query_twice_searches_twice() {
    let backend = Arc::new(ScriptedBackend::default());
    let (handle, mut rx) = start(&backend);

    handle.submit("lost");
    let first = wait_settled(&mut rx).await;
    let first_id = first.query_id().unwrap();

    handle.submit("lost");
    let second = rx
        .wait_for(|s| matches!(s, SearchState::Settled(id, _) if *id != first_id))
        .await
        .unwrap()
        .clone();

    assert_eq!(backend.calls(), vec!["lost", "lost"]);
    assert_eq!(first.results(), second.results());
    assert!(second.query_id().unwrap() > first_id);
}

#[tokio::test(start_paused = true)]
async fn query_is_trimmed_before_reaching_backend() {
    let backend = Arc::new(ScriptedBackend::default());
    let (handle, mut rx) = start(&backend);

    handle.submit("  the wire  ");
    wait_settled(&mut rx).await;
    assert_eq!(backend.calls(), vec!["the wire"]);
}

/// Backend that holds `"a"` until released and answers everything else
/// after 100 ms. Records which searches ran to completion.
#[derive(Default)]
struct GatedBackend {
    gate: Notify,
    finished: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl SearchBackend for GatedBackend {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchFailure> {
        if query == "a" {
            self.gate.notified().await;
        } else {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        self.finished.lock().unwrap().push(query.to_string());
        Ok(vec![SearchResult {
            score: 1.0,
            show: Show {
                id: 1,
                name: query.to_string(),
                ..Default::default()
            },
        }])
    }
}

#[tokio::test(start_paused = true)]
async fn completion_racing_newer_input_is_discarded() {
    let backend = Arc::new(GatedBackend::default());
    let handle = SearchController::spawn(backend.clone(), Duration::from_millis(500));
    let mut rx = handle.subscribe();

    handle.submit("a");
    rx.wait_for(|s| s.loading()).await.unwrap();
    let first = handle.state().query_id().unwrap();

    // "a" finishes and reports before the controller sees "ab".
    backend.gate.notify_one();
    handle.submit("ab");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(*backend.finished.lock().unwrap(), vec!["a"]);
    let state = handle.state();
    assert!(state.loading());
    assert!(state.query_id().unwrap() > first);
    assert!(state.results().is_empty());

    let settled = wait_settled(&mut rx).await;
    assert_eq!(names(&settled), vec!["ab"]);
}

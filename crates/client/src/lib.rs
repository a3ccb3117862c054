pub mod api;
pub mod controller;
pub mod display;
pub mod machine;

pub use api::{ApiClient, SearchBackend, SearchFailure};
pub use controller::{SearchController, SearchHandle};
pub use machine::{QueryId, SearchMachine, SearchState};

//! Test doubles for the identification pipeline.
//!
//! Available to downstream crates as well so host applications can exercise
//! their integration without touching the network.

mod mock_fetcher;

pub use mock_fetcher::MockFetcher;

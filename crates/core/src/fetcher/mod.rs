//! Page fetching abstraction.
//!
//! The identification pipeline never talks to the network directly; it goes
//! through the [`PageFetcher`] trait so that tests can substitute a mock and
//! so that every concurrent worker can run on an independent client.

mod http;
mod traits;

pub use http::HttpFetcher;
pub use traits::{FetchError, PageFetcher};

//! Small helpers shared across the merger

pub mod jitter;
pub mod retry;
pub mod url;

pub use retry::{RetryPolicy, with_retry};
pub use url::UrlUtils;

//! Link checking: the concurrent batch checker and the HTTP prober it drives.

mod concurrent_checker;
mod http_prober;

pub use concurrent_checker::{ConcurrentChecker, DEFAULT_MAX_WORKERS};
pub use http_prober::{DEFAULT_PROBE_TIMEOUT, HttpProber, classify_status};

pub mod filter;
pub mod metrics;

pub use filter::{ContentFilter, FilterVerdict, InputValidation};
pub use metrics::{TypingMetrics, compute_metrics};

//! Aggregate builders. Each is a pure function of the dataset, the configured
//! limits and the current time.

pub mod active_trace;
pub mod gaps;
pub mod popular;
pub mod ranking;
pub mod streamgraph;
pub mod time_of_day;
pub mod types;

pub use active_trace::active_trace;
pub use popular::{top_visits, word_cloud};
pub use streamgraph::{dwell_by_domain_day, visits_by_domain_day};
pub use time_of_day::time_of_day;
pub use types::*;

pub mod history;
pub mod visit;

pub use history::{HistoryEntry, SearchFilter, TransitionType, VisitEntry};
pub use visit::VisitRecord;

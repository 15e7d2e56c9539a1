//! Local translation history.

mod store;

pub use store::{HistoryRecord, HistoryStore};

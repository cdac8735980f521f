//! Core types for the expocal calendar.
//!
//! This crate owns everything the front ends share:
//! - `Event` records and their inclusive `DateSpan`
//! - `DayIndex` for "which events overlap this day" lookups
//! - `Month` and `MonthGrid` for the Sunday-first display grid
//! - `EventCache`, the staleness-aware, single-flight cache engine
//! - the `Store`, `EventSource` and `Clock` seams it is built on

pub mod cache;
pub mod clock;
pub mod config;
pub mod constants;
pub mod credential;
pub mod date_range;
pub mod day_index;
pub mod error;
pub mod event;
pub mod month;
pub mod source;
pub mod store;

pub use cache::{CacheEntry, EventCache, Origin, Snapshot};
pub use clock::{Clock, ManualClock, SystemClock};
pub use credential::Credential;
pub use date_range::DateSpan;
pub use day_index::{DayIndex, DaySelection};
pub use error::{ExpoError, ExpoResult};
pub use event::Event;
pub use month::{DayCell, Month, MonthGrid};
pub use source::EventSource;
pub use store::{FileStore, MemoryStore, Store, StoreOp};

//! Core state for the Steam games dashboard
//!
//! This crate holds the event bus, the shared selection store and the
//! frame-driven state machines (timeline brush, carousel) that the views
//! build on. Nothing in here touches egui.

pub mod carousel;
pub mod events;
pub mod ids;
pub mod sync;
pub mod time;
pub mod timeline;
pub mod timer;

// Re-export commonly used types
pub use carousel::{page_offset, CarouselLayout, CarouselState, PageTarget};
pub use events::{DashboardEvent, EventBus, EventError, EventKind, SubscriberId};
pub use ids::{AppId, PublisherKey, INDIE_LABEL};
pub use sync::{SelectionState, SelectionStore};
pub use time::{DateExtent, Granularity, TimeFilter, TimeRange};
pub use timeline::{BrushConfig, BrushInput, BrushMachine, BrushState};
pub use timer::{IntervalTimer, OneShotTimer};

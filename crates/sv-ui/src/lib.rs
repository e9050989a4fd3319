//! Look and feel shared by the dashboard views and the app shell
//!
//! Theme, scoped widget ids, a couple of small custom widgets and the
//! full-screen loading and error states.

pub mod status;
pub mod theme;
pub mod widget_utils;
pub mod widgets;

pub use status::{error_screen, loading_screen};
pub use theme::{apply_theme, Theme};
pub use widget_utils::{indexed_id, scoped_id, ScopedId};

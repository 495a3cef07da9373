//! Terminal user interface: the per-resource detail view.
//!
//! The view redraws only when the content derived from a fresh snapshot
//! differs from what is on screen.

mod app;
mod event;
mod input;
pub mod panels;
mod render;
mod state;
mod style;
pub mod view;

pub use app::App;
pub use input::{KeyAction, handle_key};
pub use state::ViewMode;
pub use view::{DetailView, LayoutPlan, Redraw};

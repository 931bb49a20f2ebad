//! The components module contains all shared components for our app.

mod alert_banner;
mod app;
mod app_view;
mod cards;
mod icons;
mod pin_handoff;
mod sidebar;
pub mod views;

pub use alert_banner::*;
pub use app::*;
pub use app_view::*;
pub use cards::*;
pub use icons::*;
pub use pin_handoff::*;
pub use sidebar::*;

//! Server-paginated lists that follow browser back/forward.

pub mod location;
pub mod pager;

pub use location::AppLocation;
pub use pager::{HistoryPager, PageOutcome, PageState, PagerConfig};

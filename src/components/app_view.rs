//! Defines the shared application view state.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppView {
    #[default]
    Listens,
    Pins,
    Playlist,
    Settings,
}

pub fn view_label(view: &AppView) -> &'static str {
    match view {
        AppView::Listens => "Recent listens",
        AppView::Pins => "Pinned recordings",
        AppView::Playlist => "Playlist",
        AppView::Settings => "Settings",
    }
}

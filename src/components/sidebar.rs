use crate::api::ListenBrainzClient;
use crate::components::{AppView, Icon};
use crate::session::Session;
use dioxus::prelude::*;

#[component]
pub fn Sidebar() -> Element {
    let session = use_context::<Signal<Session<ListenBrainzClient>>>();
    let mut current_view = use_context::<Signal<AppView>>();
    let view = current_view();

    let account = session()
        .user_name()
        .map(str::to_string)
        .unwrap_or_else(|| "Not signed in".to_string());

    rsx! {
        aside { class: "w-64 bg-zinc-950/50 border-r border-zinc-800/50 flex flex-col h-full backdrop-blur-xl",
            // Logo
            div { class: "p-6 border-b border-zinc-800/50",
                div { class: "flex items-center gap-3",
                    div { class: "w-10 h-10 rounded-xl bg-gradient-to-br from-orange-500 to-rose-600 flex items-center justify-center text-white font-bold text-lg",
                        "B"
                    }
                    div {
                        h1 { class: "text-lg font-bold text-white", "BrainzCards" }
                        p { class: "text-xs text-zinc-500 truncate", "{account}" }
                    }
                }
            }

            nav { class: "flex-1 overflow-y-auto p-4 space-y-1",
                p { class: "text-xs font-semibold text-zinc-500 uppercase tracking-wider mb-3 px-3",
                    "Library"
                }
                NavItem {
                    icon: "clock",
                    label: "Recent listens",
                    active: view == AppView::Listens,
                    onclick: move |_| current_view.set(AppView::Listens),
                }
                NavItem {
                    icon: "pin",
                    label: "Pins",
                    active: view == AppView::Pins,
                    onclick: move |_| current_view.set(AppView::Pins),
                }
                NavItem {
                    icon: "playlist",
                    label: "Playlist",
                    active: view == AppView::Playlist,
                    onclick: move |_| current_view.set(AppView::Playlist),
                }
            }

            div { class: "p-4 border-t border-zinc-800/50",
                NavItem {
                    icon: "settings",
                    label: "Settings",
                    active: view == AppView::Settings,
                    onclick: move |_| current_view.set(AppView::Settings),
                }
            }
        }
    }
}

#[component]
fn NavItem(icon: String, label: String, active: bool, onclick: EventHandler<MouseEvent>) -> Element {
    let base_class = "flex items-center gap-3 px-3 py-2.5 rounded-xl text-sm font-medium transition-all duration-200 cursor-pointer";
    let active_class = if active {
        "bg-gradient-to-r from-orange-500/20 to-rose-500/10 text-orange-300 shadow-sm"
    } else {
        "text-zinc-400 hover:text-white hover:bg-zinc-800/50"
    };

    rsx! {
        button {
            class: "{base_class} {active_class} w-full",
            onclick: move |e| onclick.call(e),
            Icon { name: icon.clone(), class: "w-5 h-5".to_string() }
            span { "{label}" }
        }
    }
}

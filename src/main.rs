use dioxus::prelude::*;

mod actions;
mod alerts;
mod api;
mod components;
mod db;
mod history;
mod playback;
mod session;
mod utils;

use components::AppShell;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

/// Log level comes from `BRAINZCARDS_LOG` (trace, debug, info, warn, error).
fn log_level() -> tracing::Level {
    option_env!("BRAINZCARDS_LOG")
        .map(str::to_string)
        .or_else(|| std::env::var("BRAINZCARDS_LOG").ok())
        .and_then(|level| level.trim().parse().ok())
        .unwrap_or(tracing::Level::INFO)
}

fn main() {
    if let Err(err) = dioxus::logger::init(log_level()) {
        eprintln!("failed to initialize logger: {err}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Meta { name: "theme-color", content: "#eb743b" }
        document::Title { "BrainzCards" }
        document::Stylesheet { href: APP_CSS }

        AppShell {}
    }
}

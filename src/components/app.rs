use crate::alerts::Alert;
use crate::api::ListenBrainzClient;
use crate::components::views::{PlaylistView, RecentListensView, SettingsView, UserPinsView};
use crate::components::{
    view_label, AlertBanner, AlertQueue, AppView, PinHandoff, PinRecordingModal, Sidebar,
};
use crate::db::{initialize_database, load_settings, AppSettings};
use crate::playback::{current_origin, PlaybackBus, PlaybackEvent, Subscription};
use crate::session::Session;
#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
use dioxus::prelude::*;
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

/// Connects the bus to the page-level player through `window.postMessage`.
#[cfg(target_arch = "wasm32")]
fn install_player_bridge(bus: &PlaybackBus) -> Option<Subscription> {
    use crate::playback::bridge::{decode_window_message, encode_play_request};

    let win = web_sys::window()?;
    let origin = bus.origin().to_string();

    let outgoing = {
        let win = win.clone();
        bus.subscribe(move |event| {
            let PlaybackEvent::PlayRequested(item) = event else {
                return;
            };
            let message = encode_play_request(item).to_string();
            match js_sys::JSON::parse(&message) {
                Ok(value) => {
                    if let Err(err) = win.post_message(&value, &origin) {
                        tracing::warn!(?err, "could not post play request");
                    }
                }
                Err(err) => tracing::warn!(?err, "could not encode play request"),
            }
        })
    };

    let runtime = Runtime::current();
    let incoming_bus = bus.clone();
    let on_message = Closure::wrap(Box::new(move |e: web_sys::MessageEvent| {
        let _guard = RuntimeGuard::new(runtime.clone());
        let Some(raw) = js_sys::JSON::stringify(&e.data())
            .ok()
            .and_then(|s| s.as_string())
        else {
            return;
        };
        let Ok(data) = serde_json::from_str::<serde_json::Value>(&raw) else {
            return;
        };
        if let Some(event) = decode_window_message(&data) {
            incoming_bus.receive(&e.origin(), &event);
        }
    }) as Box<dyn FnMut(_)>);
    let _ = win.add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref());
    // Lives as long as the page.
    on_message.forget();

    Some(outgoing)
}

/// Without a page-level player, requests are confirmed straight away.
#[cfg(not(target_arch = "wasm32"))]
fn install_player_bridge(bus: &PlaybackBus) -> Option<Subscription> {
    let echo = bus.clone();
    Some(bus.subscribe(move |event| {
        if let PlaybackEvent::PlayRequested(item) = event {
            tracing::info!(track = item.track_name(), "now playing");
            echo.publish(&PlaybackEvent::NowPlayingChanged(item.clone()));
        }
    }))
}

#[component]
pub fn AppShell() -> Element {
    let mut app_settings = use_signal(AppSettings::default);
    let mut session = use_signal(|| Session::anonymous(ListenBrainzClient::new("")));
    let mut settings_loaded = use_signal(|| false);
    let current_view = use_signal(AppView::default);
    let alerts = use_signal(Vec::<Alert>::new);
    let alert_ids = use_signal(|| 0u64);
    let mut alert_timeout = use_signal(|| AppSettings::default().alert_timeout_ms);
    let pin_selected = use_signal(|| None);
    let alert_queue = AlertQueue::new(alerts, alert_ids, alert_timeout);
    let pin_handoff = PinHandoff::new(pin_selected);

    let bus = use_hook(|| PlaybackBus::new(current_origin()));
    let _bridge = use_hook(|| Rc::new(install_player_bridge(&bus)));

    use_context_provider(|| bus.clone());
    use_context_provider(|| session);
    use_context_provider(|| app_settings);
    use_context_provider(|| current_view);
    use_context_provider(|| alert_queue);
    use_context_provider(|| pin_handoff);

    // Load settings and restore the session on mount
    use_hook(move || {
        spawn(async move {
            if let Err(err) = initialize_database().await {
                tracing::error!(error = %err, "failed to initialize settings storage");
            }
            match load_settings().await {
                Ok(settings) => {
                    session.set(Session::new(
                        ListenBrainzClient::new(settings.api_url.clone()),
                        settings.user.clone(),
                    ));
                    alert_timeout.set(settings.alert_timeout_ms);
                    tracing::info!(
                        user = ?settings.user.as_ref().map(|u| &u.name),
                        "settings loaded"
                    );
                    app_settings.set(settings);
                }
                Err(err) => tracing::warn!(error = %err, "could not load settings, using defaults"),
            }
            settings_loaded.set(true);
        });
    });

    let view = current_view();
    let user = session().user_name().map(str::to_string);
    let api_url = session().api.api_url.clone();

    let content = if !settings_loaded() {
        rsx! {
            p { class: "text-zinc-500 text-sm", "Loading…" }
        }
    } else {
        match (view, user) {
            (AppView::Settings, _) => rsx! { SettingsView {} },
            (AppView::Playlist, _) => rsx! { PlaylistView { key: "{api_url}" } },
            (AppView::Listens, Some(user)) => rsx! {
                RecentListensView { key: "{api_url}/{user}", user_name: user.clone() }
            },
            (AppView::Pins, Some(user)) => rsx! {
                UserPinsView { key: "{api_url}/{user}", user_name: user.clone() }
            },
            (_, None) => rsx! {
                p { class: "text-zinc-400 text-sm",
                    "Add your ListenBrainz user name and token in Settings to see your listens and pins."
                }
            },
        }
    };

    rsx! {
        div { class: "app-container flex min-h-screen text-white overflow-hidden",
            Sidebar {}

            div { class: "flex-1 flex flex-col overflow-hidden",
                header { class: "border-b border-zinc-800/60 bg-zinc-950/80 backdrop-blur-xl px-6 py-3",
                    span { class: "text-sm font-semibold text-white", "{view_label(&view)}" }
                }
                main { class: "flex-1 overflow-y-auto main-scroll",
                    div { class: "page-shell p-6",
                        {content}
                    }
                }
            }
        }

        AlertBanner {}

        PinRecordingModal { handoff: pin_handoff }
    }
}

use crate::alerts::{AlertKind, AlertSink};
use crate::api::{Item, ListenBrainzClient, STATUS_OK};
use crate::components::{AlertQueue, Icon};
use crate::session::Session;
use dioxus::prelude::*;

/// Hands the selected item to the pin modal.
#[derive(Clone, Copy, PartialEq)]
pub struct PinHandoff {
    pub selected: Signal<Option<Item>>,
}

impl PinHandoff {
    pub fn new(selected: Signal<Option<Item>>) -> Self {
        Self { selected }
    }

    pub fn open(&mut self, item: Item) {
        self.selected.set(Some(item));
    }

    pub fn close(&mut self) {
        self.selected.set(None);
    }

    pub fn current(&self) -> Option<Item> {
        (self.selected)()
    }
}

#[component]
pub fn PinRecordingModal(handoff: PinHandoff) -> Element {
    let session = use_context::<Signal<Session<ListenBrainzClient>>>();
    let alerts = use_context::<AlertQueue>();
    let mut blurb = use_signal(String::new);
    let mut submitting = use_signal(|| false);

    let Some(item) = handoff.current() else {
        return rsx! {};
    };

    let on_close = {
        let mut handoff = handoff;
        move |_| {
            blurb.set(String::new());
            handoff.close();
        }
    };

    let on_pin = {
        let item = item.clone();
        let mut handoff = handoff;
        move |_| {
            let session = session();
            let Some(token) = session.auth_token().map(str::to_string) else {
                return;
            };
            let item = item.clone();
            let text = blurb();
            submitting.set(true);
            spawn(async move {
                let result = session
                    .api
                    .pin_recording(&token, &item, Some(text.as_str()))
                    .await;
                submitting.set(false);
                match result {
                    Ok(STATUS_OK) => {
                        alerts.new_alert(
                            AlertKind::Success,
                            "You pinned a recording!",
                            &format!("{} - {}", item.artist_name(), item.track_name()),
                        );
                        blurb.set(String::new());
                        handoff.close();
                    }
                    Ok(status) => alerts.new_alert(
                        AlertKind::Danger,
                        "Error while pinning track",
                        &format!("unexpected status {status}"),
                    ),
                    Err(err) => {
                        alerts.new_alert(AlertKind::Danger, "Error while pinning track", &err.to_string())
                    }
                }
            });
        }
    };

    rsx! {
        div { class: "fixed inset-0 z-40 flex items-center justify-center bg-black/60 backdrop-blur-sm",
            div { class: "w-full max-w-md rounded-2xl bg-zinc-900 border border-zinc-800 p-6 space-y-4",
                div { class: "flex items-center justify-between",
                    h2 { class: "text-lg font-semibold text-white", "Pin this track" }
                    button {
                        class: "p-2 rounded-lg text-zinc-400 hover:text-white",
                        aria_label: "Close",
                        onclick: on_close,
                        Icon { name: "x".to_string(), class: "w-4 h-4".to_string() }
                    }
                }
                p { class: "text-sm text-zinc-300",
                    "{item.track_name()} "
                    span { class: "text-zinc-500", "by {item.artist_name()}" }
                }
                textarea {
                    class: "w-full rounded-xl bg-zinc-800 p-3 text-sm text-white",
                    placeholder: "Let your followers know why you are showcasing this track",
                    maxlength: "280",
                    value: "{blurb}",
                    oninput: move |evt| blurb.set(evt.value()),
                }
                button {
                    class: "w-full py-2 rounded-xl bg-emerald-500 text-white font-medium disabled:opacity-50",
                    disabled: submitting() || session().auth_token().is_none(),
                    onclick: on_pin,
                    "Pin track"
                }
            }
        }
    }
}

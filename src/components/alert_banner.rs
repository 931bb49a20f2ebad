use crate::actions::removal::delay_ms;
use crate::alerts::{Alert, AlertKind, AlertSink};
use crate::components::Icon;
use dioxus::core::spawn_forever;
use dioxus::prelude::*;

/// Alert sink backed by signals; every alert expires on its own.
#[derive(Clone, Copy, PartialEq)]
pub struct AlertQueue {
    pub alerts: Signal<Vec<Alert>>,
    next_id: Signal<u64>,
    timeout_ms: Signal<u64>,
}

impl AlertQueue {
    pub fn new(alerts: Signal<Vec<Alert>>, next_id: Signal<u64>, timeout_ms: Signal<u64>) -> Self {
        Self {
            alerts,
            next_id,
            timeout_ms,
        }
    }

    pub fn dismiss(&self, id: u64) {
        let mut alerts = self.alerts;
        alerts.with_mut(|items| items.retain(|alert| alert.id != id));
    }
}

impl AlertSink for AlertQueue {
    fn new_alert(&self, kind: AlertKind, title: &str, message: &str) {
        let mut next_id = self.next_id;
        let id = next_id() + 1;
        next_id.set(id);

        let mut alerts = self.alerts;
        alerts.write().push(Alert {
            id,
            kind,
            title: title.to_string(),
            message: message.to_string(),
        });

        let queue = *self;
        let timeout = (self.timeout_ms)();
        // Outlives the view that raised the alert.
        spawn_forever(async move {
            delay_ms(timeout).await;
            queue.dismiss(id);
        });
    }
}

#[component]
pub fn AlertBanner() -> Element {
    let queue = use_context::<AlertQueue>();
    let alerts = (queue.alerts)();

    if alerts.is_empty() {
        return rsx! {};
    }

    rsx! {
        div { class: "fixed top-4 right-4 z-50 flex flex-col gap-2 w-80",
            for alert in alerts {
                div {
                    key: "{alert.id}",
                    class: "{alert.kind.css_class()} rounded-xl border px-4 py-3 shadow-lg backdrop-blur-xl",
                    role: "alert",
                    div { class: "flex items-start justify-between gap-3",
                        div { class: "min-w-0",
                            p { class: "text-sm font-semibold", "{alert.title}" }
                            if !alert.message.is_empty() {
                                p { class: "text-xs opacity-80 break-words", "{alert.message}" }
                            }
                        }
                        button {
                            class: "p-1 rounded hover:bg-black/20",
                            aria_label: "Dismiss",
                            onclick: move |_| queue.dismiss(alert.id),
                            Icon { name: "x".to_string(), class: "w-4 h-4".to_string() }
                        }
                    }
                }
            }
        }
    }
}

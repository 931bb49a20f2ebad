use crate::alerts::{AlertKind, AlertSink};
use crate::api::{CurrentUser, ListenBrainzClient};
use crate::components::AlertQueue;
use crate::db::{save_settings, AppSettings, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::session::Session;
use dioxus::prelude::*;

async fn persist(settings: AppSettings, alerts: AlertQueue) {
    match save_settings(settings).await {
        Ok(()) => alerts.new_alert(AlertKind::Success, "Settings saved", ""),
        Err(err) => {
            tracing::warn!(error = %err, "could not save settings");
            alerts.new_alert(AlertKind::Danger, "Could not save settings", &err.to_string())
        }
    }
}

#[component]
pub fn SettingsView() -> Element {
    let mut session = use_context::<Signal<Session<ListenBrainzClient>>>();
    let mut app_settings = use_context::<Signal<AppSettings>>();
    let alerts = use_context::<AlertQueue>();

    let initial = app_settings.peek().clone();
    let mut api_url = use_signal(|| initial.api_url.clone());
    let mut user_name = use_signal(|| {
        initial
            .user
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_default()
    });
    let mut auth_token = use_signal(|| {
        initial
            .user
            .as_ref()
            .map(|u| u.auth_token.clone())
            .unwrap_or_default()
    });
    let mut page_size = use_signal(|| initial.page_size.to_string());
    let mut grace_ms = use_signal(|| initial.removal_grace_ms.to_string());

    let signed_in_as = session().user_name().map(str::to_string);

    let on_save = move |evt: FormEvent| {
        evt.prevent_default();
        let current = app_settings();
        let user = Some(CurrentUser::new(user_name(), auth_token()));
        let updated = AppSettings {
            api_url: api_url(),
            page_size: page_size().trim().parse().unwrap_or(current.page_size),
            removal_grace_ms: grace_ms().trim().parse().unwrap_or(current.removal_grace_ms),
            user,
            ..current
        }
        .sanitized();

        api_url.set(updated.api_url.clone());
        page_size.set(updated.page_size.to_string());
        session.set(Session::new(
            ListenBrainzClient::new(updated.api_url.clone()),
            updated.user.clone(),
        ));
        tracing::info!(user = ?updated.user.as_ref().map(|u| &u.name), "session updated");
        app_settings.set(updated.clone());
        spawn(persist(updated, alerts));
    };

    let on_sign_out = move |_| {
        let ended = session().sign_out();
        session.set(ended);
        user_name.set(String::new());
        auth_token.set(String::new());
        let mut updated = app_settings();
        updated.user = None;
        app_settings.set(updated.clone());
        spawn(persist(updated, alerts));
    };

    rsx! {
        div { class: "max-w-xl space-y-6",
            h1 { class: "text-2xl font-bold text-white", "Settings" }

            if let Some(name) = signed_in_as {
                div { class: "flex items-center justify-between rounded-xl bg-zinc-900 border border-zinc-800 p-4",
                    p { class: "text-sm text-zinc-300", "Signed in as "
                        span { class: "font-semibold text-white", "{name}" }
                    }
                    button {
                        class: "px-3 py-1.5 rounded-lg text-sm text-red-300 hover:bg-red-500/10",
                        onclick: on_sign_out,
                        "Sign out"
                    }
                }
            }

            form { class: "space-y-4", onsubmit: on_save,
                SettingsField { label: "API URL",
                    input {
                        class: "w-full rounded-xl bg-zinc-800 px-3 py-2 text-sm text-white",
                        value: "{api_url}",
                        oninput: move |evt| api_url.set(evt.value()),
                    }
                }
                SettingsField { label: "User name",
                    input {
                        class: "w-full rounded-xl bg-zinc-800 px-3 py-2 text-sm text-white",
                        value: "{user_name}",
                        oninput: move |evt| user_name.set(evt.value()),
                    }
                }
                SettingsField { label: "User token",
                    input {
                        class: "w-full rounded-xl bg-zinc-800 px-3 py-2 text-sm text-white",
                        r#type: "password",
                        value: "{auth_token}",
                        oninput: move |evt| auth_token.set(evt.value()),
                    }
                }
                SettingsField { label: "Items per page ({MIN_PAGE_SIZE}-{MAX_PAGE_SIZE})",
                    input {
                        class: "w-32 rounded-xl bg-zinc-800 px-3 py-2 text-sm text-white",
                        r#type: "number",
                        min: "{MIN_PAGE_SIZE}",
                        max: "{MAX_PAGE_SIZE}",
                        value: "{page_size}",
                        oninput: move |evt| page_size.set(evt.value()),
                    }
                }
                SettingsField { label: "Removal delay after delete (ms)",
                    input {
                        class: "w-32 rounded-xl bg-zinc-800 px-3 py-2 text-sm text-white",
                        r#type: "number",
                        min: "0",
                        value: "{grace_ms}",
                        oninput: move |evt| grace_ms.set(evt.value()),
                    }
                }
                button {
                    class: "px-4 py-2 rounded-xl bg-emerald-500 text-white text-sm font-medium",
                    r#type: "submit",
                    "Save"
                }
            }
        }
    }
}

#[component]
fn SettingsField(label: String, children: Element) -> Element {
    rsx! {
        label { class: "block space-y-1",
            span { class: "text-xs font-semibold uppercase tracking-wider text-zinc-500", "{label}" }
            {children}
        }
    }
}

use crate::alerts::{AlertKind, AlertSink};
use crate::api::{FeedbackScore, Item, ItemIdentity, ListenBrainzClient};
use crate::components::{AlertQueue, Icon, ListenCard};
use crate::db::AppSettings;
use crate::session::Session;
use dioxus::prelude::*;
use std::collections::HashMap;

/// The signed-in user's most recent listens.
#[component]
pub fn RecentListensView(user_name: String) -> Element {
    let session = use_context::<Signal<Session<ListenBrainzClient>>>();
    let settings = use_context::<Signal<AppSettings>>();
    let alerts = use_context::<AlertQueue>();
    let mut listens = use_signal(Vec::<Item>::new);
    let mut loading = use_signal(|| false);
    let mut reload = use_signal(|| 0u32);
    // Scores by recording msid: stored ones from the server, then confirmed toggles.
    let mut feedback = use_signal(HashMap::<String, FeedbackScore>::new);

    use_effect({
        let user_name = user_name.clone();
        move || {
            let _ = reload();
            let client = session.peek().api.clone();
            let count = settings.peek().page_size;
            let user_name = user_name.clone();
            loading.set(true);
            spawn(async move {
                match client.get_recent_listens(&user_name, count).await {
                    Ok(items) => {
                        tracing::debug!(count = items.len(), "recent listens loaded");
                        let items: Vec<Item> = items.into_iter().map(Item::Listen).collect();
                        let msids: Vec<&str> =
                            items.iter().filter_map(Item::recording_msid).collect();
                        match client.get_feedback_for_recordings(&user_name, &msids).await {
                            Ok(stored) => feedback.set(stored),
                            Err(err) => {
                                tracing::warn!(error = %err, "could not load feedback for listens")
                            }
                        }
                        listens.set(items);
                    }
                    Err(err) => alerts.new_alert(
                        AlertKind::Warning,
                        "Could not load listens",
                        &err.describe(),
                    ),
                }
                loading.set(false);
            });
        }
    });

    let on_removed = move |identity: ItemIdentity| {
        listens.with_mut(|items| items.retain(|item| item.identity() != identity));
    };
    let on_feedback = move |(msid, score): (String, FeedbackScore)| {
        feedback.with_mut(|scores| {
            scores.insert(msid, score);
        });
    };

    let scores = feedback();
    let cards: Vec<_> = listens()
        .into_iter()
        .map(|item| {
            let score = item
                .recording_msid()
                .and_then(|msid| scores.get(msid).copied())
                .unwrap_or_default();
            (format!("{:?}", item.identity()), item, score)
        })
        .collect();

    rsx! {
        div { class: "space-y-4",
            header { class: "flex items-center justify-between",
                h1 { class: "text-2xl font-bold text-white", "Recent listens" }
                button {
                    class: "p-2 rounded-lg text-zinc-400 hover:text-white hover:bg-zinc-800 disabled:opacity-40",
                    aria_label: "Refresh",
                    disabled: loading(),
                    onclick: move |_| reload += 1,
                    Icon {
                        name: if loading() { "loader".to_string() } else { "clock".to_string() },
                        class: "w-5 h-5".to_string(),
                    }
                }
            }
            div { class: "space-y-1",
                if cards.is_empty() && !loading() {
                    p { class: "text-zinc-500 text-sm", "No listens yet" }
                }
                for (key, item, score) in cards {
                    ListenCard {
                        key: "{key}",
                        item,
                        initial_feedback: score,
                        show_username: false,
                        on_removed,
                        on_feedback,
                    }
                }
            }
        }
    }
}

use crate::alerts::{AlertKind, AlertSink};
use crate::api::{Item, ItemIdentity, ListenBrainzClient, Playlist};
use crate::components::{AlertQueue, Icon, PlaylistItemCard};
use crate::db::{save_settings, AppSettings};
use crate::session::Session;
use dioxus::prelude::*;

#[component]
pub fn PlaylistView() -> Element {
    let session = use_context::<Signal<Session<ListenBrainzClient>>>();
    let mut settings = use_context::<Signal<AppSettings>>();
    let alerts = use_context::<AlertQueue>();
    let mut mbid_input =
        use_signal(|| settings.peek().last_playlist_mbid.clone().unwrap_or_default());
    let mut playlist = use_signal(|| None::<Playlist>);
    let mut loading = use_signal(|| false);
    // One removal at a time: the server shifts indices as soon as it confirms.
    let mut removal_pending = use_signal(|| false);

    let mut load = move |mbid: String| {
        let mbid = mbid.trim().to_string();
        if mbid.is_empty() || loading() {
            return;
        }
        let client = session.peek().api.clone();
        loading.set(true);
        removal_pending.set(false);
        spawn(async move {
            match client.get_playlist(&mbid).await {
                Ok(fetched) => {
                    tracing::info!(
                        mbid = %fetched.mbid,
                        tracks = fetched.tracks.len(),
                        "playlist loaded"
                    );
                    playlist.set(Some(fetched));
                    let mut updated = settings();
                    if updated.last_playlist_mbid.as_deref() != Some(mbid.as_str()) {
                        updated.last_playlist_mbid = Some(mbid);
                        settings.set(updated.clone());
                        if let Err(err) = save_settings(updated).await {
                            tracing::warn!(error = %err, "could not save settings");
                        }
                    }
                }
                Err(err) => {
                    alerts.new_alert(AlertKind::Warning, "Could not load playlist", &err.describe())
                }
            }
            loading.set(false);
        });
    };

    use_hook(move || load(mbid_input.peek().clone()));

    let on_removed = move |(index, identity): (usize, ItemIdentity)| {
        playlist.with_mut(|current| {
            if let Some(current) = current {
                if !current.remove_track_at(index, &identity) {
                    tracing::warn!(index, ?identity, "removed track no longer at its index");
                }
            }
        });
        removal_pending.set(false);
    };
    let on_removal_pending = move |pending: bool| removal_pending.set(pending);

    let current = playlist();
    let mut seen = std::collections::HashMap::<String, usize>::new();
    let cards: Vec<_> = current
        .as_ref()
        .map(|current| {
            current
                .tracks
                .iter()
                .enumerate()
                .map(|(index, track)| {
                    let occurrence = seen.entry(track.id.clone()).or_default();
                    *occurrence += 1;
                    (format!("{}#{}", track.id, occurrence), index, track.clone())
                })
                .collect()
        })
        .unwrap_or_default();

    rsx! {
        div { class: "space-y-4",
            form {
                class: "flex items-center gap-2",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    load(mbid_input());
                },
                input {
                    class: "flex-1 rounded-xl bg-zinc-800 px-3 py-2 text-sm text-white",
                    placeholder: "Playlist MBID",
                    value: "{mbid_input}",
                    oninput: move |evt| mbid_input.set(evt.value()),
                }
                button {
                    class: "px-4 py-2 rounded-xl bg-emerald-500 text-white text-sm disabled:opacity-50",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() {
                        Icon { name: "loader".to_string(), class: "w-4 h-4".to_string() }
                    } else {
                        "Open"
                    }
                }
            }

            if let Some(current) = current {
                header {
                    h1 { class: "text-2xl font-bold text-white", "{current.title}" }
                    p { class: "text-sm text-zinc-400", "by {current.creator}" }
                }
                div { class: "space-y-1",
                    if current.tracks.is_empty() {
                        p { class: "text-zinc-500 text-sm", "This playlist is empty" }
                    }
                    for (key, index, track) in cards {
                        PlaylistItemCard {
                            key: "{key}",
                            item: Item::PlaylistTrack(track),
                            index,
                            playlist_mbid: current.mbid.clone(),
                            playlist_owner: current.creator.clone(),
                            removal_locked: removal_pending(),
                            on_removal_pending,
                            on_removed,
                        }
                    }
                }
            }
        }
    }
}

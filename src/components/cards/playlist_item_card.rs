use super::{card_actions, use_card_playback, use_removal_slot};
use crate::api::{Item, ItemIdentity, ListenBrainzClient};
use crate::components::{AlertQueue, Icon};
use crate::db::AppSettings;
use crate::session::Session;
use crate::utils::format_duration_ms;
use dioxus::prelude::*;

#[component]
pub fn PlaylistItemCard(
    item: Item,
    index: usize,
    playlist_mbid: String,
    playlist_owner: String,
    /// Set while another removal in this playlist awaits its grace delay;
    /// indices are only stable once it has landed.
    removal_locked: bool,
    on_removal_pending: EventHandler<bool>,
    on_removed: EventHandler<(usize, ItemIdentity)>,
) -> Element {
    let session = use_context::<Signal<Session<ListenBrainzClient>>>();
    let settings = use_context::<Signal<AppSettings>>();
    let alerts = use_context::<AlertQueue>();
    let (playing, playback) = use_card_playback(&item);
    let mut deleted = use_signal(|| false);
    let removal_slot = use_removal_slot();

    let can_remove = card_actions(&session(), alerts, &settings(), None)
        .can_edit_playlist(&playlist_owner);
    let (duration, added_by) = match &item {
        Item::PlaylistTrack(track) => (format_duration_ms(track.duration_ms), track.added_by.clone()),
        _ => (String::new(), None),
    };

    let on_play = {
        let playback = playback.clone();
        move |_| {
            playback.play();
        }
    };

    let on_remove = {
        let item = item.clone();
        let removal_slot = removal_slot.clone();
        move |_| {
            if removal_locked {
                return;
            }
            let actions = card_actions(&session(), alerts, &settings(), None);
            let item = item.clone();
            let playlist_mbid = playlist_mbid.clone();
            let playlist_owner = playlist_owner.clone();
            let removal_slot = removal_slot.clone();
            on_removal_pending.call(true);
            spawn(async move {
                let Some(pending) = actions
                    .remove_playlist_track(&playlist_mbid, &playlist_owner, index, &item)
                    .await
                else {
                    on_removal_pending.call(false);
                    return;
                };
                deleted.set(true);
                *removal_slot.borrow_mut() = Some(pending.canceller());
                match pending.elapsed().await {
                    Some(identity) => {
                        removal_slot.borrow_mut().take();
                        on_removed.call((index, identity));
                    }
                    None => on_removal_pending.call(false),
                }
            });
        }
    };

    rsx! {
        div {
            class: if deleted() {
                "playlist-item-card deleted w-full flex items-center gap-4 p-3 rounded-xl opacity-40 pointer-events-none"
            } else if playing() {
                "playlist-item-card current-listen w-full flex items-center gap-4 p-3 rounded-xl bg-emerald-500/5 group"
            } else {
                "playlist-item-card w-full flex items-center gap-4 p-3 rounded-xl hover:bg-zinc-800/50 transition-colors group"
            },
            button {
                class: "w-6 text-sm text-zinc-500 hover:text-white",
                aria_label: "Play",
                onclick: on_play,
                if playing() {
                    Icon { name: "equalizer".to_string(), class: "w-4 h-4 text-emerald-400".to_string() }
                } else {
                    span { class: "group-hover:hidden", "{index + 1}" }
                    span { class: "hidden group-hover:block",
                        Icon { name: "play".to_string(), class: "w-4 h-4".to_string() }
                    }
                }
            }
            div { class: "flex-1 min-w-0 text-left",
                p { class: "text-sm font-medium text-white truncate", "{item.track_name()}" }
                p { class: "text-xs text-zinc-400 truncate", "{item.artist_name()}" }
            }
            if let Some(added_by) = added_by {
                span { class: "hidden md:block text-xs text-zinc-500", "added by {added_by}" }
            }
            span { class: "text-sm text-zinc-500", "{duration}" }
            if can_remove {
                button {
                    class: "p-2 rounded-lg text-zinc-500 hover:text-red-400 opacity-100 md:opacity-0 md:group-hover:opacity-100 disabled:opacity-30",
                    aria_label: "Remove from playlist",
                    disabled: removal_locked,
                    onclick: on_remove,
                    Icon { name: "trash".to_string(), class: "w-4 h-4".to_string() }
                }
            }
        }
    }
}

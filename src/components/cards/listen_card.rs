use super::{card_actions, use_card_playback, use_removal_slot, CardActions};
use crate::api::{FeedbackScore, Item, ItemIdentity, ListenBrainzClient};
use crate::components::{AlertQueue, Icon, PinHandoff};
use crate::db::AppSettings;
use crate::session::Session;
use crate::utils::format_listened_at;
use dioxus::prelude::*;

/// Card for a listen or a pinned recording.
///
/// `pins_owner` is set on a pins page; the owner may delete pins there.
#[component]
pub fn ListenCard(
    item: Item,
    #[props(default)] initial_feedback: FeedbackScore,
    #[props(default)] pins_owner: Option<String>,
    #[props(default)] show_username: bool,
    on_removed: EventHandler<ItemIdentity>,
    #[props(default)] on_feedback: Option<EventHandler<(String, FeedbackScore)>>,
) -> Element {
    let session = use_context::<Signal<Session<ListenBrainzClient>>>();
    let settings = use_context::<Signal<AppSettings>>();
    let alerts = use_context::<AlertQueue>();
    let pin_handoff = use_context::<PinHandoff>();
    let (playing, playback) = use_card_playback(&item);
    let feedback = use_signal(|| initial_feedback);
    let mut deleted = use_signal(|| false);
    let removal_slot = use_removal_slot();

    let probe = card_actions(&session(), alerts, &settings(), None);
    let can_feedback = probe.can_give_feedback(&item);
    let can_recommend = probe.can_recommend(&item);
    let can_pin = session().auth_token().is_some() && item.recording_msid().is_some();
    let can_delete = match (&item, pins_owner.as_deref()) {
        (Item::PinnedRecording(_), Some(owner)) => probe.can_delete_pin(&item, owner),
        (Item::Listen(_), _) => probe.can_delete_listen(&item),
        _ => false,
    };

    let on_play = {
        let playback = playback.clone();
        move |_| {
            playback.play();
        }
    };

    let on_love = {
        let item = item.clone();
        move |_| {
            let actions = card_actions(&session(), alerts, &settings(), on_feedback);
            spawn(toggle_feedback(actions, item.clone(), feedback, FeedbackScore::Loved));
        }
    };
    let on_hate = {
        let item = item.clone();
        move |_| {
            let actions = card_actions(&session(), alerts, &settings(), on_feedback);
            spawn(toggle_feedback(actions, item.clone(), feedback, FeedbackScore::Hated));
        }
    };

    let on_delete = {
        let item = item.clone();
        let pins_owner = pins_owner.clone();
        let removal_slot = removal_slot.clone();
        move |_| {
            let actions = card_actions(&session(), alerts, &settings(), None);
            let item = item.clone();
            let pins_owner = pins_owner.clone();
            let removal_slot = removal_slot.clone();
            spawn(async move {
                let pending = match (&item, pins_owner.as_deref()) {
                    (Item::PinnedRecording(_), Some(owner)) => {
                        actions.delete_pin(&item, owner).await
                    }
                    _ => actions.delete_listen(&item).await,
                };
                let Some(pending) = pending else {
                    return;
                };
                deleted.set(true);
                *removal_slot.borrow_mut() = Some(pending.canceller());
                if let Some(identity) = pending.elapsed().await {
                    removal_slot.borrow_mut().take();
                    on_removed.call(identity);
                }
            });
        }
    };

    let on_recommend = {
        let item = item.clone();
        move |_| {
            let actions = card_actions(&session(), alerts, &settings(), None);
            let item = item.clone();
            spawn(async move {
                actions.recommend_to_followers(&item).await;
            });
        }
    };

    let on_pin = {
        let item = item.clone();
        let mut pin_handoff = pin_handoff;
        move |_| pin_handoff.open(item.clone())
    };

    let (timestamp, blurb, user_name) = match &item {
        Item::Listen(listen) if listen.playing_now => (
            Some("Playing now".to_string()),
            None,
            listen.user_name.clone(),
        ),
        Item::Listen(listen) => (
            format_listened_at(listen.listened_at, chrono::Utc::now()),
            None,
            listen.user_name.clone(),
        ),
        Item::PinnedRecording(pin) => (
            format_listened_at(Some(pin.created), chrono::Utc::now()),
            pin.blurb_content.clone(),
            None,
        ),
        Item::PlaylistTrack(_) => (None, None, None),
    };

    let container_class = match (deleted(), playing()) {
        (true, _) => "listen-card deleted opacity-40 pointer-events-none",
        (false, true) => "listen-card current-listen bg-emerald-500/5",
        (false, false) => "listen-card hover:bg-zinc-800/50",
    };
    let score = feedback();

    rsx! {
        div { class: "{container_class} w-full flex items-center gap-4 p-3 rounded-xl transition-colors group",
            button {
                class: "w-10 h-10 rounded bg-zinc-800 flex items-center justify-center flex-shrink-0 text-zinc-300 hover:text-emerald-400",
                aria_label: "Play",
                onclick: on_play,
                if playing() {
                    Icon { name: "equalizer".to_string(), class: "w-4 h-4 text-emerald-400".to_string() }
                } else {
                    Icon { name: "play".to_string(), class: "w-4 h-4".to_string() }
                }
            }
            div { class: "flex-1 min-w-0 text-left",
                p { class: if playing() { "text-sm font-medium text-emerald-400 truncate" } else { "text-sm font-medium text-white truncate" },
                    "{item.track_name()}"
                }
                p { class: "text-xs text-zinc-400 truncate",
                    "{item.artist_name()}"
                    if let Some(release) = item.release_name() {
                        span { class: "text-zinc-500", " · {release}" }
                    }
                }
                if let Some(blurb) = blurb {
                    p { class: "text-xs italic text-zinc-500 truncate", "\"{blurb}\"" }
                }
            }
            div { class: "hidden sm:flex flex-col items-end text-xs text-zinc-500",
                if show_username {
                    if let Some(user) = user_name {
                        span { "{user}" }
                    }
                }
                if let Some(timestamp) = timestamp {
                    span { class: "listen-time", "{timestamp}" }
                }
            }
            if can_feedback {
                div { class: "flex items-center gap-1",
                    button {
                        class: if score == FeedbackScore::Loved { "p-2 text-emerald-400" } else { "p-2 text-zinc-500 hover:text-emerald-400" },
                        aria_label: "Love",
                        onclick: on_love,
                        Icon {
                            name: if score == FeedbackScore::Loved { "heart-filled".to_string() } else { "heart".to_string() },
                            class: "w-4 h-4".to_string(),
                        }
                    }
                    button {
                        class: if score == FeedbackScore::Hated { "p-2 text-red-400" } else { "p-2 text-zinc-500 hover:text-red-400" },
                        aria_label: "Hate",
                        onclick: on_hate,
                        Icon {
                            name: if score == FeedbackScore::Hated { "heart-crack-filled".to_string() } else { "heart-crack".to_string() },
                            class: "w-4 h-4".to_string(),
                        }
                    }
                }
            }
            div { class: "flex items-center gap-1 opacity-100 md:opacity-0 md:group-hover:opacity-100",
                if can_pin {
                    button {
                        class: "p-2 rounded-lg text-zinc-500 hover:text-emerald-400",
                        aria_label: "Pin this track",
                        onclick: on_pin,
                        Icon { name: "pin".to_string(), class: "w-4 h-4".to_string() }
                    }
                }
                if can_recommend {
                    button {
                        class: "p-2 rounded-lg text-zinc-500 hover:text-emerald-400",
                        aria_label: "Recommend to my followers",
                        onclick: on_recommend,
                        Icon { name: "share".to_string(), class: "w-4 h-4".to_string() }
                    }
                }
                if can_delete {
                    button {
                        class: "p-2 rounded-lg text-zinc-500 hover:text-red-400",
                        aria_label: "Delete",
                        onclick: on_delete,
                        Icon { name: "trash".to_string(), class: "w-4 h-4".to_string() }
                    }
                }
            }
        }
    }
}

async fn toggle_feedback(
    actions: CardActions,
    item: Item,
    mut feedback: Signal<FeedbackScore>,
    requested: FeedbackScore,
) {
    let current = feedback();
    if let Some(score) = actions.submit_feedback(&item, current, requested).await {
        feedback.set(score);
    }
}

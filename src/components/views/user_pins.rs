use crate::api::{ItemIdentity, ListenBrainzClient};
use crate::components::{AlertQueue, Icon, ListenCard};
use crate::db::AppSettings;
use crate::history::{AppLocation, HistoryPager, PageOutcome, PageState, PagerConfig};
use crate::session::Session;
use dioxus::prelude::*;
use std::rc::Rc;

type PinsPager = HistoryPager<ListenBrainzClient, AppLocation, AlertQueue>;

const LIST_CONTAINER_ID: &str = "pinned-recordings";

#[cfg(target_arch = "wasm32")]
fn scroll_list_into_view() {
    let Some(element) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(LIST_CONTAINER_ID))
    else {
        return;
    };
    let options = web_sys::ScrollIntoViewOptions::new();
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

#[cfg(not(target_arch = "wasm32"))]
fn scroll_list_into_view() {}

/// Bumps `tick` on every `popstate` while the view is mounted.
#[cfg(target_arch = "wasm32")]
fn use_popstate(mut tick: Signal<u64>) {
    use dioxus::core::{Runtime, RuntimeGuard};
    use std::cell::RefCell;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    let listener = use_hook(|| {
        let runtime = Runtime::current();
        let callback = Closure::wrap(Box::new(move |_e: web_sys::PopStateEvent| {
            let _guard = RuntimeGuard::new(runtime.clone());
            let next = *tick.peek() + 1;
            tick.set(next);
        }) as Box<dyn FnMut(_)>);
        if let Some(win) = web_sys::window() {
            let _ = win
                .add_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref());
        }
        Rc::new(RefCell::new(Some(callback)))
    });

    use_drop(move || {
        let Some(callback) = listener.borrow_mut().take() else {
            return;
        };
        if let Some(win) = web_sys::window() {
            let _ = win.remove_event_listener_with_callback(
                "popstate",
                callback.as_ref().unchecked_ref(),
            );
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn use_popstate(_tick: Signal<u64>) {}

/// Paginated list of a user's pinned recordings.
#[component]
pub fn UserPinsView(user_name: String) -> Element {
    let session = use_context::<Signal<Session<ListenBrainzClient>>>();
    let settings = use_context::<Signal<AppSettings>>();
    let alerts = use_context::<AlertQueue>();
    let state = use_signal(PageState::default);

    let pager: Rc<PinsPager> = use_hook(|| {
        let config = PagerConfig::new(user_name.clone(), "pinned recordings")
            .with_page_size(settings.peek().page_size);
        let pager = Rc::new(HistoryPager::new(
            session.peek().api.clone(),
            AppLocation::default(),
            alerts,
            config,
        ));
        pager.set_observer(move |snapshot| {
            let mut state = state;
            state.set(snapshot.clone());
        });
        pager
    });

    use_hook({
        let pager = pager.clone();
        move || {
            spawn(async move {
                pager.bootstrap().await;
            });
        }
    });
    let navigation_tick = use_signal(|| 0u64);
    use_popstate(navigation_tick);
    use_effect({
        let pager = pager.clone();
        move || {
            if navigation_tick() == 0 {
                return;
            }
            let pager = pager.clone();
            spawn(async move {
                pager.on_external_navigation().await;
            });
        }
    });
    use_drop({
        let pager = pager.clone();
        move || pager.teardown()
    });

    let on_newer = {
        let pager = pager.clone();
        move |_| {
            let pager = pager.clone();
            spawn(async move {
                if pager.newer().await == PageOutcome::Loaded {
                    scroll_list_into_view();
                }
            });
        }
    };
    let on_older = {
        let pager = pager.clone();
        move |_| {
            let pager = pager.clone();
            spawn(async move {
                if pager.older().await == PageOutcome::Loaded {
                    scroll_list_into_view();
                }
            });
        }
    };
    let on_removed = {
        let pager = pager.clone();
        move |identity: ItemIdentity| {
            pager.remove_item(&identity);
        }
    };

    let page = state();
    let can_go_newer = !page.loading() && page.page > 1;
    let can_go_older = !page.loading() && page.page < page.max_page;
    let show_footer = !page.loading() && page.items.len() < pager.page_size() as usize;
    let is_owner = session().is_current_user(Some(&user_name));
    let keyed: Vec<_> = page
        .items
        .iter()
        .map(|item| (format!("{:?}", item.identity()), item.clone()))
        .collect();

    rsx! {
        div { class: "space-y-4",
            header { class: "flex items-center justify-between",
                h1 { class: "text-2xl font-bold text-white",
                    if is_owner { "Your pins" } else { "Pins by {user_name}" }
                }
                if page.loading() {
                    Icon { name: "loader".to_string(), class: "w-5 h-5 text-zinc-400".to_string() }
                }
            }

            div {
                id: LIST_CONTAINER_ID,
                class: if page.loading() { "space-y-1 opacity-60" } else { "space-y-1" },
                if page.items.is_empty() && !page.loading() {
                    p { class: "text-zinc-500 text-sm", "No pins yet" }
                }
                for (key, item) in keyed {
                    ListenCard {
                        key: "{key}",
                        item,
                        pins_owner: user_name.clone(),
                        on_removed: on_removed.clone(),
                    }
                }
                if show_footer && !page.items.is_empty() {
                    p { class: "text-center text-sm text-zinc-500 py-4", "No more pins to show" }
                }
            }

            nav { class: "flex items-center justify-between pt-2",
                button {
                    class: "flex items-center gap-1 px-3 py-2 rounded-lg text-sm text-zinc-300 hover:bg-zinc-800 disabled:opacity-40",
                    disabled: !can_go_newer,
                    onclick: on_newer,
                    Icon { name: "chevron-left".to_string(), class: "w-4 h-4".to_string() }
                    "Newer"
                }
                span { class: "text-xs text-zinc-500", "Page {page.page} of {page.max_page}" }
                button {
                    class: "flex items-center gap-1 px-3 py-2 rounded-lg text-sm text-zinc-300 hover:bg-zinc-800 disabled:opacity-40",
                    disabled: !can_go_older,
                    onclick: on_older,
                    "Older"
                    Icon { name: "chevron-right".to_string(), class: "w-4 h-4".to_string() }
                }
            }
        }
    }
}

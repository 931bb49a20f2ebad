use crate::alerts::{AlertKind, AlertSink};
use crate::api::{ApiError, Item, ItemIdentity, ListenApi};
use crate::history::location::{parse_page, LocationBar};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const DEFAULT_PAGE_SIZE: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagerStatus {
    #[default]
    Idle,
    Loading,
    Failed,
}

/// The visible window of a server-side list.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub page: u32,
    pub max_page: u32,
    pub items: Vec<Item>,
    pub status: PagerStatus,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: 1,
            max_page: 1,
            items: Vec::new(),
            status: PagerStatus::Idle,
        }
    }
}

impl PageState {
    pub fn loading(&self) -> bool {
        self.status == PagerStatus::Loading
    }
}

/// What a page request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Target was the current page (or a button precondition failed).
    Unchanged,
    Loaded,
    /// Server had nothing at that offset; the old page stays.
    Empty,
    Failed,
    /// The pager was torn down or a newer request superseded this one.
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagerConfig {
    pub user_name: String,
    pub page_size: u32,
    /// Used in alerts, e.g. "pinned recordings".
    pub label: String,
}

impl PagerConfig {
    pub fn new(user_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            page_size: DEFAULT_PAGE_SIZE,
            label: label.into(),
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

/// Number of pages needed for `total_count` items, never less than one.
pub fn max_page_for(total_count: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = total_count.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

type Observer = Rc<dyn Fn(&PageState)>;

/// Paginated history list kept in step with the address bar.
///
/// Explicit page changes push a `?page=n` entry; changes caused by browser
/// navigation never push. Every fetch carries a generation number and only
/// the most recently issued request may apply its result.
pub struct HistoryPager<A, L, N> {
    api: A,
    location: L,
    alerts: N,
    config: PagerConfig,
    state: RefCell<PageState>,
    generation: Cell<u64>,
    mounted: Cell<bool>,
    observer: RefCell<Option<Observer>>,
}

impl<A, L, N> HistoryPager<A, L, N>
where
    A: ListenApi,
    L: LocationBar,
    N: AlertSink,
{
    pub fn new(api: A, location: L, alerts: N, config: PagerConfig) -> Self {
        Self {
            api,
            location,
            alerts,
            config,
            state: RefCell::new(PageState::default()),
            generation: Cell::new(0),
            mounted: Cell::new(true),
            observer: RefCell::new(None),
        }
    }

    /// Seeds the first page, typically with data rendered alongside the view.
    pub fn initialize(&self, total_count: u64, items: Vec<Item>) {
        let page_size = self.config.page_size;
        self.update(|state| {
            state.page = 1;
            state.max_page = max_page_for(total_count, page_size);
            state.items = items;
            state.items.truncate(page_size as usize);
            state.status = PagerStatus::Idle;
        });
    }

    /// Fetches the first page itself, then follows a `?page=n` that was
    /// already in the address bar when the view opened.
    pub async fn bootstrap(&self) -> PageOutcome {
        if !self.mounted.get() {
            return PageOutcome::Discarded;
        }
        let generation = self.begin_request();
        let page_size = self.config.page_size;
        let result = self
            .api
            .fetch_page(&self.config.user_name, 0, page_size)
            .await;
        if !self.is_current(generation) {
            return PageOutcome::Discarded;
        }

        match result {
            Ok(fetched) => self.initialize(fetched.total_count, fetched.items),
            Err(err) => {
                self.report_failure(1, &err);
                return PageOutcome::Failed;
            }
        }
        match self.on_external_navigation().await {
            PageOutcome::Unchanged => PageOutcome::Loaded,
            other => other,
        }
    }

    /// Called after every state transition.
    pub fn set_observer(&self, observer: impl Fn(&PageState) + 'static) {
        *self.observer.borrow_mut() = Some(Rc::new(observer));
    }

    pub fn snapshot(&self) -> PageState {
        self.state.borrow().clone()
    }

    pub fn page(&self) -> u32 {
        self.state.borrow().page
    }

    pub fn max_page(&self) -> u32 {
        self.state.borrow().max_page
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading()
    }

    pub fn page_size(&self) -> u32 {
        self.config.page_size
    }

    pub fn can_go_older(&self) -> bool {
        let state = self.state.borrow();
        !state.loading() && state.page < state.max_page
    }

    pub fn can_go_newer(&self) -> bool {
        let state = self.state.borrow();
        !state.loading() && state.page > 1
    }

    pub async fn older(&self) -> PageOutcome {
        if !self.can_go_older() {
            return PageOutcome::Unchanged;
        }
        let target = i64::from(self.page()) + 1;
        self.go_to_page(target, true).await
    }

    pub async fn newer(&self) -> PageOutcome {
        if !self.can_go_newer() {
            return PageOutcome::Unchanged;
        }
        let target = i64::from(self.page()) - 1;
        self.go_to_page(target, true).await
    }

    /// Loads page `target`, clamped into `[1, max_page]`.
    pub async fn go_to_page(&self, target: i64, record_in_history: bool) -> PageOutcome {
        let (current, max_page) = {
            let state = self.state.borrow();
            (state.page, state.max_page)
        };
        let target = target.clamp(1, i64::from(max_page)) as u32;
        if target == current {
            return PageOutcome::Unchanged;
        }
        if !self.mounted.get() {
            return PageOutcome::Discarded;
        }

        let generation = self.begin_request();
        let page_size = self.config.page_size;
        let offset = (target - 1).saturating_mul(page_size);
        tracing::debug!(page = target, offset, "fetching {}", self.config.label);
        let result = self
            .api
            .fetch_page(&self.config.user_name, offset, page_size)
            .await;

        if !self.is_current(generation) {
            return PageOutcome::Discarded;
        }

        match result {
            Ok(fetched) if fetched.items.is_empty() => {
                tracing::info!(page = target, "server returned an empty page, keeping current one");
                self.update(|state| state.status = PagerStatus::Idle);
                PageOutcome::Empty
            }
            Ok(fetched) => {
                let max_page = max_page_for(fetched.total_count, page_size).max(target);
                self.update(|state| {
                    state.items = fetched.items;
                    state.items.truncate(page_size as usize);
                    state.page = target;
                    state.max_page = max_page;
                    state.status = PagerStatus::Idle;
                });
                if record_in_history {
                    self.location.push_page(target);
                }
                PageOutcome::Loaded
            }
            Err(err) => {
                self.report_failure(target, &err);
                PageOutcome::Failed
            }
        }
    }

    /// Re-derives the page from the address bar after back/forward.
    pub async fn on_external_navigation(&self) -> PageOutcome {
        let current = self.page();
        match parse_page(self.location.page_param().as_deref()) {
            None if current != 1 => self.go_to_page(1, false).await,
            None => PageOutcome::Unchanged,
            Some(page) if page == i64::from(current) => PageOutcome::Unchanged,
            Some(page) => self.go_to_page(page, false).await,
        }
    }

    /// Drops an item from the visible page (after a confirmed deletion).
    pub fn remove_item(&self, identity: &ItemIdentity) -> bool {
        let present = self
            .state
            .borrow()
            .items
            .iter()
            .any(|item| &item.identity() == identity);
        if present {
            self.update(|state| state.items.retain(|item| &item.identity() != identity));
        }
        present
    }

    /// The owning view is gone: late responses are ignored from now on.
    pub fn teardown(&self) {
        self.mounted.set(false);
        self.observer.borrow_mut().take();
    }

    fn begin_request(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.update(|state| state.status = PagerStatus::Loading);
        generation
    }

    /// False once the pager is torn down or a newer request was issued.
    fn is_current(&self, generation: u64) -> bool {
        if !self.mounted.get() {
            tracing::debug!("pager torn down, dropping response");
            return false;
        }
        if self.generation.get() != generation {
            tracing::debug!(generation, "superseded page response dropped");
            return false;
        }
        true
    }

    fn report_failure(&self, page: u32, err: &ApiError) {
        tracing::warn!(page, error = %err, "could not load {}", self.config.label);
        self.alerts.new_alert(
            AlertKind::Warning,
            &format!("Could not load {}", self.config.label),
            &format!(
                "Something went wrong when we tried to load your {}, please try again or contact us if the problem persists. {}",
                self.config.label,
                err.describe()
            ),
        );
        self.update(|state| state.status = PagerStatus::Failed);
    }

    fn update(&self, apply: impl FnOnce(&mut PageState)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            apply(&mut state);
            state.page = state.page.clamp(1, state.max_page.max(1));
            state.clone()
        };
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            observer(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::recording::RecordingAlerts;
    use crate::api::models::fixtures::pins;
    use crate::api::service::fake::FakeApi;
    use crate::api::ItemPage;
    use crate::history::location::MemoryLocation;

    type TestPager = HistoryPager<Rc<FakeApi>, Rc<MemoryLocation>, Rc<RecordingAlerts>>;

    struct Harness {
        api: Rc<FakeApi>,
        location: Rc<MemoryLocation>,
        alerts: Rc<RecordingAlerts>,
        pager: TestPager,
    }

    fn harness(total_count: u64) -> Harness {
        let api = Rc::new(FakeApi::default());
        let location = Rc::new(MemoryLocation::default());
        let alerts = Rc::new(RecordingAlerts::default());
        let pager = HistoryPager::new(
            Rc::clone(&api),
            Rc::clone(&location),
            Rc::clone(&alerts),
            PagerConfig::new("rob", "pinned recordings"),
        );
        pager.initialize(total_count, pins(0..25_i64.min(total_count as i64)));
        Harness {
            api,
            location,
            alerts,
            pager,
        }
    }

    fn page_of(range: std::ops::Range<i64>, total_count: u64) -> Result<ItemPage, ApiError> {
        Ok(ItemPage {
            items: pins(range),
            total_count,
        })
    }

    #[test]
    fn max_page_rounds_up_and_never_drops_below_one() {
        assert_eq!(max_page_for(60, 25), 3);
        assert_eq!(max_page_for(50, 25), 2);
        assert_eq!(max_page_for(1, 25), 1);
        assert_eq!(max_page_for(0, 25), 1);
    }

    #[test]
    fn initialize_starts_on_first_page() {
        let h = harness(60);
        let state = h.pager.snapshot();
        assert_eq!(state.page, 1);
        assert_eq!(state.max_page, 3);
        assert_eq!(state.items.len(), 25);
        assert!(!state.loading());
    }

    #[tokio::test]
    async fn out_of_range_target_is_clamped() {
        let h = harness(60);
        h.api.reply_page(page_of(50..60, 60));

        assert_eq!(h.pager.go_to_page(4, true).await, PageOutcome::Loaded);
        assert_eq!(h.pager.page(), 3);
        assert_eq!(*h.api.page_calls.borrow(), vec![("rob".to_string(), 50, 25)]);

        h.api.reply_page(page_of(0..25, 60));
        assert_eq!(h.pager.go_to_page(-7, true).await, PageOutcome::Loaded);
        assert_eq!(h.pager.page(), 1);
        assert_eq!(h.api.page_calls.borrow()[1], ("rob".to_string(), 0, 25));
    }

    #[tokio::test]
    async fn same_page_request_is_a_no_op() {
        let h = harness(60);
        let before = h.pager.snapshot();

        assert_eq!(h.pager.go_to_page(1, true).await, PageOutcome::Unchanged);
        assert_eq!(h.pager.go_to_page(1, true).await, PageOutcome::Unchanged);
        assert_eq!(h.pager.go_to_page(0, false).await, PageOutcome::Unchanged);

        assert!(h.api.page_calls.borrow().is_empty());
        assert_eq!(h.pager.snapshot(), before);
        assert_eq!(h.location.len(), 1);
    }

    #[tokio::test]
    async fn empty_page_keeps_current_items() {
        let h = harness(50);
        let before = h.pager.snapshot();
        h.api.reply_page(Ok(ItemPage {
            items: Vec::new(),
            total_count: 25,
        }));

        assert_eq!(h.pager.go_to_page(2, true).await, PageOutcome::Empty);

        let after = h.pager.snapshot();
        assert_eq!(after.page, 1);
        assert_eq!(after.items, before.items);
        assert!(!after.loading());
        assert_eq!(h.location.len(), 1);
        assert_eq!(h.alerts.len(), 0);
    }

    #[tokio::test]
    async fn failure_reports_and_preserves_state() {
        let h = harness(60);
        let before = h.pager.snapshot();
        h.api
            .reply_page(Err(ApiError::Network("connection reset".to_string())));

        assert_eq!(h.pager.go_to_page(2, true).await, PageOutcome::Failed);

        let after = h.pager.snapshot();
        assert_eq!(after.page, before.page);
        assert_eq!(after.items, before.items);
        assert_eq!(after.status, PagerStatus::Failed);
        assert!(!after.loading());

        let alerts = h.alerts.alerts.borrow();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].0, AlertKind::Warning);
        assert_eq!(alerts[0].1, "Could not load pinned recordings");
        assert!(alerts[0].2.contains("NetworkError: connection reset"));
    }

    #[tokio::test]
    async fn loaded_page_takes_server_total_and_pushes_history() {
        let h = harness(60);
        h.api.reply_page(page_of(25..50, 110));

        assert_eq!(h.pager.go_to_page(2, true).await, PageOutcome::Loaded);

        let state = h.pager.snapshot();
        assert_eq!(state.page, 2);
        assert_eq!(state.max_page, 5);
        assert_eq!(state.items[0].identity(), pins(25..26)[0].identity());
        assert_eq!(h.location.page_param().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn navigation_after_push_does_not_refetch() {
        let h = harness(60);
        h.api.reply_page(page_of(25..50, 60));
        h.pager.go_to_page(2, true).await;
        let calls = h.api.page_calls.borrow().len();

        assert_eq!(h.pager.on_external_navigation().await, PageOutcome::Unchanged);
        assert_eq!(h.api.page_calls.borrow().len(), calls);
        assert_eq!(h.pager.page(), 2);
    }

    #[tokio::test]
    async fn back_past_first_paginated_url_returns_to_page_one() {
        let h = harness(60);
        h.api.reply_page(page_of(25..50, 60));
        h.pager.go_to_page(2, true).await;
        assert_eq!(h.location.len(), 2);

        h.location.back();
        h.api.reply_page(page_of(0..25, 60));
        assert_eq!(h.pager.on_external_navigation().await, PageOutcome::Loaded);

        assert_eq!(h.pager.page(), 1);
        assert_eq!(h.location.len(), 2, "navigation must not push entries");

        h.location.forward();
        h.api.reply_page(page_of(25..50, 60));
        assert_eq!(h.pager.on_external_navigation().await, PageOutcome::Loaded);
        assert_eq!(h.pager.page(), 2);
        assert_eq!(h.location.len(), 2);
    }

    #[tokio::test]
    async fn missing_page_param_on_first_page_is_ignored() {
        let h = harness(60);
        assert_eq!(h.pager.on_external_navigation().await, PageOutcome::Unchanged);
        assert!(h.api.page_calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn boundaries_disable_older_and_newer() {
        let h = harness(30);
        assert!(!h.pager.can_go_newer());
        assert_eq!(h.pager.newer().await, PageOutcome::Unchanged);

        h.api.reply_page(page_of(25..30, 30));
        assert_eq!(h.pager.older().await, PageOutcome::Loaded);
        assert_eq!(h.pager.page(), 2);
        assert!(!h.pager.can_go_older());
        assert_eq!(h.pager.older().await, PageOutcome::Unchanged);
        assert_eq!(h.api.page_calls.borrow().len(), 1);

        h.api.reply_page(page_of(0..25, 30));
        assert_eq!(h.pager.newer().await, PageOutcome::Loaded);
        assert_eq!(h.pager.page(), 1);
    }

    #[tokio::test]
    async fn late_response_after_teardown_is_discarded() {
        let h = harness(60);
        let gate = h.api.gate_page();
        let before = h.pager.snapshot();

        let (outcome, ()) = tokio::join!(h.pager.go_to_page(2, true), async {
            h.pager.teardown();
            let _ = gate.send(page_of(25..50, 60));
        });

        assert_eq!(outcome, PageOutcome::Discarded);
        assert_eq!(h.pager.snapshot().items, before.items);
        assert_eq!(h.pager.page(), 1);
        assert_eq!(h.location.len(), 1);
    }

    #[tokio::test]
    async fn superseded_request_cannot_overwrite_newer_page() {
        let h = harness(100);
        let first = h.api.gate_page();
        let second = h.api.gate_page();

        let (a, b, ()) = tokio::join!(
            h.pager.go_to_page(2, true),
            h.pager.go_to_page(3, true),
            async {
                let _ = second.send(page_of(50..75, 100));
                let _ = first.send(page_of(25..50, 100));
            }
        );

        assert_eq!(b, PageOutcome::Loaded);
        assert_eq!(a, PageOutcome::Discarded);
        assert_eq!(h.pager.page(), 3);
        assert!(!h.pager.is_loading());
        assert_eq!(h.location.page_param().as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn observer_sees_loading_transition() {
        let h = harness(60);
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            h.pager
                .set_observer(move |state| seen.borrow_mut().push((state.page, state.loading())));
        }
        h.api.reply_page(page_of(25..50, 60));
        h.pager.go_to_page(2, true).await;

        assert_eq!(*seen.borrow(), vec![(1, true), (2, false)]);
    }

    #[test]
    fn remove_item_drops_only_that_identity() {
        let h = harness(60);
        let target = pins(3..4)[0].identity();

        assert!(h.pager.remove_item(&target));
        assert!(!h.pager.remove_item(&target));
        let state = h.pager.snapshot();
        assert_eq!(state.items.len(), 24);
        assert!(state.items.iter().all(|item| item.identity() != target));
    }

    #[tokio::test]
    async fn bootstrap_loads_first_page_then_follows_url() {
        let api = Rc::new(FakeApi::default());
        let location = Rc::new(MemoryLocation::new(Some(3)));
        let pager = HistoryPager::new(
            Rc::clone(&api),
            Rc::clone(&location),
            Rc::new(RecordingAlerts::default()),
            PagerConfig::new("rob", "pinned recordings"),
        );
        api.reply_page(page_of(0..25, 60));
        api.reply_page(page_of(50..60, 60));

        assert_eq!(pager.bootstrap().await, PageOutcome::Loaded);

        assert_eq!(pager.page(), 3);
        assert_eq!(pager.snapshot().items.len(), 10);
        assert_eq!(
            *api.page_calls.borrow(),
            vec![("rob".to_string(), 0, 25), ("rob".to_string(), 50, 25)]
        );
        assert_eq!(location.len(), 1);
    }

    #[tokio::test]
    async fn bootstrap_failure_is_reported() {
        let h = harness(0);
        h.api.reply_page(Err(ApiError::Status {
            code: 404,
            message: "Cannot find user: rob".to_string(),
        }));

        assert_eq!(h.pager.bootstrap().await, PageOutcome::Failed);
        assert_eq!(h.pager.snapshot().status, PagerStatus::Failed);
        assert!(h.alerts.alerts.borrow()[0].2.contains("APIError: "));
    }
}

use std::cell::{Cell, RefCell};

/// Name of the query parameter that carries the page number.
pub const PAGE_PARAM: &str = "page";

/// The browser URL as far as pagination is concerned.
pub trait LocationBar {
    /// Raw value of the `page` query parameter, if present.
    fn page_param(&self) -> Option<String>;
    /// Pushes a new history entry for `?page=<page>`.
    fn push_page(&self, page: u32);
}

impl<T: LocationBar + ?Sized> LocationBar for std::rc::Rc<T> {
    fn page_param(&self) -> Option<String> {
        (**self).page_param()
    }

    fn push_page(&self, page: u32) {
        (**self).push_page(page)
    }
}

/// Parses a `page` parameter. Non-numeric values count as absent; range
/// checks are the pager's job.
pub fn parse_page(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse::<i64>().ok()
}

/// History stack kept in memory, used off the web and in tests.
///
/// Mirrors the browser: pushing drops any forward entries, `back` and
/// `forward` move the cursor without creating entries.
#[derive(Debug)]
pub struct MemoryLocation {
    entries: RefCell<Vec<Option<u32>>>,
    cursor: Cell<usize>,
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MemoryLocation {
    pub fn new(initial_page: Option<u32>) -> Self {
        Self {
            entries: RefCell::new(vec![initial_page]),
            cursor: Cell::new(0),
        }
    }

    pub fn back(&self) -> bool {
        let cursor = self.cursor.get();
        if cursor == 0 {
            return false;
        }
        self.cursor.set(cursor - 1);
        true
    }

    pub fn forward(&self) -> bool {
        let cursor = self.cursor.get();
        if cursor + 1 >= self.entries.borrow().len() {
            return false;
        }
        self.cursor.set(cursor + 1);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl LocationBar for MemoryLocation {
    fn page_param(&self) -> Option<String> {
        self.entries
            .borrow()
            .get(self.cursor.get())
            .copied()
            .flatten()
            .map(|page| page.to_string())
    }

    fn push_page(&self, page: u32) {
        let mut entries = self.entries.borrow_mut();
        let cursor = self.cursor.get();
        entries.truncate(cursor + 1);
        entries.push(Some(page));
        self.cursor.set(entries.len() - 1);
    }
}

/// The real address bar.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserLocation;

#[cfg(target_arch = "wasm32")]
impl LocationBar for BrowserLocation {
    fn page_param(&self) -> Option<String> {
        let href = web_sys::window()?.location().href().ok()?;
        let url = web_sys::Url::new(&href).ok()?;
        url.search_params().get(PAGE_PARAM)
    }

    fn push_page(&self, page: u32) {
        let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
            return;
        };
        let target = format!("?{PAGE_PARAM}={page}");
        if let Err(err) =
            history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&target))
        {
            tracing::warn!(?err, "could not push history entry");
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub type AppLocation = BrowserLocation;

#[cfg(not(target_arch = "wasm32"))]
pub type AppLocation = MemoryLocation;

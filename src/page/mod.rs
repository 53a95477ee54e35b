use std::sync::Arc;

use tracing::{debug, warn};

use crate::dataset::Dataset;
use crate::dom::Element;
use crate::loader::DatasetCache;
use crate::render::{self, DetailOutcome, RenderOptions};
use crate::utils;

pub const LIST_CONTAINER_ID: &str = "roll-list";
pub const SEARCH_INPUT_ID: &str = "search";
pub const DETAIL_CONTAINER_ID: &str = "roll-detail";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageMode {
    Index,
    Detail,
}

impl PageMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "index" | "list" => Some(Self::Index),
            "detail" | "roll" => Some(Self::Detail),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Detail => "detail",
        }
    }
}

/// Per-page-load lifecycle: `Idle -> Loading -> {Rendered | Error}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageState {
    Idle,
    Loading,
    Rendered,
    Error,
}

/// One page load: the mode flag, the location query string, and the
/// containers the renderers write into.
#[derive(Clone, Debug)]
pub struct Page {
    mode: PageMode,
    location: String,
    search_value: String,
    list: Element,
    detail: Element,
    state: PageState,
    rendered_ids: Vec<u64>,
    detail_outcome: Option<DetailOutcome>,
    error_message: Option<String>,
}

impl Page {
    pub fn new(mode: PageMode, location: &str) -> Self {
        Self {
            mode,
            location: location.to_string(),
            search_value: String::new(),
            list: Element::new("section")
                .with_id(LIST_CONTAINER_ID)
                .class("roll-grid"),
            detail: Element::new("div").with_id(DETAIL_CONTAINER_ID),
            state: PageState::Idle,
            rendered_ids: Vec::new(),
            detail_outcome: None,
            error_message: None,
        }
    }

    pub fn index() -> Self {
        Self::new(PageMode::Index, "")
    }

    pub fn detail(location: &str) -> Self {
        Self::new(PageMode::Detail, location)
    }

    pub fn mode(&self) -> PageMode {
        self.mode
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn search_value(&self) -> &str {
        &self.search_value
    }

    /// Id requested by the location query string, if numeric.
    pub fn requested_id(&self) -> Option<u64> {
        utils::parse_id_param(&self.location)
    }

    /// The container this page's renderer writes into.
    pub fn container(&self) -> &Element {
        match self.mode {
            PageMode::Index => &self.list,
            PageMode::Detail => &self.detail,
        }
    }

    fn container_mut(&mut self) -> &mut Element {
        match self.mode {
            PageMode::Index => &mut self.list,
            PageMode::Detail => &mut self.detail,
        }
    }

    pub fn rendered_ids(&self) -> &[u64] {
        &self.rendered_ids
    }

    pub fn detail_outcome(&self) -> Option<DetailOutcome> {
        self.detail_outcome
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Runs the load-and-render pipeline once. Load failures are converted
    /// into a localized message inside the page container; nothing is
    /// returned to the caller beyond the terminal state. Calling again after
    /// the first run is a no-op.
    pub async fn bootstrap(&mut self, cache: &DatasetCache, options: &RenderOptions) -> PageState {
        if self.state != PageState::Idle {
            return self.state;
        }
        self.state = PageState::Loading;
        debug!(mode = self.mode.as_str(), "page loading");

        match cache.load().await {
            Ok(dataset) => {
                self.render(&dataset, options);
                self.state = PageState::Rendered;
            }
            Err(e) => {
                warn!(error = %e, "page load failed");
                let message = options.messages.for_error(&e);
                render::show_message(self.container_mut(), &message);
                self.error_message = Some(message);
                self.state = PageState::Error;
            }
        }
        debug!(mode = self.mode.as_str(), state = ?self.state, "page settled");
        self.state
    }

    fn render(&mut self, dataset: &Dataset, options: &RenderOptions) {
        match self.mode {
            PageMode::Index => {
                let query = self.search_value.clone();
                self.rendered_ids = render::render_list(&mut self.list, dataset, &query, options);
            }
            PageMode::Detail => {
                let id = self.requested_id();
                self.detail_outcome =
                    Some(render::render_detail(&mut self.detail, dataset, id, options));
            }
        }
    }

    /// Search input event on the index page. Re-renders synchronously from
    /// the already-cached dataset; ignored on the detail page, before the
    /// first successful load, or after a failed one.
    pub fn on_search_input(
        &mut self,
        cache: &DatasetCache,
        value: &str,
        options: &RenderOptions,
    ) -> Option<&[u64]> {
        if self.mode != PageMode::Index || self.state != PageState::Rendered {
            return None;
        }
        let dataset: Arc<Dataset> = cache.get()?;
        self.search_value = value.to_string();
        self.rendered_ids = render::render_list(&mut self.list, &dataset, value, options);
        Some(&self.rendered_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_mode_parses_known_flags() {
        assert_eq!(PageMode::parse("index"), Some(PageMode::Index));
        assert_eq!(PageMode::parse(" Detail "), Some(PageMode::Detail));
        assert_eq!(PageMode::parse("admin"), None);
    }

    #[test]
    fn new_page_starts_idle_with_empty_container() {
        let page = Page::detail("?id=4");
        assert_eq!(page.state(), PageState::Idle);
        assert_eq!(page.requested_id(), Some(4));
        assert_eq!(page.container().id(), Some(DETAIL_CONTAINER_ID));
        assert!(!page.container().has_children());
    }
}

pub mod cards;
pub mod detail;

use crate::dom::{Element, Node};
use crate::loader::LoadError;

pub use cards::{filter_records, render_list};
pub use detail::{render_detail, DetailOutcome};

pub const CARD_PLACEHOLDER: &str = "https://via.placeholder.com/200x200?text=Cinnamon+Roll";
pub const HERO_PLACEHOLDER: &str = "https://via.placeholder.com/640x360?text=Cinnamon+Roll";
pub const DEFAULT_DETAIL_PAGE: &str = "roll.html";
pub const RATING_GLYPH: &str = "⭐️";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    ZhHant,
    En,
}

impl Locale {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "zh-hant" | "zh_hant" | "zh-tw" | "zh" => Some(Self::ZhHant),
            "en" | "en-us" | "en-gb" => Some(Self::En),
            _ => None,
        }
    }

    pub fn html_lang(self) -> &'static str {
        match self {
            Self::ZhHant => "zh-Hant",
            Self::En => "en",
        }
    }
}

/// User-visible strings for one locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Messages {
    pub locale: Locale,
    pub site_title: &'static str,
    pub search_placeholder: &'static str,
    pub back_to_list: &'static str,
    pub data_unavailable: &'static str,
    pub malformed_dataset: &'static str,
    pub no_results: &'static str,
    pub not_found: &'static str,
    pub phone_prefix: &'static str,
    pub view_map: &'static str,
    pub order_online: &'static str,
    pub label_address: &'static str,
    pub label_status: &'static str,
    pub label_phone: &'static str,
    pub label_rating: &'static str,
    pub label_reviews: &'static str,
    pub raw_fields_heading: &'static str,
}

impl Messages {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::ZhHant => Self {
                locale,
                site_title: "肉桂捲地圖",
                search_placeholder: "搜尋店名、地址或分類",
                back_to_list: "回到列表",
                data_unavailable: "無法讀取肉桂捲資料",
                malformed_dataset: "肉桂捲資料格式不正確",
                no_results: "沒有符合搜尋的肉桂捲，換個關鍵字試試看吧！",
                not_found: "找不到指定的肉桂捲，請回到首頁查看列表。",
                phone_prefix: "電話：",
                view_map: "查看地圖",
                order_online: "線上訂購",
                label_address: "地址",
                label_status: "營業狀態",
                label_phone: "電話",
                label_rating: "評分",
                label_reviews: "評論數",
                raw_fields_heading: "原始欄位資料",
            },
            Locale::En => Self {
                locale,
                site_title: "Cinnamon Roll Finder",
                search_placeholder: "Search by name, address or category",
                back_to_list: "Back to list",
                data_unavailable: "Unable to load cinnamon roll data",
                malformed_dataset: "Cinnamon roll data is malformed",
                no_results: "No cinnamon rolls match your search. Try another keyword!",
                not_found: "That cinnamon roll could not be found. Head back to the list.",
                phone_prefix: "Phone: ",
                view_map: "View map",
                order_online: "Order online",
                label_address: "Address",
                label_status: "Status",
                label_phone: "Phone",
                label_rating: "Rating",
                label_reviews: "Reviews",
                raw_fields_heading: "Raw fields",
            },
        }
    }

    /// Text shown in the page container when loading fails.
    pub fn for_error(&self, error: &LoadError) -> String {
        match error {
            LoadError::MalformedDataset { .. } => self.malformed_dataset.to_string(),
            _ => self.data_unavailable.to_string(),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::for_locale(Locale::default())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub messages: Messages,
    pub card_placeholder: String,
    pub hero_placeholder: String,
    pub detail_page: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            messages: Messages::default(),
            card_placeholder: CARD_PLACEHOLDER.to_string(),
            hero_placeholder: HERO_PLACEHOLDER.to_string(),
            detail_page: DEFAULT_DETAIL_PAGE.to_string(),
        }
    }
}

impl RenderOptions {
    pub fn detail_href(&self, id: u64) -> String {
        format!("{}?id={}", self.detail_page, id)
    }
}

pub fn empty_state(text: &str) -> Element {
    Element::new("div").class("empty-state").text(text)
}

/// Replaces `container`'s children with a single placeholder message.
pub fn show_message(container: &mut Element, text: &str) {
    container.replace_children(vec![Node::Element(empty_state(text))]);
}

pub(crate) fn badge(text: &str) -> Element {
    Element::new("span").class("badge").text(text)
}

pub(crate) fn external_badge(href: &str, text: &str) -> Element {
    Element::new("a")
        .attr("href", href)
        .class("badge")
        .attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
        .text(text)
}

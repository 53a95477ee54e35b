use crate::dataset::{Dataset, Field, Record};
use crate::dom::{Element, Node};
use crate::projector::{project, DisplayFields};
use crate::utils;

use super::{badge, show_message, RenderOptions, RATING_GLYPH};

fn contains_keyword(value: Option<&str>, keyword: &str) -> bool {
    value
        .map(|v| v.to_lowercase().contains(keyword))
        .unwrap_or(false)
}

/// `keyword` must already be trimmed and lowercased.
pub fn matches(record: &Record, keyword: &str) -> bool {
    keyword.is_empty()
        || record.title.to_lowercase().contains(keyword)
        || contains_keyword(record.field(Field::Address), keyword)
        || contains_keyword(record.field(Field::Category), keyword)
}

/// Records matching `query`, in dataset order.
pub fn filter_records<'a>(dataset: &'a Dataset, query: &str) -> Vec<&'a Record> {
    let keyword = utils::normalize_query(query);
    dataset
        .rows()
        .iter()
        .filter(|r| matches(r, &keyword))
        .collect()
}

pub fn build_card(fields: &DisplayFields, options: &RenderOptions) -> Element {
    let href = options.detail_href(fields.id);
    let mut card = Element::new("article").class("roll-card");

    let image = Element::new("img")
        .attr("loading", "lazy")
        .attr("alt", &fields.title)
        .attr("src", fields.image_or(&options.card_placeholder));
    card.push(Element::new("a").attr("href", &href).child(image));

    let mut meta = Element::new("div").class("roll-meta");
    meta.push(
        Element::new("h3")
            .class("roll-title")
            .child(Element::new("a").attr("href", &href).text(&fields.title)),
    );

    let rating = fields
        .rating
        .as_deref()
        .map(|r| format!("{RATING_GLYPH} {r}"));
    let mut badges = Element::new("div").class("badges");
    for value in [
        rating.as_deref(),
        fields.reviews.as_deref(),
        fields.status.as_deref(),
        fields.category.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        badges.push(badge(value));
    }
    if badges.has_children() {
        meta.push(badges);
    }

    if let Some(address) = fields.address.as_deref() {
        meta.push(Element::new("p").class("roll-address").text(address));
    }
    if let Some(phone) = fields.phone.as_deref() {
        let line = format!("{}{}", options.messages.phone_prefix, phone);
        meta.push(Element::new("p").class("roll-address").text(&line));
    }

    card.push(meta);
    card
}

/// Replaces the list container's contents with one card per matching
/// record, or the "no results" placeholder. Returns the rendered ids.
pub fn render_list(
    list: &mut Element,
    dataset: &Dataset,
    query: &str,
    options: &RenderOptions,
) -> Vec<u64> {
    let matched = filter_records(dataset, query);
    if matched.is_empty() {
        show_message(list, options.messages.no_results);
        return Vec::new();
    }

    let cards = matched
        .iter()
        .map(|r| Node::Element(build_card(&project(r), options)))
        .collect();
    list.replace_children(cards);
    matched.iter().map(|r| r.id).collect()
}

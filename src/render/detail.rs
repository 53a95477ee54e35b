use crate::dataset::{Dataset, Field, Record};
use crate::dom::{Element, Node};
use crate::projector::project;

use super::{external_badge, show_message, RenderOptions};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailOutcome {
    Found(u64),
    NotFound,
}

fn build_hero(record: &Record, dataset: &Dataset, options: &RenderOptions) -> Element {
    let fields = project(record);
    let msg = &options.messages;

    let mut info = Element::new("div");
    info.push(Element::new("h2").text(&fields.title));

    let mut actions = Element::new("div").class("badges");
    if let Some(href) = fields.map_url.as_deref() {
        actions.push(external_badge(href, msg.view_map));
    }
    if let Some(href) = fields.order_url.as_deref() {
        actions.push(external_badge(href, msg.order_online));
    }
    if actions.has_children() {
        info.push(actions);
    }

    // The category row is labelled with its raw source header.
    let meta_fields = [
        (dataset.schema().header(Field::Category), &fields.category),
        (msg.label_address, &fields.address),
        (msg.label_status, &fields.status),
        (msg.label_phone, &fields.phone),
        (msg.label_rating, &fields.rating),
        (msg.label_reviews, &fields.reviews),
    ];
    let mut meta_list = Element::new("ul").class("meta-list");
    for (label, value) in meta_fields {
        let Some(value) = value.as_deref() else {
            continue;
        };
        meta_list.push(
            Element::new("li")
                .class("meta-item")
                .child(Element::new("span").class("meta-label").text(label))
                .child(Element::new("span").class("meta-value").text(value)),
        );
    }
    if meta_list.has_children() {
        info.push(meta_list);
    }

    Element::new("section")
        .class("details roll-hero")
        .child(info)
        .child(
            Element::new("img")
                .attr("alt", &fields.title)
                .attr("src", fields.image_or(&options.hero_placeholder)),
        )
}

fn build_field_table(record: &Record, dataset: &Dataset, options: &RenderOptions) -> Element {
    let mut tbody = Element::new("tbody");
    for (header, value) in dataset.field_pairs(record) {
        tbody.push(
            Element::new("tr")
                .child(Element::new("th").text(header))
                .child(Element::new("td").text(value)),
        );
    }
    Element::new("section")
        .class("details")
        .child(Element::new("h3").text(options.messages.raw_fields_heading))
        .child(Element::new("table").class("data-table").child(tbody))
}

/// Replaces the detail container's contents with the record whose `_id`
/// equals `id`, or the "not found" placeholder when there is none.
pub fn render_detail(
    container: &mut Element,
    dataset: &Dataset,
    id: Option<u64>,
    options: &RenderOptions,
) -> DetailOutcome {
    let Some(record) = id.and_then(|id| dataset.find(id)) else {
        show_message(container, options.messages.not_found);
        return DetailOutcome::NotFound;
    };

    container.replace_children(vec![
        Node::Element(build_hero(record, dataset, options)),
        Node::Element(build_field_table(record, dataset, options)),
    ]);
    DetailOutcome::Found(record.id)
}

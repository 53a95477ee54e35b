pub mod document;

use itertools::Itertools;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::page::{Page, PageMode, PageState};
use crate::projector::{project, DisplayFields};
use crate::render::{DetailOutcome, RenderOptions};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RawField {
    pub header: String,
    pub value: String,
}

/// Machine-readable summary of a settled page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "lowercase")]
pub enum PageReport {
    Index {
        query: String,
        total: usize,
        records: Vec<DisplayFields>,
    },
    Detail {
        id: Option<u64>,
        record: Option<DisplayFields>,
        fields: Vec<RawField>,
        message: Option<String>,
    },
    Error {
        mode: String,
        message: String,
    },
}

pub fn build_report(page: &Page, dataset: Option<&Dataset>, options: &RenderOptions) -> PageReport {
    let dataset = match (page.state(), dataset) {
        (PageState::Rendered, Some(ds)) => ds,
        _ => {
            return PageReport::Error {
                mode: page.mode().as_str().to_string(),
                message: page
                    .error_message()
                    .unwrap_or(options.messages.data_unavailable)
                    .to_string(),
            }
        }
    };

    match page.mode() {
        PageMode::Index => {
            let records: Vec<DisplayFields> = page
                .rendered_ids()
                .iter()
                .filter_map(|id| dataset.find(*id))
                .map(project)
                .collect();
            PageReport::Index {
                query: page.search_value().to_string(),
                total: records.len(),
                records,
            }
        }
        PageMode::Detail => {
            let found = match page.detail_outcome() {
                Some(DetailOutcome::Found(id)) => dataset.find(id),
                _ => None,
            };
            match found {
                Some(record) => PageReport::Detail {
                    id: Some(record.id),
                    record: Some(project(record)),
                    fields: dataset
                        .field_pairs(record)
                        .map(|(h, v)| RawField {
                            header: h.to_string(),
                            value: v.to_string(),
                        })
                        .collect(),
                    message: None,
                },
                None => PageReport::Detail {
                    id: page.requested_id(),
                    record: None,
                    fields: Vec::new(),
                    message: Some(options.messages.not_found.to_string()),
                },
            }
        }
    }
}

pub fn render_text(report: &PageReport) -> Vec<u8> {
    let mut out = String::new();
    match report {
        PageReport::Index { records, .. } => {
            if records.is_empty() {
                out.push_str("# no results\n");
            }
            for r in records {
                out.push_str(&format!("{}\t{}\n", r.id, r.title));
            }
        }
        PageReport::Detail {
            record: Some(record),
            fields,
            ..
        } => {
            out.push_str(&record.title);
            out.push('\n');
            let body = fields
                .iter()
                .map(|f| format!("{}: {}", f.header, f.value))
                .join("\n");
            if !body.is_empty() {
                out.push_str(&body);
                out.push('\n');
            }
        }
        PageReport::Detail { message, .. } => {
            out.push_str(message.as_deref().unwrap_or_default());
            out.push('\n');
        }
        PageReport::Error { message, .. } => {
            out.push_str(message);
            out.push('\n');
        }
    }
    out.into_bytes()
}

pub fn render_json(report: &PageReport) -> Vec<u8> {
    serde_json::to_vec_pretty(report).unwrap_or_else(|_| b"{}\n".to_vec())
}

pub fn render_html(page: &Page, options: &RenderOptions) -> Vec<u8> {
    document::render_document(page, options).into_bytes()
}

use serde::Serialize;

use crate::dataset::{Field, Record};

/// Display-ready projection of one record. Values were normalized when the
/// dataset loaded, so every optional field is either non-empty or `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DisplayFields {
    pub id: u64,
    pub title: String,
    pub image_url: Option<String>,
    pub rating: Option<String>,
    pub reviews: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub map_url: Option<String>,
    pub order_url: Option<String>,
}

impl DisplayFields {
    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.image_url.as_deref().unwrap_or(placeholder)
    }
}

fn scalar(record: &Record, field: Field) -> Option<String> {
    record.field(field).map(str::to_string)
}

pub fn project(record: &Record) -> DisplayFields {
    DisplayFields {
        id: record.id,
        title: record.title.clone(),
        image_url: scalar(record, Field::Image),
        rating: scalar(record, Field::Rating),
        reviews: scalar(record, Field::Reviews),
        status: scalar(record, Field::Status),
        category: scalar(record, Field::Category),
        address: scalar(record, Field::Address),
        phone: scalar(record, Field::Phone),
        map_url: scalar(record, Field::MapUrl),
        order_url: scalar(record, Field::OrderUrl),
    }
}

pub mod schema;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

pub use schema::{Field, Schema, MIN_HEADERS};

/// Placeholder the scraper writes into cells that hold no data.
pub const EMPTY_SENTINEL: &str = "·";

/// Title prefix used when a row carries neither `_title` nor a name.
pub const FALLBACK_TITLE_PREFIX: &str = "肉桂捲";

const ID_KEY: &str = "_id";
const TITLE_KEY: &str = "_title";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid dataset JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("expected at least {expected} headers, found {found}")]
    TooFewHeaders { expected: usize, found: usize },

    #[error("row {row} has no numeric _id")]
    MissingId { row: usize },
}

#[derive(Deserialize)]
struct RawDataset {
    headers: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

/// Maps a trimmed string to `None` when it is blank or the empty sentinel.
pub fn normalize_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == EMPTY_SENTINEL {
        None
    } else {
        Some(value.to_string())
    }
}

/// Load-boundary normalizer: absence, `null`, blanks and the sentinel all
/// become `None`; scalars are stringified.
pub fn normalize_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => normalize_text(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => normalize_text(&other.to_string()),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
    pub title: String,
    values: Vec<Option<String>>,
}

impl Record {
    pub fn new(id: u64, title: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            id,
            title: title.into(),
            values,
        }
    }

    pub fn value(&self, column: usize) -> Option<&str> {
        self.values.get(column).and_then(|v| v.as_deref())
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        self.value(field.column())
    }
}

/// Header list plus rows, immutable once loaded.
#[derive(Clone, Debug)]
pub struct Dataset {
    headers: Vec<String>,
    schema: Schema,
    rows: Vec<Record>,
}

impl Dataset {
    pub fn from_json(bytes: &[u8]) -> Result<Self, DatasetError> {
        let raw: RawDataset = serde_json::from_slice(bytes)?;
        let schema = Schema::from_headers(&raw.headers)?;

        let mut rows = Vec::with_capacity(raw.rows.len());
        for (idx, row) in raw.rows.iter().enumerate() {
            let id = row
                .get(ID_KEY)
                .and_then(Value::as_u64)
                .ok_or(DatasetError::MissingId { row: idx })?;
            let values: Vec<Option<String>> = raw
                .headers
                .iter()
                .map(|h| normalize_value(row.get(h)))
                .collect();
            let title = normalize_value(row.get(TITLE_KEY))
                .or_else(|| values[Field::Name.column()].clone())
                .unwrap_or_else(|| format!("{FALLBACK_TITLE_PREFIX} #{id}"));
            rows.push(Record::new(id, title, values));
        }

        let dataset = Self {
            headers: raw.headers,
            schema,
            rows,
        };
        if let Some(dup) = dataset.first_duplicate_id() {
            warn!(id = dup, "dataset contains duplicate _id; first row wins");
        }
        Ok(dataset)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First record with a matching id, in dataset order.
    pub fn find(&self, id: u64) -> Option<&Record> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Non-empty `(header, value)` pairs of `record`, in header order.
    pub fn field_pairs<'a>(
        &'a self,
        record: &'a Record,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.headers
            .iter()
            .enumerate()
            .filter_map(move |(idx, h)| record.value(idx).map(|v| (h.as_str(), v)))
    }

    fn first_duplicate_id(&self) -> Option<u64> {
        let mut seen = std::collections::HashSet::new();
        self.rows.iter().map(|r| r.id).find(|id| !seen.insert(*id))
    }
}

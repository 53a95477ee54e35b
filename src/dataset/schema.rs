//! Named-field view over the positional header list.
//!
//! The dataset carries scraped column names that mean nothing on their own;
//! what matters is their position. This module is the single place that
//! knows which position holds which semantic field. Everything downstream
//! asks the [`Schema`] for a [`Field`] instead of indexing headers directly.

use super::DatasetError;

/// Minimum header count a dataset must carry. The highest addressed
/// position is [`Field::OrderUrl`] at column 13.
pub const MIN_HEADERS: usize = 14;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    MapUrl,
    Name,
    Rating,
    Reviews,
    Category,
    Address,
    Status,
    Phone,
    Image,
    OrderUrl,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::MapUrl,
        Field::Name,
        Field::Rating,
        Field::Reviews,
        Field::Category,
        Field::Address,
        Field::Status,
        Field::Phone,
        Field::Image,
        Field::OrderUrl,
    ];

    /// Source column of this field in the header list.
    pub const fn column(self) -> usize {
        match self {
            Field::MapUrl => 0,
            Field::Name => 1,
            Field::Rating => 2,
            Field::Reviews => 3,
            Field::Category => 4,
            Field::Address => 5,
            Field::Status => 6,
            Field::Phone => 9,
            Field::Image => 10,
            Field::OrderUrl => 13,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::MapUrl => "map_url",
            Field::Name => "name",
            Field::Rating => "rating",
            Field::Reviews => "reviews",
            Field::Category => "category",
            Field::Address => "address",
            Field::Status => "status",
            Field::Phone => "phone",
            Field::Image => "image",
            Field::OrderUrl => "order_url",
        }
    }

    fn slot(self) -> usize {
        Field::ALL
            .iter()
            .position(|f| *f == self)
            .unwrap_or_default()
    }
}

/// Mapping from semantic field to source column, validated once per load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    headers: Vec<String>,
}

impl Schema {
    pub fn from_headers(headers: &[String]) -> Result<Self, DatasetError> {
        if headers.len() < MIN_HEADERS {
            return Err(DatasetError::TooFewHeaders {
                expected: MIN_HEADERS,
                found: headers.len(),
            });
        }
        let headers = Field::ALL
            .iter()
            .map(|f| headers[f.column()].clone())
            .collect();
        Ok(Self { headers })
    }

    /// Source header name backing `field`.
    pub fn header(&self, field: Field) -> &str {
        &self.headers[field.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("col{i}")).collect()
    }

    #[test]
    fn rejects_short_header_lists() {
        let err = Schema::from_headers(&headers(13)).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::TooFewHeaders {
                expected: 14,
                found: 13
            }
        ));
    }

    #[test]
    fn maps_fields_to_their_source_headers() {
        let schema = Schema::from_headers(&headers(20)).unwrap();
        assert_eq!(schema.header(Field::MapUrl), "col0");
        assert_eq!(schema.header(Field::Phone), "col9");
        assert_eq!(schema.header(Field::Image), "col10");
        assert_eq!(schema.header(Field::OrderUrl), "col13");
        assert_eq!(Field::Category.column(), 4);
    }
}

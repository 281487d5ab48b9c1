//! Response envelopes.
//!
//! The platform wraps single records as `{"data": <record>}` and pages as
//! `{"data": [...], "meta": {...}}`. A [`RawResponse`] keeps the HTTP metadata and
//! the undecoded JSON until a resource client asks for one of the typed envelopes.

use crate::{Error, Result};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP status, headers, and JSON body of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded JSON body (`Value::Null` when the body was empty)
    pub body: Value,
}

impl RawResponse {
    /// Build a response with no headers; mostly useful for tests and mocks.
    #[must_use]
    pub fn from_body(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// Decode as a single-record envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the body has no `data` member or it does not match `T`.
    pub fn into_response<T>(self) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let Self {
            status,
            headers,
            body,
        } = self;

        let envelope: DataEnvelope<T> = serde_json::from_value(body)
            .map_err(|err| Error::Decode(format!("invalid record envelope: {err}")))?;

        Ok(Response {
            data: envelope.data,
            status,
            headers,
        })
    }

    /// Decode as a paginated envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if `data` or `meta` is missing or malformed.
    pub fn into_paginated<T>(self) -> Result<PaginatedResponse<T>>
    where
        T: DeserializeOwned,
    {
        let Self {
            status,
            headers,
            body,
        } = self;

        let envelope: PageEnvelope<T> = serde_json::from_value(body)
            .map_err(|err| Error::Decode(format!("invalid page envelope: {err}")))?;

        Ok(PaginatedResponse {
            data: envelope.data,
            meta: envelope.meta,
            status,
            headers,
        })
    }

    /// Decode as a body-less acknowledgement, accepting `null`, `{}` or any `data`.
    #[must_use]
    pub fn into_empty(self) -> Response<()> {
        Response {
            data: (),
            status: self.status,
            headers: self.headers,
        }
    }
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct PageEnvelope<T> {
    data: Vec<T>,
    meta: PaginationMeta,
}

/// A single record plus HTTP metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    /// The record
    pub data: T,
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
}

impl<T> Response<T> {
    /// Discard the HTTP metadata.
    #[must_use]
    pub fn into_data(self) -> T {
        self.data
    }

    /// Transform the record, keeping the metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            status: self.status,
            headers: self.headers,
        }
    }

    /// Look up a response header as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// Paging metadata attached to every `query` result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationMeta {
    /// 1-based page number of this page
    pub current_page: u32,
    /// Page size used by the server
    pub per_page: u32,
    /// Total matching records
    pub total: u64,
    /// Last page number (0 when there are no records)
    pub last_page: u32,
}

impl PaginationMeta {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.current_page < self.last_page
    }

    /// The next page number, if any.
    #[must_use]
    pub const fn next_page(&self) -> Option<u32> {
        if self.has_next_page() {
            Some(self.current_page + 1)
        } else {
            None
        }
    }
}

/// A page of records plus paging and HTTP metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResponse<T> {
    /// Records on this page
    pub data: Vec<T>,
    /// Paging metadata
    pub meta: PaginationMeta,
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
}

impl<T> PaginatedResponse<T> {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.meta.has_next_page()
    }

    /// Number of records on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether this page holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Discard the metadata.
    #[must_use]
    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        id: u32,
        name: String,
    }

    #[test]
    fn decodes_record_envelope() {
        let raw = RawResponse::from_body(200, json!({"data": {"id": 1, "name": "Loft"}}));
        let response: Response<Record> = raw.into_response().unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(
            response.data,
            Record {
                id: 1,
                name: "Loft".into()
            }
        );
    }

    #[test]
    fn record_envelope_without_data_fails() {
        let raw = RawResponse::from_body(200, json!({"id": 1, "name": "Loft"}));
        let err = raw.into_response::<Record>().unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn decodes_page_envelope() {
        let raw = RawResponse::from_body(
            200,
            json!({
                "data": [{"id": 1, "name": "Loft"}, {"id": 2, "name": "Cabin"}],
                "meta": {"current_page": 1, "per_page": 2, "total": 3, "last_page": 2}
            }),
        );
        let page: PaginatedResponse<Record> = raw.into_paginated().unwrap();

        assert_eq!(page.len(), 2);
        assert!(page.has_next_page());
        assert_eq!(page.meta.next_page(), Some(2));
        assert_eq!(page.meta.total, 3);
    }

    #[test]
    fn page_envelope_without_meta_fails() {
        let raw = RawResponse::from_body(200, json!({"data": []}));
        assert!(matches!(
            raw.into_paginated::<Record>(),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn last_page_has_no_next() {
        let meta = PaginationMeta {
            current_page: 3,
            per_page: 10,
            total: 25,
            last_page: 3,
        };
        assert!(!meta.has_next_page());
        assert_eq!(meta.next_page(), None);

        let empty = PaginationMeta {
            current_page: 1,
            per_page: 10,
            total: 0,
            last_page: 0,
        };
        assert!(!empty.has_next_page());
    }

    #[test]
    fn map_keeps_metadata() {
        let raw = RawResponse::from_body(201, json!({"data": {"id": 5, "name": "Villa"}}));
        let response = raw.into_response::<Record>().unwrap().map(|r| r.id);
        assert_eq!(response.status, 201);
        assert_eq!(response.into_data(), 5);
    }

    #[test]
    fn empty_body_acknowledgement() {
        let response = RawResponse::from_body(204, Value::Null).into_empty();
        assert_eq!(response.status, 204);
        assert!(response.header("x-request-id").is_none());
    }
}

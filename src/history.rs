//! The history service: list every stored analysis record.
//!
//! A full, unfiltered scan of the record table. The scan is aggregated
//! across every page the SDK paginator yields, so completeness does not
//! depend on the table fitting in one page; the response itself is still a
//! single unpaginated array. Items come back as loose JSON objects
//! mirroring whatever attribute shapes were stored.

use lambda_http::{Body, Error, Response};

use crate::error::AppError;
use crate::response;

const METHODS: &str = "OPTIONS,GET";

pub async fn handler(
    dc: &aws_sdk_dynamodb::Client,
    table: &str,
) -> Result<Response<Body>, Error> {
    match run(dc, table).await {
        Ok(items) => response::json(METHODS, &items),
        Err(err) => response::error(&err, METHODS),
    }
}

async fn run(
    dc: &aws_sdk_dynamodb::Client,
    table: &str,
) -> Result<Vec<serde_json::Value>, AppError> {
    let mut stream = dc
        .scan()
        .table_name(table)
        .into_paginator()
        .items()
        .send();

    let mut items = Vec::new();
    while let Some(item) = stream.next().await {
        items.push(item.map_err(|e| AppError::StorageRead(e.to_string()))?);
    }

    tracing::info!(count = items.len(), "scanned record table");

    serde_dynamo::from_items(items).map_err(|e| AppError::StorageRead(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::dummy_dynamodb;
    use lambda_http::http::StatusCode;

    #[test]
    fn zero_items_serialize_to_an_empty_array() {
        let resp = crate::response::json(METHODS, &Vec::<serde_json::Value>::new()).unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let Body::Text(text) = resp.body() else {
            panic!("expected a text body");
        };
        assert_eq!(text, "[]");
    }

    #[tokio::test]
    async fn scan_failure_maps_to_a_500_with_detail() {
        // A client with no credentials fails the scan without reaching any
        // table; the handler must turn that into the JSON error shape.
        let resp = handler(&dummy_dynamodb(), "records").await.unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let Body::Text(text) = resp.body() else {
            panic!("expected a text body");
        };
        let parsed: serde_json::Value = serde_json::from_str(text).unwrap();
        assert!(parsed["error"].as_str().unwrap().starts_with("table read error"));
    }
}

//! The analyze service: run detection against an already-stored object and
//! persist the result.
//!
//! The object is assumed present in the bucket; there is no upload step
//! here. The persisted record is also the response body, so callers see
//! exactly what the history service will later return.

use lambda_http::http::Method;
use lambda_http::{Body, Error, Request, Response};
use serde::Deserialize;
use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::error::AppError;
use crate::model::AnalysisRecord;
use crate::{detect, ingest, response};

const METHODS: &str = "OPTIONS,POST,GET";

#[derive(Deserialize)]
struct AnalyzeRequest {
    key: String,
}

pub async fn handler(
    req: Request,
    rek: &aws_sdk_rekognition::Client,
    dc: &aws_sdk_dynamodb::Client,
    bucket: &str,
    table: &str,
) -> Result<Response<Body>, Error> {
    // CORS preflight answers immediately, touching neither the analysis
    // service nor the table.
    if req.method() == Method::OPTIONS {
        return response::preflight(METHODS);
    }

    match run(req, rek, dc, bucket, table).await {
        Ok(record) => response::json(METHODS, &record),
        Err(err) => response::error(&err, METHODS),
    }
}

async fn run(
    req: Request,
    rek: &aws_sdk_rekognition::Client,
    dc: &aws_sdk_dynamodb::Client,
    bucket: &str,
    table: &str,
) -> Result<AnalysisRecord, AppError> {
    let request: AnalyzeRequest = serde_json::from_slice(ingest::body_bytes(req.body()))
        .map_err(|e| AppError::MalformedInput(format!("invalid JSON: {e}")))?;

    let labels = detect::labels(rek, bucket, &request.key).await?;
    let moderation = detect::moderation(rek, bucket, &request.key).await?;

    let record = AnalysisRecord {
        key: request.key,
        timestamp: chrono::Utc::now().to_rfc3339(),
        labels,
        moderation,
    };

    let item: HashMap<String, AttributeValue> =
        serde_dynamo::to_item(&record).map_err(|e| AppError::StorageWrite(e.to_string()))?;

    dc.put_item()
        .table_name(table)
        .set_item(Some(item))
        .send()
        .await
        .map_err(|e| AppError::StorageWrite(e.to_string()))?;

    tracing::info!(
        key = %record.key,
        labels = record.labels.len(),
        moderation = record.moderation.len(),
        "analysis record persisted"
    );

    Ok(record)
}

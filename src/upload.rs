//! The upload service: ingest an image and describe it.
//!
//! Linear flow: normalize the input, store the bytes in S3, run both
//! detection calls against the stored object, respond. Any step's failure
//! short-circuits into an error response; there is never a partial-success
//! response. An object uploaded before a later step fails stays in the
//! bucket with no matching record, which is accepted.

use aws_sdk_s3::primitives::ByteStream;
use lambda_http::http::header::CONTENT_TYPE;
use lambda_http::{Body, Error, Request, Response};
use serde::Serialize;
use std::time::Instant;

use crate::error::AppError;
use crate::model::{self, Label, ModerationLabel};
use crate::{detect, ingest, response};

const METHODS: &str = "OPTIONS,GET,POST,PUT";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    description: String,
    labels: Vec<Label>,
    moderation: Vec<ModerationLabel>,
    duration_ms: i64,
    key: String,
}

pub async fn handler(
    req: Request,
    s3: &aws_sdk_s3::Client,
    rek: &aws_sdk_rekognition::Client,
    http: &reqwest::Client,
    bucket: &str,
) -> Result<Response<Body>, Error> {
    match run(req, s3, rek, http, bucket).await {
        Ok(body) => response::json(METHODS, &body),
        Err(err) => response::error(&err, METHODS),
    }
}

async fn run(
    req: Request,
    s3: &aws_sdk_s3::Client,
    rek: &aws_sdk_rekognition::Client,
    http: &reqwest::Client,
    bucket: &str,
) -> Result<UploadResponse, AppError> {
    let start = Instant::now();

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let (bytes, filename) =
        ingest::normalize(ingest::body_bytes(req.body()), content_type, http).await?;

    let key = ingest::storage_key(&filename);
    let size = bytes.len();
    tracing::info!(%key, size, "storing upload");

    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(bytes))
        .send()
        .await
        .map_err(|e| AppError::StorageWrite(e.to_string()))?;

    let labels = detect::labels(rek, bucket, &key).await?;
    let moderation = detect::moderation(rek, bucket, &key).await?;
    tracing::info!(
        labels = labels.len(),
        moderation = moderation.len(),
        "analysis complete"
    );

    Ok(UploadResponse {
        description: model::describe(&labels),
        labels,
        moderation,
        duration_ms: start.elapsed().as_millis() as i64,
        key,
    })
}

//! Process configuration, read from the environment once at startup.

use lambda_runtime::Error;
use std::env;

/// Region used for the S3 and DynamoDB clients when `AWS_REGION` is unset.
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Region the Rekognition client is always bound to. The analysis service is
/// not available in every region the storage clients may run in, so it does
/// not follow the `AWS_REGION` override.
pub const ANALYSIS_REGION: &str = "eu-west-1";

#[derive(Debug, Clone)]
pub struct Config {
    /// S3 bucket receiving uploaded images. `BUCKET_NAME`, required.
    pub bucket: String,
    /// DynamoDB table holding analysis records. `DDB_TABLE`, required.
    pub table: String,
    /// Region for the S3 and DynamoDB clients. `AWS_REGION`, optional.
    pub region: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Config {
            bucket: env::var("BUCKET_NAME")
                .map_err(|_| -> Error { "BUCKET_NAME is not set".into() })?,
            table: env::var("DDB_TABLE").map_err(|_| -> Error { "DDB_TABLE is not set".into() })?,
            region: env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_owned()),
        })
    }
}

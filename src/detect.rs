//! Label and moderation detection against a stored object.
//!
//! Both calls reference the object in place; the image bytes never pass
//! through this process again after upload. The SDK's response types are
//! lifted into the crate's own shapes, which the SDK ones cannot be since
//! they do not serialize.

use aws_sdk_rekognition::types::{Image, S3Object};

use crate::error::AppError;
use crate::model::{Label, ModerationLabel};

/// Cap on general labels per image.
const MAX_LABELS: i32 = 10;

/// General labels below this confidence are dropped by the service.
const MIN_CONFIDENCE: f32 = 75.0;

fn s3_image(bucket: &str, key: &str) -> Image {
    Image::builder()
        .s3_object(S3Object::builder().bucket(bucket).name(key).build())
        .build()
}

pub async fn labels(
    rek: &aws_sdk_rekognition::Client,
    bucket: &str,
    key: &str,
) -> Result<Vec<Label>, AppError> {
    let out = rek
        .detect_labels()
        .image(s3_image(bucket, key))
        .max_labels(MAX_LABELS)
        .min_confidence(MIN_CONFIDENCE)
        .send()
        .await
        .map_err(|e| AppError::Analysis(format!("DetectLabels error: {e}")))?;

    Ok(out
        .labels()
        .iter()
        .map(|l| Label {
            name: l.name().unwrap_or_default().to_owned(),
            confidence: l.confidence().unwrap_or(0.0),
        })
        .collect())
}

pub async fn moderation(
    rek: &aws_sdk_rekognition::Client,
    bucket: &str,
    key: &str,
) -> Result<Vec<ModerationLabel>, AppError> {
    let out = rek
        .detect_moderation_labels()
        .image(s3_image(bucket, key))
        .send()
        .await
        .map_err(|e| AppError::Analysis(format!("DetectModerationLabels error: {e}")))?;

    Ok(out
        .moderation_labels()
        .iter()
        .map(|l| ModerationLabel {
            name: l.name().unwrap_or_default().to_owned(),
            parent_name: l.parent_name().unwrap_or_default().to_owned(),
            confidence: l.confidence().unwrap_or(0.0),
        })
        .collect())
}

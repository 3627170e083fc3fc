//! Input normalization for the upload handler.
//!
//! Uploads arrive in one of two shapes: multipart form data carrying the
//! image bytes directly, or a JSON body naming a remote URL to fetch. Both
//! reduce to the same `(bytes, filename)` pair before anything touches
//! storage.
//!
//! The multipart parse is deliberately minimal. The upload form sends exactly
//! one file part, so only the first part's bytes and declared filename
//! matter; the boundary is whatever follows `boundary=` in the content type.

use lambda_http::Body;
use serde::Deserialize;

use crate::error::AppError;

/// Extensions accepted on the multipart path.
const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Filename assigned to URL fetches, which carry no name of their own.
const URL_FILENAME: &str = "image_from_url.jpg";

#[derive(Deserialize)]
struct UrlRequest {
    url: String,
}

/// View a request body as raw bytes. `lambda_http` has already reversed any
/// transport base64 encoding by the time a body reaches us.
pub fn body_bytes(body: &Body) -> &[u8] {
    match body {
        Body::Empty => &[],
        Body::Text(text) => text.as_bytes(),
        Body::Binary(bytes) => bytes,
    }
}

/// Produce the image payload and its filename from either input shape.
///
/// Multipart bodies must carry a file with an allow-listed image extension.
/// URL bodies skip that check: the fetched payload gets a fixed placeholder
/// name.
pub async fn normalize(
    body: &[u8],
    content_type: Option<&str>,
    http: &reqwest::Client,
) -> Result<(Vec<u8>, String), AppError> {
    let content_type = content_type.unwrap_or("");

    if content_type.starts_with("multipart/form-data") {
        let (bytes, filename) = first_multipart_part(body, content_type)?;

        let extension = filename.rsplit_once('.').map(|(_, e)| e.to_lowercase());
        match extension {
            Some(e) if ALLOWED_EXTENSIONS.contains(&e.as_str()) => Ok((bytes, filename)),
            _ => Err(AppError::UnsupportedMediaType(
                "only JPG, PNG and GIF images are allowed".to_owned(),
            )),
        }
    } else {
        let request: UrlRequest = serde_json::from_slice(body)
            .map_err(|e| AppError::MalformedInput(format!("invalid JSON: {e}")))?;
        let bytes = fetch_url(http, &request.url).await?;
        Ok((bytes, URL_FILENAME.to_owned()))
    }
}

/// Replace path-unsafe characters so a name can be embedded in a storage key.
/// Applied to the key component only; the original filename is reported
/// unchanged.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | ':' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

/// Storage key for an upload: `uploads/<unix-seconds>_<sanitized-name>`.
/// Keys are write-once; nothing in this system deletes them.
pub fn storage_key(filename: &str) -> String {
    format!(
        "uploads/{}_{}",
        chrono::Utc::now().timestamp(),
        sanitize_filename(filename)
    )
}

async fn fetch_url(http: &reqwest::Client, url: &str) -> Result<Vec<u8>, AppError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::UpstreamFetch(e.to_string()))?
        .error_for_status()
        .map_err(|e| AppError::UpstreamFetch(e.to_string()))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::UpstreamFetch(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Extract the first part's raw bytes and declared filename from a multipart
/// body. The filename is an empty string when the part declared none, which
/// the extension check then rejects.
fn first_multipart_part(body: &[u8], content_type: &str) -> Result<(Vec<u8>, String), AppError> {
    let boundary = content_type
        .split_once("boundary=")
        .map(|(_, b)| b.trim())
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::MalformedInput("boundary not found in Content-Type".to_owned()))?;

    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    let start = find(body, delimiter)
        .ok_or_else(|| AppError::MalformedInput("no parts in multipart body".to_owned()))?;
    let mut pos = start + delimiter.len();

    // A closing delimiter straight away means the body has no parts.
    if body[pos..].starts_with(b"--") {
        return Err(AppError::MalformedInput(
            "no parts in multipart body".to_owned(),
        ));
    }
    if body[pos..].starts_with(b"\r\n") {
        pos += 2;
    }

    let headers_len = find(&body[pos..], b"\r\n\r\n")
        .ok_or_else(|| AppError::MalformedInput("malformed part headers".to_owned()))?;
    let headers = String::from_utf8_lossy(&body[pos..pos + headers_len]);
    let filename = part_filename(&headers);

    let data_start = pos + headers_len + 4;
    let terminator: Vec<u8> = [b"\r\n".as_slice(), delimiter].concat();
    let data_len = find(&body[data_start..], &terminator)
        .ok_or_else(|| AppError::MalformedInput("unterminated multipart part".to_owned()))?;

    Ok((body[data_start..data_start + data_len].to_vec(), filename))
}

/// `filename="..."` from the part's `Content-Disposition` header.
fn part_filename(headers: &str) -> String {
    for line in headers.lines() {
        if !line.to_ascii_lowercase().starts_with("content-disposition:") {
            continue;
        }
        if let Some((_, rest)) = line.split_once("filename=\"") {
            if let Some((name, _)) = rest.split_once('"') {
                return name.to_owned();
            }
        }
    }
    String::new()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

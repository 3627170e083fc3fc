//! "Oneshot" version of the image analysis Lambda implementations.
//!
//! This executable runs one API function, based on arguments given on the
//! command line: the function to invoke (upload, history, analyze) and a
//! small JSON description of the inbound request.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lambda_http::{http, Body};
use lambda_runtime::Error;
use serde::Deserialize;
use std::env;

use image_analysis_lambda::Services;

/// Minimal stand-in for an API Gateway proxy event. Bodies flagged as
/// base64-encoded are decoded here; on the deployment path `lambda_http`
/// does that itself.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Event {
    #[serde(default = "default_method")]
    http_method: String,
    content_type: Option<String>,
    #[serde(default)]
    body: String,
    #[serde(default)]
    is_base64_encoded: bool,
}

fn default_method() -> String {
    "POST".to_owned()
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut args = env::args();
    args.next(); // skip argv[0]

    let arn = args.next().ok_or_else(|| -> Error {
        "first argument should be the function to run (upload, history, analyze)".into()
    })?;

    let json_text = args
        .next()
        .ok_or_else(|| -> Error { "second argument should be JSON event text".into() })?;
    let event: Event = serde_json::from_str(&json_text)?;

    let body = if event.is_base64_encoded {
        Body::Binary(STANDARD.decode(&event.body)?)
    } else if event.body.is_empty() {
        Body::Empty
    } else {
        Body::Text(event.body)
    };

    let mut builder = http::Request::builder()
        .method(event.http_method.as_str())
        .uri("/");
    if let Some(content_type) = &event.content_type {
        builder = builder.header("Content-Type", content_type);
    }
    let req = builder.body(body)?;

    let svcs = Services::init().await?;
    let resp = svcs.dispatch(arn, req).await?;

    eprintln!("status: {}", resp.status());
    match resp.into_body() {
        Body::Empty => {}
        Body::Text(text) => println!("{text}"),
        Body::Binary(bytes) => println!("{}", STANDARD.encode(bytes)),
    }
    Ok(())
}

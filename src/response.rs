//! HTTP-shaped response construction shared by the three handlers.
//!
//! Every response, success or error, carries the same fixed CORS headers; the
//! method allow-list is the only part that varies per handler.

use lambda_http::http::{header::CONTENT_TYPE, response::Builder, StatusCode};
use lambda_http::{Body, Error, Response};
use serde::Serialize;

use crate::error::AppError;

/// Request headers admitted in CORS preflight answers.
pub const ALLOWED_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";

fn base(status: StatusCode, methods: &str) -> Builder {
    Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", ALLOWED_HEADERS)
        .header("Access-Control-Allow-Methods", methods)
}

/// 200 response with a JSON body. A body that fails to serialize degrades
/// into the corresponding error response.
pub fn json<T: Serialize>(methods: &str, value: &T) -> Result<Response<Body>, Error> {
    match serde_json::to_string(value) {
        Ok(body) => Ok(base(StatusCode::OK, methods)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::Text(body))
            .map_err(Box::new)?),
        Err(e) => error(&AppError::Serialization(e.to_string()), methods),
    }
}

/// Terminal error response: `{"error": "..."}` with the kind's status code.
pub fn error(err: &AppError, methods: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": err.to_string() });
    Ok(base(err.status(), methods)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::Text(body.to_string()))
        .map_err(Box::new)?)
}

/// Empty 200 for CORS preflight requests.
pub fn preflight(methods: &str) -> Result<Response<Body>, Error> {
    Ok(base(StatusCode::OK, methods)
        .body(Body::Empty)
        .map_err(Box::new)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn header<'a>(resp: &'a Response<Body>, name: &str) -> &'a str {
        resp.headers().get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn json_carries_cors_and_content_type() {
        let resp = json("OPTIONS,GET", &serde_json::json!({"ok": true})).unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "Access-Control-Allow-Origin"), "*");
        assert_eq!(header(&resp, "Access-Control-Allow-Headers"), ALLOWED_HEADERS);
        assert_eq!(header(&resp, "Access-Control-Allow-Methods"), "OPTIONS,GET");
        assert_eq!(header(&resp, "content-type"), "application/json");
    }

    #[test]
    fn error_body_is_a_single_error_field() {
        let resp = error(
            &AppError::MalformedInput("boundary not found in Content-Type".into()),
            "OPTIONS,GET,POST,PUT",
        )
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let Body::Text(text) = resp.body() else {
            panic!("expected a text body");
        };
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({"error": "boundary not found in Content-Type"})
        );
    }

    #[test]
    fn preflight_is_an_empty_ok() {
        let resp = preflight("OPTIONS,POST,GET").unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(matches!(resp.body(), Body::Empty));
        assert_eq!(header(&resp, "Access-Control-Allow-Methods"), "OPTIONS,POST,GET");
    }
}

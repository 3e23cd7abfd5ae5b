//! HTTP Command Wrappers
//!
//! Frontend bindings to the checklist API, organized by resource.

mod checklist;
mod chore;

pub use chore::HttpTransport;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::error::ApiError;

/// Base URL plus the request plumbing shared by every command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiClient {
    base: String,
}

impl ApiClient {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn send(&self, method: &str, path: &str, body: Option<String>) -> Result<Response, ApiError> {
        let window = web_sys::window().ok_or(ApiError::NoWindow)?;

        let init = RequestInit::new();
        init.set_method(method);
        if let Some(body) = &body {
            init.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&self.url(path), &init).map_err(ApiError::network)?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(ApiError::network)?;
        }

        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(ApiError::network)?;
        let response: Response = value.dyn_into().map_err(ApiError::network)?;
        if !response.ok() {
            return Err(ApiError::Status {
                status: response.status(),
                path: path.to_string(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send("GET", path, None).await?;
        let promise = response.json().map_err(ApiError::network)?;
        let value = JsFuture::from(promise).await.map_err(|e| decode_error(path, e))?;
        serde_wasm_bindgen::from_value(value).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// POST a JSON body and return the response text (possibly empty)
    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<String, ApiError> {
        let json = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        let response = self.send("POST", path, Some(json)).await?;
        let promise = response.text().map_err(ApiError::network)?;
        let text = JsFuture::from(promise).await.map_err(ApiError::network)?;
        Ok(text.as_string().unwrap_or_default())
    }
}

fn decode_error(path: &str, err: JsValue) -> ApiError {
    ApiError::Decode {
        path: path.to_string(),
        reason: err.as_string().unwrap_or_else(|| format!("{:?}", err)),
    }
}

/// Decode an optional JSON body; empty text means the default value
fn decode_text<T: DeserializeOwned + Default>(path: &str, text: &str) -> Result<T, ApiError> {
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(text).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// Escape a checklist name for use as a path segment
pub fn path_segment(raw: &str) -> String {
    utf8_percent_encode(raw, NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubmitResponse;

    #[test]
    fn test_url_joins_base() {
        assert_eq!(ApiClient::new("").url("/api/staff"), "/api/staff");
        assert_eq!(ApiClient::new("https://pub.example/").url("/api/staff"), "https://pub.example/api/staff");
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("opening"), "opening");
        assert_eq!(path_segment("late close/bar"), "late%20close%2Fbar");
    }

    #[test]
    fn test_decode_text() {
        let empty: SubmitResponse = decode_text("/api/submit_checklist", "  ").unwrap();
        assert_eq!(empty.pdf_url, None);
        let full: SubmitResponse =
            decode_text("/api/submit_checklist", r#"{"status":"success","pdf_url":"/pdfs/1.pdf"}"#).unwrap();
        assert_eq!(full.pdf_url.as_deref(), Some("/pdfs/1.pdf"));
        let bad: Result<SubmitResponse, _> = decode_text("/api/submit_checklist", "<html>");
        assert!(matches!(bad, Err(ApiError::Decode { .. })));
    }
}

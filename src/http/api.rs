//! Management API handlers.
//!
//! - `POST /api/create`: JSON body or multipart form with a JSON file
//! - `PUT /api/update`: replace the response of an existing route

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Multipart, Request, State},
    http::{header, HeaderMap},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::UploadConfig;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::http::upload::ScopedUpload;
use crate::registry::record::present;
use crate::registry::{HttpMethod, RouteRecord};

#[derive(Debug, Deserialize)]
pub struct CreateRouteBody {
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub method: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub response: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRouteBody {
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub new_response: Option<Value>,
}

/// Create input after transport decoding; the response is already parsed.
#[derive(Debug, Default)]
struct CreateInput {
    path: Option<String>,
    method: Option<Value>,
    response: Option<Value>,
}

impl CreateInput {
    fn into_record(self) -> Result<RouteRecord, ApiError> {
        let path = normalize_path(self.path.as_deref())?;
        let method = resolve_method(self.method)?;
        let method: HttpMethod = method
            .parse()
            .map_err(|_| ApiError::MethodNotAllowed(method.clone()))?;
        let response = self
            .response
            .ok_or_else(|| ApiError::validation("response is required"))?;

        Ok(RouteRecord {
            path,
            method,
            response,
        })
    }
}

/// Trim the path and give it a leading `/`.
pub fn normalize_path(raw: Option<&str>) -> Result<String, ApiError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(ApiError::validation("path is required"));
    }
    if trimmed.starts_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("/{trimmed}"))
    }
}

/// An absent method defaults to GET; an explicit null or empty one is rejected.
fn resolve_method(raw: Option<Value>) -> Result<String, ApiError> {
    match raw {
        None => Ok(HttpMethod::Get.as_str().to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s),
        Some(Value::String(_)) | Some(Value::Null) => {
            Err(ApiError::validation("method is required"))
        }
        Some(_) => Err(ApiError::validation("method must be a string")),
    }
}

/// Accept a payload as JSON, or as a string holding JSON text.
pub fn parse_payload(field: &str, value: Value) -> Result<Value, ApiError> {
    match value {
        Value::String(text) => serde_json::from_str(&text)
            .map_err(|e| ApiError::validation(format!("{field} is not valid JSON: {e}"))),
        other => Ok(other),
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

pub async fn create_route(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<Value>, ApiError> {
    let input = if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        read_multipart(multipart, &state.uploads).await?
    } else {
        let Json(body) = Json::<CreateRouteBody>::from_request(request, &state)
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        CreateInput {
            path: body.path,
            method: body.method,
            response: body
                .response
                .map(|r| parse_payload("response", r))
                .transpose()?,
        }
    };

    let record = input.into_record()?;
    let saved_to = state.store.save(&record).await?;
    let registration =
        state
            .binder
            .register(&record.path, record.method.as_str(), record.response.clone())?;

    tracing::info!(
        path = %record.path,
        method = %record.method,
        saved_to = %saved_to.display(),
        registration = ?registration,
        "Route created"
    );

    Ok(Json(json!({
        "ok": true,
        "path": record.path,
        "method": record.method.as_str(),
        "savedTo": saved_to.display().to_string(),
    })))
}

/// Collect form fields and the uploaded file. The upload's temp file is
/// removed when this function returns, on every path.
async fn read_multipart(
    mut multipart: Multipart,
    uploads: &UploadConfig,
) -> Result<CreateInput, ApiError> {
    let temp_dir = uploads.resolved_temp_dir();
    let mut input = CreateInput::default();
    let mut upload: Option<ScopedUpload> = None;
    let mut response_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(e.body_text()))?
    {
        if field.file_name().is_some() {
            upload = Some(ScopedUpload::receive(field, &temp_dir).await?);
            continue;
        }

        let name = field.name().unwrap_or_default().to_string();
        let text = field
            .text()
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        match name.as_str() {
            "path" => input.path = Some(text),
            "method" => input.method = Some(Value::String(text)),
            "response" => response_text = Some(text),
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    input.response = match upload {
        Some(upload) => {
            if !upload.is_json() {
                return Err(ApiError::validation(format!(
                    "unsupported file type: {}; upload a .json file",
                    upload.file_name().unwrap_or("<unnamed>")
                )));
            }
            Some(upload.read_json().await?)
        }
        None => response_text
            .map(|text| parse_payload("response", Value::String(text)))
            .transpose()?,
    };

    if input.response.is_none() {
        return Err(ApiError::validation("a JSON file or response field is required"));
    }
    Ok(input)
}

pub async fn update_route(
    State(state): State<AppState>,
    body: Result<Json<UpdateRouteBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::validation(e.body_text()))?;

    let path = normalize_path(body.path.as_deref())?;
    let response = body
        .new_response
        .ok_or_else(|| ApiError::validation("newResponse is required"))?;
    let response = parse_payload("newResponse", response)?;

    let updated = state.store.update(&path, response.clone()).await?;

    // Refresh the live value under the record's own identity.
    let live_path = updated.path.clone().unwrap_or_else(|| path.clone());
    match updated.method.as_deref() {
        Some(method) => {
            if let Err(e) = state.binder.register(&live_path, method, response) {
                tracing::warn!(path = %live_path, error = %e, "Updated record cannot be served");
            }
        }
        None => {
            tracing::warn!(path = %live_path, "Updated record has no method, not served");
        }
    }

    tracing::info!(path = %path, "Route updated");
    Ok(Json(json!({ "ok": true, "updated": updated })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Some("/a")).unwrap(), "/a");
        assert_eq!(normalize_path(Some("  a/b ")).unwrap(), "/a/b");
        assert!(normalize_path(Some("   ")).is_err());
        assert!(normalize_path(None).is_err());
    }

    #[test]
    fn test_resolve_method() {
        assert_eq!(resolve_method(None).unwrap(), "GET");
        assert_eq!(resolve_method(Some(json!("post"))).unwrap(), "post");
        assert!(matches!(resolve_method(Some(json!(""))), Err(ApiError::Validation(_))));
        assert!(matches!(resolve_method(Some(Value::Null)), Err(ApiError::Validation(_))));
        assert!(matches!(resolve_method(Some(json!(7))), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_parse_payload() {
        assert_eq!(parse_payload("r", json!({"a": 1})).unwrap(), json!({"a": 1}));
        assert_eq!(parse_payload("r", json!("{\"a\":1}")).unwrap(), json!({"a": 1}));
        assert_eq!(parse_payload("r", json!("[1,2]")).unwrap(), json!([1, 2]));
        assert!(matches!(parse_payload("r", json!("{oops")), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_into_record_rejects_disallowed_method() {
        let input = CreateInput {
            path: Some("/t".into()),
            method: Some(json!("TRACE")),
            response: Some(json!({})),
        };
        assert!(matches!(input.into_record(), Err(ApiError::MethodNotAllowed(m)) if m == "TRACE"));
    }

    #[test]
    fn test_into_record_requires_response() {
        let input = CreateInput {
            path: Some("/t".into()),
            method: None,
            response: None,
        };
        assert!(matches!(input.into_record(), Err(ApiError::Validation(_))));
    }
}

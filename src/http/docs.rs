//! Documentation and landing routes.

use axum::{extract::State, response::Html, Json};
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::openapi;

const DOCS_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Dynamic Route Registry</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

pub async fn root() -> &'static str {
    "Dynamic route registry is running. API docs at /docs"
}

/// Rebuilt from the route store on every request.
pub async fn openapi_json(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let spec = openapi::assemble(&state.store).await?;
    Ok(Json(spec))
}

pub async fn docs_page() -> Html<&'static str> {
    Html(DOCS_PAGE)
}

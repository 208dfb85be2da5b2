//! API documentation pages
//!
//! Both pages load their UI bundle from a CDN and render the OpenAPI
//! document served at `ApiMetadata::openapi_url`.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::{routing::get, Json, Router};
use serde_json::Value;

use crate::http::metadata::ApiMetadata;
use crate::http::server::AppState;

const SWAGGER_UI_JS: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js";
const SWAGGER_UI_CSS: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css";
const REDOC_JS: &str = "https://cdn.jsdelivr.net/npm/redoc@2/bundles/redoc.standalone.js";

/// GET /openapi.json
async fn openapi(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.metadata.openapi())
}

/// GET /swagger
async fn swagger(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(swagger_page(&state.metadata))
}

/// GET /redoc
async fn redoc(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(redoc_page(&state.metadata))
}

fn swagger_page(meta: &ApiMetadata) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<link type="text/css" rel="stylesheet" href="{css}">
<title>{title} - Swagger UI</title>
</head>
<body>
<div id="swagger-ui"></div>
<script src="{js}"></script>
<script>
const ui = SwaggerUIBundle({{
    url: '{spec}',
    dom_id: '#swagger-ui',
    layout: 'BaseLayout',
    deepLinking: true,
    presets: [SwaggerUIBundle.presets.apis, SwaggerUIBundle.SwaggerUIStandalonePreset],
}})
</script>
</body>
</html>
"#,
        css = SWAGGER_UI_CSS,
        js = SWAGGER_UI_JS,
        title = meta.title,
        spec = meta.openapi_url,
    )
}

fn redoc_page(meta: &ApiMetadata) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<title>{title} - ReDoc</title>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1">
<style>body {{ margin: 0; padding: 0; }}</style>
</head>
<body>
<redoc spec-url="{spec}"></redoc>
<script src="{js}"></script>
</body>
</html>
"#,
        title = meta.title,
        spec = meta.openapi_url,
        js = REDOC_JS,
    )
}

/// Documentation routes at the paths named in `meta`
pub fn router(meta: &ApiMetadata) -> Router<Arc<AppState>> {
    Router::new()
        .route(meta.openapi_url, get(openapi))
        .route(meta.docs_url, get(swagger))
        .route(meta.redoc_url, get(redoc))
}

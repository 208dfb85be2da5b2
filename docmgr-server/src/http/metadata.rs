//! Service metadata and the OpenAPI document built from it

use serde_json::{json, Value};

/// Descriptive metadata for the API and where its docs are served
#[derive(Debug, Clone)]
pub struct ApiMetadata {
    pub title: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub docs_url: &'static str,
    pub redoc_url: &'static str,
    pub openapi_url: &'static str,
}

impl Default for ApiMetadata {
    fn default() -> Self {
        Self {
            title: "Doc-Manager API",
            version: "1.0.0",
            description: "API for managing documents and related operations for contracts lifecycle management.",
            docs_url: "/swagger",
            redoc_url: "/redoc",
            openapi_url: "/openapi.json",
        }
    }
}

impl ApiMetadata {
    /// OpenAPI 3.1 description of the public routes
    pub fn openapi(&self) -> Value {
        json!({
            "openapi": "3.1.0",
            "info": {
                "title": self.title,
                "version": self.version,
                "description": self.description,
            },
            "paths": {
                "/health": {
                    "get": {
                        "summary": "Health Check",
                        "operationId": "health_check_health_get",
                        "responses": {
                            "200": {
                                "description": "Successful Response",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/HealthResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "HealthResponse": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "string", "const": "healthy" }
                        },
                        "required": ["status"]
                    }
                }
            }
        })
    }
}

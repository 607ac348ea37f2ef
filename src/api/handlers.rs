//! API handlers for the fixed routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::api::AppState;
use crate::config::ServiceProfile;

pub const HELLO_WORLD: &str = "HELLO WORLD";
pub const HOME_PAGE: &str = "<html><body><p>This is home Page.</p></body></html>";

/// Health check
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let response = match state.profile {
        ServiceProfile::Api => StatusResponse {
            message: "Service running ok",
            database: Some(state.connection.describe()),
        },
        ServiceProfile::Health | ServiceProfile::Home => StatusResponse {
            message: "Service healthy",
            database: None,
        },
    };

    Json(response)
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// Plain text greeting served by the API profile
pub async fn hello() -> &'static str {
    HELLO_WORLD
}

/// HTML home page served by the home profile
pub async fn home_page() -> Html<&'static str> {
    Html(HOME_PAGE)
}

/// `GET /posts`
pub async fn list_posts(Query(params): Query<BTreeMap<String, String>>) -> PostLookup {
    PostLookup::new(None, params)
}

/// `GET /posts/:id`
pub async fn get_post(
    Path(id): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> PostLookup {
    PostLookup::new(Some(id), params)
}

/// Echo of a post lookup. Always answered with 418 and a JSON body:
/// a bare string, or an object when `type=json` was requested.
#[derive(Debug, PartialEq)]
pub enum PostLookup {
    Text(String),
    Json(PostLookupBody),
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PostLookupBody {
    pub id: Option<String>,
    pub q: BTreeMap<String, String>,
}

impl PostLookup {
    /// JSON when the query asks for `type=json`, text otherwise
    pub fn new(id: Option<String>, params: BTreeMap<String, String>) -> Self {
        if params.get("type").map(String::as_str) == Some("json") {
            PostLookup::Json(PostLookupBody { id, q: params })
        } else {
            PostLookup::Text(format!(
                "The ID equals {}",
                id.as_deref().unwrap_or("none")
            ))
        }
    }
}

impl IntoResponse for PostLookup {
    fn into_response(self) -> Response {
        match self {
            PostLookup::Text(text) => (StatusCode::IM_A_TEAPOT, Json(text)).into_response(),
            PostLookup::Json(body) => (StatusCode::IM_A_TEAPOT, Json(body)).into_response(),
        }
    }
}

/// `POST /posts`: echo the decoded body, nothing is stored
pub async fn echo_post(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_lookup_text() {
        let lookup = PostLookup::new(Some("7".into()), BTreeMap::new());
        assert_eq!(lookup, PostLookup::Text("The ID equals 7".into()));

        let lookup = PostLookup::new(None, BTreeMap::new());
        assert_eq!(lookup, PostLookup::Text("The ID equals none".into()));
    }

    #[test]
    fn test_post_lookup_only_json_type_switches() {
        let mut params = BTreeMap::new();
        params.insert("type".to_string(), "xml".to_string());
        assert!(matches!(
            PostLookup::new(None, params),
            PostLookup::Text(_)
        ));
    }

    #[test]
    fn test_post_lookup_json_keeps_all_params() {
        let mut params = BTreeMap::new();
        params.insert("type".to_string(), "json".to_string());
        params.insert("page".to_string(), "2".to_string());

        match PostLookup::new(Some("abc".into()), params.clone()) {
            PostLookup::Json(body) => {
                assert_eq!(body.id.as_deref(), Some("abc"));
                assert_eq!(body.q, params);
            }
            other => panic!("expected JSON lookup, got {other:?}"),
        }
    }
}

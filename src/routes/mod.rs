//! HTTP surface: a single fallback feeds every request through the shape
//! classifier, since the route set is only known at startup.

mod shape;

pub use shape::{classify, RouteMatch};

use crate::error::AppError;
use crate::handlers;
use crate::state::AppState;
use axum::body::{to_bytes, Body};
use axum::extract::{Query, Request, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Request body cap; generous for single-row payloads.
const BODY_LIMIT: usize = 1024 * 1024;

pub fn app(state: AppState) -> Router {
    Router::new().fallback(dispatch).with_state(state)
}

async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    match serve(state, req).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn serve(state: AppState, req: Request) -> Result<Response, AppError> {
    let (parts, body) = req.into_parts();
    let matched = classify(&parts.method, parts.uri.path(), &state.schema)?;
    match matched {
        RouteMatch::Tables => handlers::tables(&state),
        RouteMatch::List { table } => {
            let (offset, limit) = page_params(&parts.uri);
            handlers::list(&state, &table, offset, limit).await
        }
        RouteMatch::Create { table } => {
            let payload = json_body(body).await?;
            handlers::create(&state, &table, payload).await
        }
        RouteMatch::Read { table, id } => handlers::read(&state, &table, id).await,
        RouteMatch::Replace { table, id } => {
            let payload = json_body(body).await?;
            handlers::replace(&state, &table, id, payload).await
        }
        RouteMatch::Delete { table, id } => handlers::delete(&state, &table, id).await,
    }
}

/// offset/limit from the query string; anything unparsable keeps its default.
fn page_params(uri: &Uri) -> (Option<i64>, Option<i64>) {
    let params: HashMap<String, String> = Query::try_from_uri(uri)
        .map(|Query(p)| p)
        .unwrap_or_default();
    let offset = params.get("offset").and_then(|v| v.parse().ok());
    let limit = params.get("limit").and_then(|v| v.parse().ok());
    (offset, limit)
}

/// Decode a JSON object body; the parse error's message becomes the 400 body.
async fn json_body(body: Body) -> Result<Map<String, Value>, AppError> {
    let bytes = to_bytes(body, BODY_LIMIT)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::BadRequest(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_parse_independently() {
        let uri: Uri = "/users?limit=7&offset=3".parse().unwrap();
        assert_eq!(page_params(&uri), (Some(3), Some(7)));

        let uri: Uri = "/users?limit=abc&offset=2".parse().unwrap();
        assert_eq!(page_params(&uri), (Some(2), None));

        let uri: Uri = "/users".parse().unwrap();
        assert_eq!(page_params(&uri), (None, None));
    }

    #[tokio::test]
    async fn body_must_be_a_json_object() {
        let err = json_body(Body::from("[1, 2]")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let ok = json_body(Body::from(r#"{"name": "Ann"}"#)).await.unwrap();
        assert_eq!(ok.get("name"), Some(&Value::String("Ann".into())));
    }
}

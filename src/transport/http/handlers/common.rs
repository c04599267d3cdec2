use async_trait::async_trait;
use axum::extract::{FromRequest, Query, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::convert::Infallible;

/// Reserved path segment: `GET /api/v{v}/:scopes` lists the registry itself.
pub const SCOPES_PSEUDO_SEGMENT: &str = ":scopes";

/// Reserved record key: `GET /api/v{v}/{scope}/:structure` returns the
/// scope metadata instead of a record.
pub const STRUCTURE_PSEUDO_KEY: &str = ":structure";

/// Maps a URL path segment back to a registry name or key.
///
/// Registry keys may contain spaces, URLs cannot; clients send `+`.
pub fn unescape_segment(segment: &str) -> String {
    segment.replace('+', " ")
}

/// Record fields for create/update: the JSON object body, an urlencoded
/// form body, or the query string, whichever is present, in that order.
///
/// Always yields a JSON object; form and query values arrive as strings.
pub struct RecordPayload(pub JsonValue);

#[async_trait]
impl<S> FromRequest<S> for RecordPayload
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();

        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_owned();

        if content_type.starts_with("application/json") {
            if let Ok(Json(value)) = Json::<JsonValue>::from_request(req, state).await {
                if value.is_object() {
                    return Ok(Self(value));
                }
            }
            return Ok(Self(fields_from_pairs(query)));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            if let Ok(Form(pairs)) = Form::<HashMap<String, String>>::from_request(req, state).await
            {
                if !pairs.is_empty() {
                    return Ok(Self(fields_from_pairs(pairs)));
                }
            }
        }

        Ok(Self(fields_from_pairs(query)))
    }
}

fn fields_from_pairs(pairs: HashMap<String, String>) -> JsonValue {
    let mut fields = Map::new();
    for (name, value) in pairs {
        fields.insert(name, JsonValue::String(value));
    }
    JsonValue::Object(fields)
}

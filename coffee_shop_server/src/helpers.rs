use std::sync::OnceLock;

use actix_web::{
    error::{JsonPayloadError, PathError},
    http::header::{HeaderMap, AUTHORIZATION},
    HttpRequest,
};
use log::*;
use regex::Regex;

use crate::{
    data_objects::UpdateDrinkRequest,
    errors::{AuthError, MalformedHeader, ServerError},
};

/// Every path that the server has a route for, whatever the method.
const KNOWN_ROUTES: &str = r"^/(health|drinks|drinks-detail|drinks/[^/]+)$";

/// Extracts the bearer token from the `Authorization` header.
///
/// The header must hold exactly two whitespace-separated parts, the first being `Bearer`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthError::AuthHeaderMissing)?;
    let value = header.to_str().map_err(|e| {
        debug!("🔐️ Authorization header is not valid ASCII. {e}");
        MalformedHeader::MissingBearerPrefix
    })?;
    let parts = value.split_whitespace().collect::<Vec<&str>>();
    match parts.as_slice() {
        [] => Err(MalformedHeader::MissingBearerPrefix.into()),
        [scheme, ..] if *scheme != "Bearer" => Err(MalformedHeader::MissingBearerPrefix.into()),
        [_] => Err(MalformedHeader::MissingToken.into()),
        [_, token] => Ok(*token),
        _ => Err(MalformedHeader::TooManyParts.into()),
    }
}

/// Parses the body of a PATCH request.
///
/// Empty bodies (no content, `null`, `{}` or an object without any updatable fields) are a conflict rather than a bad
/// request.
pub fn parse_update_request(body: &[u8]) -> Result<UpdateDrinkRequest, ServerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ServerError::EmptyRequestBody);
    }
    let value = serde_json::from_slice::<serde_json::Value>(body)
        .map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    if value.is_null() {
        return Err(ServerError::EmptyRequestBody);
    }
    let update = serde_json::from_value::<UpdateDrinkRequest>(value)
        .map_err(|e| ServerError::UnprocessableEntity(e.to_string()))?;
    if update.is_empty() {
        return Err(ServerError::EmptyRequestBody);
    }
    Ok(update)
}

/// Well-formed JSON that does not fit the expected shape is unprocessable. Anything else is a bad request.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match &err {
        JsonPayloadError::Deserialize(e) if e.is_data() => ServerError::UnprocessableEntity(e.to_string()).into(),
        _ => ServerError::InvalidRequestBody(err.to_string()).into(),
    }
}

/// A path segment that cannot be parsed, such as a non-numeric drink id, does not identify any resource.
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    ServerError::NoRecordFound(format!("{}. {err}", req.path())).into()
}

pub fn is_known_route(path: &str) -> bool {
    static ROUTES: OnceLock<Regex> = OnceLock::new();
    ROUTES.get_or_init(|| Regex::new(KNOWN_ROUTES).unwrap()).is_match(path)
}

use std::io::ErrorKind;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::header::{
    CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH,
    LAST_MODIFIED,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use httpdate::{fmt_http_date, parse_http_date};

use super::prelude::*;
use crate::constants::IMAGE_CACHE_CONTROL;

/// Revalidation data for a stored image.
///
/// Stored images are written once and never change, so the identifier is
/// the entity tag. `Last-Modified` only has whole-second precision, which
/// is what the modification time is cut down to.
#[derive(Debug)]
struct StoredImageTag {
    entity_tag: String,
    written_at: Option<SystemTime>,
}

impl StoredImageTag {
    fn new(image_id: &str, metadata: &std::fs::Metadata) -> Self {
        Self {
            entity_tag: format!("\"{image_id}\""),
            written_at: metadata.modified().ok().and_then(whole_seconds),
        }
    }

    /// True when the client's cached copy is still the stored image.
    fn is_fresh(&self, request: &HeaderMap) -> bool {
        if let Some(candidates) = request.get(IF_NONE_MATCH) {
            let Ok(candidates) = candidates.to_str() else {
                return false;
            };
            return candidates.split(',').map(str::trim).any(|candidate| {
                candidate == "*"
                    || candidate.strip_prefix("W/").unwrap_or(candidate) == self.entity_tag
            });
        }

        match (request.get(IF_MODIFIED_SINCE), self.written_at) {
            (Some(since), Some(written_at)) => since
                .to_str()
                .ok()
                .and_then(|since| parse_http_date(since).ok())
                .is_some_and(|since| written_at <= since),
            _ => false,
        }
    }

    fn headers(&self, mut response: axum::http::response::Builder) -> axum::http::response::Builder {
        response = response.header(CACHE_CONTROL, IMAGE_CACHE_CONTROL);
        if let Ok(etag) = HeaderValue::from_str(&self.entity_tag) {
            response = response.header(ETAG, etag);
        }
        if let Some(written_at) = self.written_at {
            response = response.header(LAST_MODIFIED, fmt_http_date(written_at));
        }
        response
    }
}

fn whole_seconds(time: SystemTime) -> Option<SystemTime> {
    let since_epoch = time.duration_since(UNIX_EPOCH).ok()?;
    Some(UNIX_EPOCH + Duration::from_secs(since_epoch.as_secs()))
}

/// handles GET /image/{id}
pub(crate) async fn image_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(image_id): Path<String>,
) -> Result<Response, RelayError> {
    let image_path = state.store.resolve(&image_id)?;

    let metadata = match tokio::fs::metadata(&image_path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(RelayError::NotFound(image_id)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(RelayError::NotFound(image_id));
        }
        Err(err) => return Err(RelayError::InternalServerError(err.to_string())),
    };
    let tag = StoredImageTag::new(&image_id, &metadata);
    if tag.is_fresh(&headers) {
        debug!("Not modified: {image_id}");
        return tag
            .headers(Response::builder().status(StatusCode::NOT_MODIFIED))
            .body(Body::empty())
            .map_err(RelayError::from);
    }

    match tokio::fs::read(&image_path).await {
        Ok(bytes) => tag
            .headers(Response::builder())
            .header(CONTENT_TYPE, "image/jpeg")
            .header(CONTENT_DISPOSITION, "inline")
            .body(Body::from(bytes))
            .map_err(RelayError::from),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(RelayError::NotFound(image_id)),
        Err(err) => Err(RelayError::InternalServerError(err.to_string())),
    }
}

pub(crate) use crate::error::RelayError;
pub(crate) use crate::web::AppState;
pub(crate) use askama::Template;
pub(crate) use askama_web::WebTemplate;
pub(crate) use axum::extract::{Path, Query, State};
pub(crate) use serde::Deserialize;
pub(crate) use tracing::{debug, info};

use super::prelude::*;
use crate::pipeline::{generate_and_store, resolve_prompt};

#[derive(Template, WebTemplate)]
#[template(path = "generated.html")]
pub(crate) struct GeneratedTemplate {
    pub(crate) image_id: String,
    pub(crate) embed_text: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "gallery.html")]
pub(crate) struct GalleryTemplate {
    pub(crate) image_ids: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GenerateQuery {
    text: Option<String>,
}

/// handles the / GET
pub(crate) async fn generate_handler(
    State(state): State<AppState>,
    Query(query): Query<GenerateQuery>,
) -> Result<GeneratedTemplate, RelayError> {
    let prompt = resolve_prompt(query.text.as_deref())?;
    let image_id =
        generate_and_store(&state.client, &state.config, &state.store, &prompt).await?;

    Ok(GeneratedTemplate {
        embed_text: state.config.embed_snippet(image_id.as_str()),
        image_id: image_id.to_string(),
    })
}

/// handles GET /gallery
pub(crate) async fn gallery_handler(
    State(state): State<AppState>,
) -> Result<GalleryTemplate, RelayError> {
    let image_ids = state.store.list().await?;
    info!("Gallery listing {} images", image_ids.len());
    Ok(GalleryTemplate { image_ids })
}

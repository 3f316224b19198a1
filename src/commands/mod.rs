pub mod fulfill;
pub mod orders;
pub mod settings;

use anyhow::{anyhow, Result};

use crate::models::Settings;
use crate::services::api::ApiClient;
use crate::services::crypto;

pub fn client_from_settings(settings: &Settings) -> Result<ApiClient> {
    let server_url = settings.server_url.as_deref().ok_or_else(|| {
        anyhow!("Server URL not configured; run `pickterm settings set --server-url <url>`")
    })?;
    let stored = settings.api_token.as_deref().ok_or_else(|| {
        anyhow!("API token not configured; run `pickterm settings set --api-token <token>`")
    })?;
    let token = crypto::load_token(stored)?;
    Ok(ApiClient::new(server_url, token))
}

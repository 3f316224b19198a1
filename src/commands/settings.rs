use anyhow::Result;

use crate::commands::client_from_settings;
use crate::config::ConfigStore;
use crate::services::crypto;

pub fn show(store: &ConfigStore) -> Result<()> {
    let settings = store.load()?;
    println!("config:     {}", store.path().display());
    println!(
        "server_url: {}",
        settings.server_url.as_deref().unwrap_or("(unset)")
    );
    println!(
        "api_token:  {}",
        if settings.api_token.is_some() {
            "(stored)"
        } else {
            "(unset)"
        }
    );
    Ok(())
}

pub fn set(
    store: &ConfigStore,
    server_url: Option<String>,
    api_token: Option<String>,
) -> Result<()> {
    let mut settings = store.load()?;
    if let Some(url) = server_url {
        settings.server_url = Some(url.trim_end_matches('/').to_string());
    }
    if let Some(token) = api_token {
        if !token.trim().is_empty() {
            settings.api_token = Some(crypto::store_token(token.trim())?);
        }
    }
    store.save(&settings)?;
    println!("Settings saved");
    Ok(())
}

pub async fn test(store: &ConfigStore) -> Result<()> {
    let client = client_from_settings(&store.load()?)?;
    match client.ping().await {
        Ok(true) => println!("Server reachable and token accepted"),
        Ok(false) => println!("Server responded but rejected the request"),
        Err(err) => println!("Connection failed: {err}"),
    }
    Ok(())
}

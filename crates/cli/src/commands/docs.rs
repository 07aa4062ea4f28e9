//! `agenrp docs`: Document backend commands.

use agenrp_config::AppConfig;
use agenrp_core::storage::DocumentStore;
use agenrp_storage::{SupabaseStore, upload_document, upload_file_from_path};
use std::path::Path;

fn open_store(config: &AppConfig) -> Result<SupabaseStore, Box<dyn std::error::Error>> {
    let backend = config.backend.resolve(None, None)?;
    Ok(SupabaseStore::new(backend))
}

pub async fn upload(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = open_store(&config)?;

    let upload = upload_file_from_path(file).await?;
    let stored = upload_document(&store, &upload).await?;

    println!("✅ Uploaded {}", upload.name);
    println!("   Path: {}", stored.path);
    println!("   URL:  {}", stored.public_url);
    Ok(())
}

pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = open_store(&config)?;

    let records = store.list_metadata().await?;
    if records.is_empty() {
        println!("  No documents stored in '{}'.", config.backend.table);
        return Ok(());
    }

    println!("  {:<8} {:<18} NAME", "ID", "TYPE");
    for record in &records {
        println!("  {:<8} {:<18} {}", record.id, record.mime_type, record.name);
    }
    println!("\n  {} document(s)", records.len());
    Ok(())
}

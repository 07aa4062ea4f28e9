//! `agenrp doctor`: Diagnose configuration and connectivity.

use agenrp_config::AppConfig;
use agenrp_core::storage::DocumentStore;
use agenrp_storage::SupabaseStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Agen RP Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if !config_path.exists() {
        println!("  ⚠️  No config file — run `agenrp onboard` (using defaults)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid (model {}, temperature {})", config.model, config.temperature);
            config
        }
        Err(e) => {
            println!("  ❌ Config file invalid: {e}");
            println!("\n  ⚠️  1 blocking issue found.");
            return Ok(());
        }
    };

    match config.grounding.load_policy() {
        Ok(Some(policy)) => println!("  ✅ Custom grounding policy loaded ({} bytes)", policy.len()),
        Ok(None) => println!("  ✅ Built-in grounding policy"),
        Err(e) => {
            println!("  ❌ Grounding policy unreadable: {e}");
            issues += 1;
        }
    }

    // API key and model endpoint
    match agenrp_providers::build_from_config(&config, None) {
        Ok(provider) => {
            println!("  ✅ API key available");
            match provider.health_check().await {
                Ok(true) => println!("  ✅ {} endpoint reachable", provider.name()),
                Ok(false) => {
                    println!("  ⚠️  {} endpoint returned an error status", provider.name());
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ {} check failed: {e}", provider.name());
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ⚠️  {e}: run `agenrp config set-key <KEY>` or set GEMINI_API_KEY");
            issues += 1;
        }
    }

    // Document backend (optional)
    if config.backend.is_configured() {
        let store = SupabaseStore::new(config.backend.resolve(None, None)?);
        match store.list_metadata().await {
            Ok(records) => println!(
                "  ✅ Supabase reachable ({} document(s) in '{}')",
                records.len(),
                config.backend.table
            ),
            Err(e) => {
                println!("  ❌ Supabase check failed: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ℹ️  No Supabase backend configured (local documents only)");
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

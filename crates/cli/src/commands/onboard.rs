//! `agenrp onboard`: First-time setup.

use agenrp_agent::notices;
use agenrp_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("🏛️  {} — Persediaan Awal", notices::APP_NAME);
    println!("================================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Run: agenrp config set-key <GEMINI_API_KEY>");
        println!("   2. (Optional) Add [backend] url and anon_key for Supabase storage");
        println!("   3. Run: agenrp chat -d Jilid1.pdf\n");
    }

    println!("{}\n", notices::DISCLAIMER);
    Ok(())
}

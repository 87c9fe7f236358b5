//! `swarmwright onboard`: first-time setup.

use swarmwright_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🐝 Swarmwright First-Time Setup");
    println!("==============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Edit {} and add your API key", config_path.display());
    println!("      (or export SWARMWRIGHT_API_KEY / OPENROUTER_API_KEY)");
    println!("   2. Optionally add [agents.<role>] sections for planner, researcher,");
    println!("      summarizer, critic and reflector");
    println!("   3. Run: swarmwright run \"your question\"\n");

    println!("🎉 Setup complete!\n");

    Ok(())
}

//! `swarmwright doctor`: diagnose setup problems.

use swarmwright_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Swarmwright Doctor");
    println!("=====================\n");

    let mut issues = 0;

    println!("  ✅ Rust binary running");

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file, using defaults (run `swarmwright onboard`)");
        issues += 1;
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");

            if config.has_api_key() {
                println!("  ✅ API key configured");
            } else {
                println!("  ⚠️  No API key configured. Add api_key to config.toml or export SWARMWRIGHT_API_KEY");
                issues += 1;
            }

            match swarmwright_providers::build_roster(&config) {
                Ok(roster) => println!("  ✅ All five roles resolved: {roster:?}"),
                Err(e) => {
                    println!("  ❌ Roster incomplete: {e}");
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ❌ Config file invalid: {e}");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

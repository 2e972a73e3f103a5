//! List signal rules command.

use anyhow::Result;
use scalper_config::AppConfig;
use scalper_signals::RuleRegistry;

pub async fn run(config: &AppConfig) -> Result<()> {
    let registry = RuleRegistry::new();

    println!("Available Signal Rules");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        let marker = if info.key == config.strategy.rule {
            " (configured)"
        } else {
            ""
        };
        println!("  {} [{}]{}", info.name, info.key, marker);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!("  Defaults: {}", info.default_config);
        println!();
    }

    println!("Use --rule <key> or [strategy] rule = \"<key>\" to select a rule.");

    Ok(())
}

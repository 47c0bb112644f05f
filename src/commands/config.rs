use anyhow::{Context, Result};

use super::{load, Globals};

/// Print the effective configuration after all layers are applied.
pub fn cmd_config(globals: &Globals) -> Result<()> {
    let loaded = load(globals)?;

    if globals.json {
        let source = loaded.source.as_ref().map(|p| p.display().to_string());
        let warnings: Vec<String> = loaded.warnings.iter().map(|w| w.to_string()).collect();
        let output = serde_json::json!({
            "source": source,
            "warnings": warnings,
            "config": loaded.config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match &loaded.source {
        Some(path) => println!("# source: {}", path.display()),
        None => println!("# source: built-in defaults"),
    }
    let rendered = loaded
        .config
        .to_toml()
        .context("failed to render configuration")?;
    print!("{}", rendered);
    Ok(())
}

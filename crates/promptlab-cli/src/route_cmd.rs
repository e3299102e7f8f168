//! `promptlab route MODEL` — dry-run the routing step for one model key.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use promptlab_core::config::load_config;
use promptlab_providers::ProviderRegistry;

use crate::helpers::format_overrides;

pub fn run(config_path: Option<&Path>, model: &str) -> Result<()> {
    let config = load_config(config_path);
    let registry = ProviderRegistry::from_config(&config.providers);
    let descriptor = registry.resolve(model);

    println!();
    if registry.get(model).is_some() {
        println!("  {} → {}", model.bold(), descriptor.display_name.green());
    } else {
        println!(
            "  {} → {} {}",
            model.bold(),
            descriptor.display_name.yellow(),
            "(no exact match, fallback route)".dimmed()
        );
    }
    println!("    {:<12} {}", "endpoint", descriptor.endpoint_url);
    println!("    {:<12} {}", "credential", descriptor.credential_env);
    println!(
        "    {:<12} {}",
        "overrides",
        format_overrides(&descriptor.payload_overrides)
    );
    println!();

    Ok(())
}

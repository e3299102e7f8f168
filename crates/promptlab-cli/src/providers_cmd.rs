//! `promptlab providers` — show the routing table and credential status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use promptlab_core::config::{get_config_path, load_config};
use promptlab_providers::{Credentials, ProviderRegistry};

use crate::helpers::{credential_status, format_overrides};

/// Run the providers command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    let registry = ProviderRegistry::from_config(&config.providers);
    let credentials = Credentials::from_env(&registry);

    println!();
    println!("{}", "Promptlab Providers".cyan().bold());
    println!();
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        path.display(),
        if path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using built-ins)".dimmed().to_string()
        }
    );
    println!();

    for descriptor in registry.iter() {
        let key = if descriptor.is_fallback() {
            format!("{} (fallback)", descriptor.model_key)
        } else {
            descriptor.model_key.clone()
        };
        println!("  {}", key.bold());
        println!("    {:<12} {}", "provider", descriptor.display_name);
        println!("    {:<12} {}", "endpoint", descriptor.endpoint_url.dimmed());
        println!(
            "    {:<12} {} {}",
            "credential",
            descriptor.credential_env,
            credential_status(credentials.is_set(&descriptor.credential_env))
        );
        println!(
            "    {:<12} {}",
            "overrides",
            format_overrides(&descriptor.payload_overrides)
        );
        if let Some(timeout) = descriptor.timeout {
            println!("    {:<12} {}s", "timeout", timeout.as_secs());
        }
        println!();
    }

    Ok(())
}

use std::path::Path;

use {anyhow::Result, clap::Subcommand, secrecy::ExposeSecret};

use foodlens_config::{FoodlensConfig, Severity, validate};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the configuration and report errors/warnings.
    Check,
    /// Print the effective configuration with secrets redacted.
    Show,
}

pub fn handle_config(action: ConfigAction, config_path: Option<&Path>) -> Result<()> {
    let config = crate::load(config_path)?;
    match action {
        ConfigAction::Check => check(&config),
        ConfigAction::Show => {
            show(&config);
            Ok(())
        },
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(config: &FoodlensConfig) -> Result<()> {
    let diagnostics = validate(config);

    for d in &diagnostics {
        let (color, label) = match d.severity {
            Severity::Error => (RED, "error"),
            Severity::Warning => (YELLOW, "warning"),
        };
        eprintln!("  {BOLD}{color}{label}{RESET} {}: {}", d.path, d.message);
    }

    let errors = count(&diagnostics, Severity::Error);
    let warnings = count(&diagnostics, Severity::Warning);

    if !diagnostics.is_empty() {
        eprintln!();
    }

    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn count(diagnostics: &[foodlens_config::Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}

fn show(config: &FoodlensConfig) {
    let set = |secret: &secrecy::Secret<String>| {
        if secret.expose_secret().is_empty() {
            "<unset>"
        } else {
            "<set>"
        }
    };

    println!("server.bind            = {}", config.server.bind);
    println!("server.port            = {}", config.server.port);
    println!("server.webhook_path    = {}", config.server.webhook_path);
    println!(
        "line.channel_token     = {}",
        set(&config.line.channel_access_token)
    );
    println!("vision.model           = {}", config.vision.model);
    println!("vision.api_key         = {}", set(&config.vision.api_key));
    match &config.storage {
        Some(s) => {
            println!("storage.bucket         = {}", s.bucket);
            println!("storage.region         = {}", s.region);
            println!("storage.key_prefix     = {}", s.key_prefix);
            if let Some(endpoint) = &s.endpoint {
                println!("storage.endpoint       = {endpoint}");
            }
        },
        None => println!("storage                = <disabled>"),
    }
    println!("bot.save_keywords      = {}", config.bot.save_keywords.join(", "));
}

//! Config command

use anyhow::{anyhow, Result};
use camino::Utf8Path;
use obsgen_core::config::{generate_default_config, ObsgenConfig};

use crate::cli::{ConfigCommands, ConfigInitArgs, ConfigShowArgs};
use crate::output;

pub fn run(cmd: ConfigCommands, config_path: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Init(args) => init(args),
        ConfigCommands::Show(args) => show(args, config_path),
    }
}

fn init(args: ConfigInitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        return Err(anyhow!(
            "File {} already exists. Use --force to overwrite.",
            args.output
        ));
    }

    let content = generate_default_config(&args.namespace)
        .map_err(|e| anyhow!("Failed to generate config: {}", e))?;
    std::fs::write(&args.output, content)?;

    output::success(&format!("Created {}", args.output));
    output::info(&format!("Namespace: {}", args.namespace));

    Ok(())
}

fn show(args: ConfigShowArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = ObsgenConfig::load(config_path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config.config)?);
    } else {
        output::info(&format!("Loaded from {}", config.config_path));
        print!("{}", config.to_yaml()?);
    }

    Ok(())
}

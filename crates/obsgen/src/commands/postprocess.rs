//! Postprocess command

use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use obsgen_core::types::{Template, TEMPLATE_KIND};
use obsgen_core::{ObsgenConfig, PostProcessor};
use tracing::debug;

use crate::cli::PostprocessArgs;
use crate::output;

pub fn run(args: PostprocessArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let mut config = ObsgenConfig::load(config_path)?.config;
    if let Some(secret) = args.objstore_secret {
        if secret.trim().is_empty() {
            return Err(anyhow!(
                "--objstore-secret must not be empty; omit it to use obsgen.yaml"
            ));
        }
        debug!("Using objstore secret '{}' from the command line", secret);
        config.objstore_secret = Some(secret);
    }

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input))?;
    let mut template: Template = serde_yaml_ng::from_str(&content)
        .with_context(|| format!("Failed to parse {}", args.input))?;

    if template.kind != TEMPLATE_KIND {
        output::warning(&format!(
            "{} has kind '{}', expected '{}'",
            args.input, template.kind, TEMPLATE_KIND
        ));
    }
    if config.objstore_secret.is_none() {
        output::info("No objstoreSecret configured, leaving workload env unchanged");
    }

    let report = PostProcessor::new(config).process_template(&mut template)?;
    let rendered = serde_yaml_ng::to_string(&template)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path))?;
            output::success(&format!("Wrote {}", path));
            output::kv("ServiceMonitors", &report.service_monitors.to_string());
            output::kv("ServiceAccounts", &report.service_accounts.to_string());
            output::kv("Containers", &report.containers.to_string());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// obsgen - post-process generated Observatorium manifests
#[derive(Parser, Debug)]
#[command(name = "obsgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to obsgen.yaml config file
    #[arg(short, long, global = true, env = "OBSGEN_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the object storage env vars for a credentials secret
    ObjstoreEnv(ObjstoreEnvArgs),

    /// Post-process a generated OpenShift template
    Postprocess(PostprocessArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct ObjstoreEnvArgs {
    /// Name of the secret holding the S3 credentials
    #[arg(short, long)]
    pub secret: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PostprocessArgs {
    /// Template to process
    #[arg(short, long)]
    pub input: Utf8PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<Utf8PathBuf>,

    /// Override the objstore secret from obsgen.yaml
    #[arg(long)]
    pub objstore_secret: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new obsgen.yaml
    Init(ConfigInitArgs),

    /// Show resolved configuration
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Namespace the manifests are deployed to
    #[arg(short, long)]
    pub namespace: String,

    /// Output file path
    #[arg(short, long, default_value = "obsgen.yaml")]
    pub output: Utf8PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

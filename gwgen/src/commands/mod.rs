mod completions;
mod generate;
mod plan;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use gwgen_codegen::{CONFIG_FILE, Config, FileFailure, GenerateConfig};
use gwgen_descriptor::{DescriptorSet, Registry};
use plan::PlanCommand;
use tracing::debug;

/// Extension trait for exiting on descriptor errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for gwgen_descriptor::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

/// Print per-file failures as diagnostics.
pub(crate) fn report_failures(failures: Vec<FileFailure>) {
    for failure in failures {
        eprintln!("error in {}:", failure.file);
        eprintln!("{:?}", miette::Report::new(*failure.error));
    }
}

#[derive(Parser)]
#[command(name = "gwgen")]
#[command(version)]
#[command(about = "Generate grpc-gateway reverse proxies from linked descriptor sets")]
pub(crate) struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Plan(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate gateway files from a descriptor set
    Generate(GenerateCommand),

    /// Show which artifacts each file would produce, without rendering
    Plan(PlanCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Inputs shared by `generate` and `plan`.
#[derive(Args)]
pub(crate) struct RunArgs {
    /// Descriptor set (JSON, or TOML with a .toml extension)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to gwgen.toml (defaults to ./gwgen.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Generate gateways in a package separate from the RPC stubs
    #[arg(long)]
    pub separate_package: bool,

    /// Move gateways into their own subdirectory, leaving an alias shim behind
    #[arg(long)]
    pub standalone: bool,

    /// Do not emit package documentation on gateway files
    #[arg(long)]
    pub omit_package_doc: bool,

    /// Suffix of the registration functions (default "Handler")
    #[arg(long)]
    pub register_func_suffix: Option<String>,
}

impl RunArgs {
    /// Config file settings with command-line overrides applied.
    pub fn settings(&self) -> GenerateConfig {
        let config = match &self.config {
            Some(path) => Config::open(path).unwrap_or_exit(),
            None if Path::new(CONFIG_FILE).exists() => Config::open(CONFIG_FILE).unwrap_or_exit(),
            None => Config::default(),
        };
        self.overlay(config.generate)
    }

    fn overlay(&self, mut settings: GenerateConfig) -> GenerateConfig {
        settings.separate_package |= self.separate_package;
        settings.standalone |= self.standalone;
        settings.omit_package_doc |= self.omit_package_doc;
        if let Some(suffix) = &self.register_func_suffix {
            settings.register_func_suffix = suffix.clone();
        }
        settings
    }

    /// Load the descriptor set and a registry configured from `settings`.
    pub fn prepare(&self, settings: &GenerateConfig) -> (DescriptorSet, Registry) {
        let set = DescriptorSet::open(&self.input).unwrap_or_exit();

        let mut registry = Registry::new();
        settings.apply(&mut registry);
        debug!(
            separate_package = registry.separate_package(),
            standalone = registry.standalone(),
            omit_package_doc = registry.omit_package_doc(),
            "configured registry"
        );
        (set, registry)
    }
}

use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result, bail};
use gwgen_codegen::{
    Generator,
    generation::{FileCategory, OutputRegistry},
};

use super::{RunArgs, report_failures};

#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub args: RunArgs,

    /// Output directory (defaults to `output` in gwgen.toml, then the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let settings = self.args.settings();
        let (set, mut registry) = self.args.prepare(&settings);

        let mut generation =
            Generator::new(settings.options()).generate(&mut registry, &set.files);

        let mut output = OutputRegistry::new();
        output.register_generation(&generation);

        if self.dry_run {
            Self::print_preview(&output);
        } else {
            let dir = self
                .output
                .clone()
                .or(settings.output)
                .unwrap_or_else(|| PathBuf::from("."));
            let stats = output
                .write_all(&dir)
                .wrap_err("Failed to write generated files")?;

            println!("Generated {} files in {}", stats.written, dir.display());
            for entry in output.entries() {
                let marker = match entry.category {
                    FileCategory::Gateway => "+",
                    FileCategory::AliasShim => "~",
                };
                println!("  {marker} {}", entry.path);
            }
        }

        let failures = std::mem::take(&mut generation.failures);
        if !failures.is_empty() {
            let count = failures.len();
            report_failures(failures);
            bail!("{count} of {} files failed", set.len());
        }
        Ok(())
    }

    fn print_preview(output: &OutputRegistry) {
        let files = output.preview();

        for file in &files {
            println!("── {} ──", file.path);
            println!("{}", file.content);
        }

        println!("── Summary ──");
        println!("{} files would be generated", files.len());
    }
}

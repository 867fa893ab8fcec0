use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ce_ast::TransformOptions;
use ce_parser::parse_commonjs;
use ce_transform::{transform_file, TransformOutput};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;

mod logging;

#[derive(Parser)]
#[command(name = "cjs2esm", about = "cjs2esm: rewrite CommonJS modules as ES modules")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert CommonJS files to ES modules.
    Convert {
        /// Input .js/.cjs/.ts files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output file (single input only; stdout if omitted).
        #[arg(short, long, conflicts_with = "write")]
        output: Option<PathBuf>,
        /// Rewrite the input files in place.
        #[arg(long)]
        write: bool,
        /// Print the local modules each file imports.
        #[arg(long)]
        deps: bool,
        /// Print per-file statistics as JSON on stderr.
        #[arg(long)]
        stats: bool,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Parse the files and report any syntax errors.
    Check {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Parse a file and dump the AST.
    Parse {
        input: PathBuf,
        /// Dump as JSON instead of debug output.
        #[arg(long)]
        ast: bool,
    },
}

#[derive(Args)]
struct OptionArgs {
    /// JSON file with transform options.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Extension used to complete relative specifiers.
    #[arg(long)]
    extension: Option<String>,
    /// Do not inject the __dirname/__filename polyfill.
    #[arg(long)]
    no_polyfill: bool,
    /// Leave module.exports assignments alone.
    #[arg(long)]
    no_exports: bool,
    /// Do not annotate require() calls that are left in place.
    #[arg(long)]
    no_annotate: bool,
    /// Write a source map next to each output file.
    #[arg(long)]
    source_map: bool,
}

impl OptionArgs {
    fn load(&self) -> Result<TransformOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => TransformOptions::default(),
        };

        if let Some(extension) = &self.extension {
            options.extension = extension.clone();
        }
        options.polyfill &= !self.no_polyfill;
        options.exports &= !self.no_exports;
        options.annotate &= !self.no_annotate;
        options.source_map |= self.source_map;
        Ok(options)
    }
}

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            inputs,
            output,
            write,
            deps,
            stats,
            options,
        } => {
            if output.is_some() && inputs.len() > 1 {
                bail!("--output takes a single input; use --write for several files");
            }
            let options = options.load()?;

            // Each unit owns its source map and comments, so files convert
            // independently on the rayon pool.
            let results: Vec<_> = inputs
                .par_iter()
                .map(|input| (input, transform_file(input, &options)))
                .collect();

            let mut failed = 0;
            for (input, result) in results {
                match result {
                    Ok(converted) => {
                        let target = match (&output, write) {
                            (Some(path), _) => Some(path.as_path()),
                            (None, true) => Some(input.as_path()),
                            (None, false) => None,
                        };
                        emit(input, target, &converted, inputs.len() > 1)?;
                        if deps {
                            for module in &converted.local_modules {
                                println!("{}: {module}", input.display());
                            }
                        }
                        if stats {
                            eprintln!(
                                "{}: {}",
                                input.display(),
                                serde_json::to_string(&converted.stats)?
                            );
                        }
                    }
                    Err(err) => {
                        failed += 1;
                        eprintln!("error: {}: {err}", input.display());
                    }
                }
            }

            if failed > 0 {
                bail!("{failed} file(s) failed to convert");
            }
        }
        Commands::Check { inputs } => {
            let mut failed = 0;
            for input in &inputs {
                let source = std::fs::read_to_string(input)
                    .with_context(|| format!("failed to read {}", input.display()))?;
                let filename = input.display().to_string();
                match parse_commonjs(&source, &filename) {
                    Ok(_) => eprintln!("OK: {filename}"),
                    Err(err) => {
                        failed += 1;
                        eprintln!("error: {err}");
                    }
                }
            }
            if failed > 0 {
                bail!("{failed} file(s) have syntax errors");
            }
        }
        Commands::Parse { input, ast } => {
            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let filename = input.display().to_string();
            let parsed = parse_commonjs(&source, &filename)?;

            if ast {
                let json = serde_json::to_string_pretty(&parsed.module)?;
                println!("{json}");
            } else {
                println!("{:#?}", parsed.module);
            }
        }
    }

    Ok(())
}

/// Write converted code to `target`, or print it.
fn emit(
    input: &Path,
    target: Option<&Path>,
    converted: &TransformOutput,
    header: bool,
) -> Result<()> {
    match target {
        Some(path) => {
            std::fs::write(path, &converted.code)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(input = %input.display(), output = %path.display(), "converted");
        }
        None => {
            if header {
                println!("// {}", input.display());
            }
            print!("{}", converted.code);
        }
    }

    if let Some(srcmap) = &converted.source_map {
        let map_path = format!("{}.map", target.unwrap_or(input).display());
        std::fs::write(&map_path, srcmap)
            .with_context(|| format!("failed to write {map_path}"))?;
        eprintln!("Source map written to {map_path}");
    }
    Ok(())
}

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tsmirror_driver::{build, BuildError, BuildOptions, Location, Platform};

#[derive(Parser)]
#[command(
    name = "tsmirror",
    version,
    about = "Compile a TypeScript source tree to JavaScript, mirroring its layout",
    long_about = "Compiles every matched TypeScript file to JavaScript with a source map,\n\
                  rewrites relative imports between compiled files to their new extension,\n\
                  and copies declaration files through unchanged."
)]
struct Cli {
    /// Entry glob patterns, relative to the root
    entries: Vec<String>,

    /// Root directory (path or file:// URL) [default: current directory]
    #[arg(long)]
    root: Option<Location>,

    /// Output directory (path or file:// URL), wiped before writing [default: ./dist]
    #[arg(short, long)]
    output: Option<Location>,

    /// Platform the output targets: `node` or `neutral` [default: node]
    #[arg(short, long)]
    platform: Option<Platform>,

    /// Extra file suffix to copy instead of compiling (repeatable)
    #[arg(long)]
    exclude: Vec<String>,

    /// Output extension for compiled `.ts` files [default: .js]
    #[arg(long)]
    ext: Option<String>,

    /// Glob pattern to drop from the entries (repeatable)
    #[arg(long)]
    ignore: Vec<String>,

    /// JSON file with build options; command-line values take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let options = build_options(cli)?;
    build(&options)?;
    Ok(())
}

fn build_options(cli: Cli) -> Result<BuildOptions> {
    let mut options = match &cli.config {
        Some(path) => BuildOptions::from_json_file(path)
            .with_context(|| format!("failed to load options from {}", path.display()))?,
        None => BuildOptions::default(),
    };

    if !cli.entries.is_empty() {
        options.entries = cli.entries;
    }
    if let Some(root) = cli.root {
        options.root = root;
    }
    if let Some(output) = cli.output {
        options.output = output;
    }
    if let Some(platform) = cli.platform {
        options.platform = platform;
    }
    if !cli.exclude.is_empty() {
        options.exclude = cli.exclude;
    }
    if cli.ext.is_some() {
        options.ext = cli.ext;
    }
    if !cli.ignore.is_empty() {
        options.ignore = cli.ignore;
    }

    Ok(options)
}

fn report_error(err: &anyhow::Error) {
    if let Some(BuildError::Compile(compile)) = err.downcast_ref::<BuildError>() {
        if let Some(diagnostic) = compile.diagnostic() {
            if diagnostic.eprint().is_ok() {
                return;
            }
        }
    }
    eprintln!("error: {err:#}");
}

use clap::{Parser, Subcommand};
use docbuild::context::BuildContext;
use docbuild::plan::{self, BuildOptions};
use docbuild::render::PandocRenderer;
use docbuild::{config, output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(clap::Args, Clone, Default)]
struct BuildArgs {
    /// Rebuild every document, ignoring timestamps
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
#[command(name = "docbuild")]
#[command(about = "Incremental pandoc builds for directory-per-page sites")]
#[command(long_about = "\
Incremental pandoc builds for directory-per-page sites

Every directory containing index.md is a document. Its index.html is
rebuilt when it is missing or older than any of: the index.md next to it,
the shared metadata file, or docbuild itself (binary or docbuild.toml).

Site structure:

  site/
  ├── docbuild.toml        # Build config (optional)
  ├── pandoc.yaml          # Metadata file passed to every render
  ├── index.md             → index.html
  └── docs/
      ├── intro/
      │   └── index.md     → index.html
      └── usage/
          └── index.md     → index.html

A failed render does not stop the build; the remaining documents are
still processed and docbuild exits non-zero at the end.

Run 'docbuild gen-config' to generate a documented docbuild.toml.")]
#[command(version)]
struct Cli {
    /// Directory searched for documents
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Metadata file passed to the renderer [default: <root>/pandoc.yaml]
    #[arg(long, global = true)]
    metadata: Option<PathBuf>,

    /// Config file [default: <root>/docbuild.toml, if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log diagnostics to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render every stale document (the default)
    Build(BuildArgs),
    /// Show what build would do without rendering anything
    Check(BuildArgs),
    /// Print a stock docbuild.toml with all options documented
    GenConfig,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "docbuild=warn",
        1 => "docbuild=debug",
        _ => "docbuild=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli
        .command
        .unwrap_or_else(|| Command::Build(BuildArgs::default()));

    match command {
        Command::Build(args) => {
            let ctx = BuildContext::resolve(&cli.root, cli.config.as_deref(), cli.metadata.as_deref())?;
            let renderer = PandocRenderer::new(ctx.config.renderer.clone());
            let report = plan::build(
                &ctx,
                BuildOptions { force: args.force },
                &renderer,
                output::print_build_event,
            )?;
            output::print_build_summary(&report);
            if !report.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Check(args) => {
            let ctx = BuildContext::resolve(&cli.root, cli.config.as_deref(), cli.metadata.as_deref())?;
            let planned = plan::plan(&ctx, BuildOptions { force: args.force })?;
            output::print_plan_output(&planned);
            if !planned.unreadable.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

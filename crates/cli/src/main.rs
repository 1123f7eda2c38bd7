mod download;
mod exit_code;
mod progress;

use clap::Parser;
use colored::Colorize;
use exit_code::{ExitCode, Failure};

#[derive(Parser)]
#[command(name = "graphql-schema")]
#[command(
    about = "Download a GraphQL schema from a remote endpoint via introspection",
    long_about = "Download a GraphQL schema from a remote endpoint via introspection.\n\n\
    The endpoint is taken from the URL argument, the GRAPHQL_ENDPOINT environment \
    variable, or the `schema` entry of a .graphqlrc file, in that order."
)]
#[command(version)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    #[command(flatten)]
    download: download::DownloadArgs,

    /// Force colored output even when not a TTY
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Suppress progress indicators (spinners)
    #[arg(long)]
    no_progress: bool,
}

/// Output verbosity options
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Whether to show progress indicators (spinners)
    pub show_progress: bool,
    /// Whether to show informational output (success messages, timing)
    pub show_info: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    let output_opts = OutputOptions {
        show_progress: !cli.quiet && !cli.no_progress,
        show_info: !cli.quiet,
    };

    let code = match download::run(cli.download, output_opts).await {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            let failure = Failure::from_error(&err);
            tracing::debug!(code = failure.code.code(), error = ?err, "Download failed");
            eprintln!(
                "{} {} failed: {err:#}",
                "error:".red().bold(),
                failure.stage
            );
            failure.code
        }
    };
    code.exit();
}

/// Initialize tracing to stderr, filtered by `RUST_LOG` (off by default)
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// Priority order (highest to lowest):
/// 1. `--color` flag (force colors on)
/// 2. `--no-color` flag (force colors off)
/// 3. `NO_COLOR` environment variable (if set to any value, disable colors)
/// 4. `CLICOLOR_FORCE` environment variable (if set to non-zero, force colors)
/// 5. `CLICOLOR` environment variable (if set to "0", disable colors)
/// 6. Default: colors enabled if stdout is a TTY (handled by `colored` crate)
///
/// See: <https://no-color.org/> and <https://bixense.com/clicolors/>
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color {
        control::set_override(true);
    } else if no_color {
        control::set_override(false);
    } else if std::env::var_os("NO_COLOR").is_some() {
        // NO_COLOR: if present (regardless of value), disable colors
        control::set_override(false);
    } else if let Ok(val) = std::env::var("CLICOLOR_FORCE") {
        // CLICOLOR_FORCE: if set to non-empty, non-zero value, force colors
        if !val.is_empty() && val != "0" {
            control::set_override(true);
        }
    } else if let Ok(val) = std::env::var("CLICOLOR") {
        // CLICOLOR: if set to "0", disable colors
        if val == "0" {
            control::set_override(false);
        }
    }
    // Default: let the colored crate decide based on TTY detection
}

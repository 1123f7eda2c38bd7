//! Downloading a schema: resolving settings from flags and config, then
//! running the introspection pipeline.

use crate::OutputOptions;
use anyhow::{Context, Result};
use colored::Colorize;
use graphql_config::{find_config, load_config, ProjectConfig};
use graphql_introspect::{
    fetch_schema, save_schema, IntrospectionClient, JsonPrinter, QueryDetail, SchemaCodec,
    SdlPrinter,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Output file used when neither the command line nor the config names one.
const DEFAULT_OUTPUT: &str = "schema.graphql";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Default connection timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Schema output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SchemaFormat {
    /// SDL (Schema Definition Language) format
    #[default]
    Sdl,
    /// JSON introspection format
    Json,
}

impl SchemaFormat {
    fn codec(self) -> &'static dyn SchemaCodec {
        match self {
            Self::Sdl => &SdlPrinter,
            Self::Json => &JsonPrinter,
        }
    }
}

/// Arguments for a schema download.
#[derive(Debug, Default, clap::Args)]
pub struct DownloadArgs {
    /// GraphQL endpoint URL to introspect
    #[arg(value_name = "URL", env = "GRAPHQL_ENDPOINT")]
    pub url: Option<String>,

    /// Output file path, or `-` for stdout [default: schema.graphql]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to GraphQL config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project name (for multi-project configs)
    #[arg(short, long)]
    pub project: Option<String>,

    /// Output format [default: sdl]
    #[arg(long, value_enum)]
    pub format: Option<SchemaFormat>,

    /// Introspection query detail: `full` or `minimal` [default: full]
    #[arg(long, value_name = "LEVEL")]
    pub detail: Option<QueryDetail>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Connection timeout in seconds [default: 10]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub connect_timeout: Option<u64>,
}

/// Where the encoded schema goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// Fully resolved download settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSettings {
    pub url: String,
    pub output: OutputTarget,
    pub format: SchemaFormat,
    pub detail: QueryDetail,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

/// Load the project config, either from `config_path` or by searching upwards
/// from `start_dir`.
///
/// Returns `None` when no config file exists and none was asked for.
pub fn load_project(
    config_path: Option<&Path>,
    project_name: Option<&str>,
    start_dir: &Path,
) -> Result<Option<ProjectConfig>> {
    let config_path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if let Some(path) = find_config(start_dir).context("Failed to search for config")? {
        path
    } else {
        if let Some(name) = project_name {
            anyhow::bail!(
                "Project '{name}' was requested but no GraphQL config file was found. \
                Use --config to specify one."
            );
        }
        tracing::debug!("No config file found, using command line settings only");
        return Ok(None);
    };

    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let project_name = project_name.unwrap_or("default");
    let project_config = config.get_project(project_name).with_context(|| {
        if config.is_multi_project() {
            let available: Vec<_> = config.projects().map(|(name, _)| name).collect();
            format!(
                "Project '{}' not found. Available projects: {}",
                project_name,
                available.join(", ")
            )
        } else {
            format!("Project '{project_name}' not found")
        }
    })?;

    Ok(Some(project_config.clone()))
}

/// Resolve download settings for `args`, looking for a config from `start_dir`.
///
/// With an endpoint on the command line and neither `--config` nor
/// `--project`, a discovered config is optional: one that fails to load or has
/// no `default` project is ignored.
pub fn settings_from(args: DownloadArgs, start_dir: &Path) -> Result<DownloadSettings> {
    let explicit = args.config.is_some() || args.project.is_some();
    let has_url = args
        .url
        .as_deref()
        .is_some_and(|url| !url.trim().is_empty());

    let loaded = load_project(args.config.as_deref(), args.project.as_deref(), start_dir);
    let project = match loaded {
        Err(err) if has_url && !explicit => {
            tracing::debug!(
                error = %format!("{err:#}"),
                "Ignoring unusable config, endpoint given"
            );
            None
        }
        result => result?,
    };

    resolve_settings(args, project.as_ref())
}

/// Resolve download settings.
///
/// Command line values win over the project config, which wins over the
/// defaults. The endpoint itself has no default.
pub fn resolve_settings(
    args: DownloadArgs,
    project: Option<&ProjectConfig>,
) -> Result<DownloadSettings> {
    let url = args
        .url
        .filter(|url| !url.trim().is_empty())
        .or_else(|| project.map(|p| p.schema.url().to_string()))
        .context(
            "No GraphQL endpoint given.\n\n\
            Pass it as an argument, set GRAPHQL_ENDPOINT, or add `schema` to a .graphqlrc file:\n  \
            graphql-schema https://api.example.com/graphql",
        )?;

    let output = args
        .output
        .or_else(|| project.and_then(|p| p.output.as_deref().map(PathBuf::from)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let output = if output.as_os_str() == "-" {
        OutputTarget::Stdout
    } else {
        OutputTarget::File(output)
    };

    let format = match (args.format, project.and_then(|p| p.format.as_deref())) {
        (Some(format), _) => format,
        (None, Some(value)) => parse_format(value)?,
        (None, None) => SchemaFormat::default(),
    };

    let detail = match (args.detail, project.and_then(|p| p.detail.as_deref())) {
        (Some(detail), _) => detail,
        (None, Some(value)) => value
            .parse::<QueryDetail>()
            .map_err(|e| anyhow::anyhow!("Invalid detail in config: {e}"))?,
        (None, None) => QueryDetail::default(),
    };

    let timeout = args
        .timeout
        .or_else(|| project.and_then(|p| p.schema.timeout()))
        .unwrap_or(DEFAULT_TIMEOUT);
    let connect_timeout = args
        .connect_timeout
        .or_else(|| project.and_then(|p| p.schema.connect_timeout()))
        .unwrap_or(DEFAULT_CONNECT_TIMEOUT);

    Ok(DownloadSettings {
        url,
        output,
        format,
        detail,
        timeout: Duration::from_secs(timeout),
        connect_timeout: Duration::from_secs(connect_timeout),
    })
}

fn parse_format(value: &str) -> Result<SchemaFormat> {
    <SchemaFormat as clap::ValueEnum>::from_str(value.trim(), true).map_err(|_| {
        anyhow::anyhow!("Invalid format '{value}' in config. Expected 'sdl' or 'json'")
    })
}

/// Resolve settings from the arguments and config, then download.
#[tracing::instrument(skip_all)]
pub async fn run(args: DownloadArgs, output_opts: OutputOptions) -> Result<()> {
    let start_time = Instant::now();

    let current_dir = std::env::current_dir().context("Failed to read current directory")?;
    let settings = settings_from(args, &current_dir)?;
    tracing::debug!(?settings, "Resolved download settings");

    let bytes = execute(&settings, output_opts).await?;

    if let OutputTarget::File(path) = &settings.output {
        if output_opts.show_info {
            println!(
                "{} Schema saved to {} ({}, {} bytes)",
                "✓".green(),
                path.display().to_string().cyan(),
                settings.format.codec().name(),
                bytes
            );
            println!(
                "  {} {:.2}s",
                "⏱".dimmed(),
                start_time.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}

/// Fetch, encode and write the schema. Returns the number of bytes written.
pub async fn execute(settings: &DownloadSettings, output_opts: OutputOptions) -> Result<usize> {
    let client = IntrospectionClient::new()
        .with_timeout(settings.timeout)
        .with_connect_timeout(settings.connect_timeout);

    // Don't show a spinner when the schema itself goes to stdout
    let spinner = (output_opts.show_progress && settings.output != OutputTarget::Stdout)
        .then(|| crate::progress::spinner(&format!("Fetching schema from {}...", settings.url)));

    let result = fetch_schema(
        &client,
        &settings.url,
        settings.detail,
        settings.format.codec(),
    )
    .await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let text = result?;

    match &settings.output {
        OutputTarget::Stdout => {
            let mut handle = std::io::stdout().lock();
            handle
                .write_all(text.as_bytes())
                .and_then(|()| handle.flush())
                .context("Failed to write to stdout")?;
        }
        OutputTarget::File(path) => save_schema(&text, path)?,
    }

    Ok(text.len())
}

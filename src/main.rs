use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use narrator::cli::{Cli, Commands, log_filter};
use narrator::config::Config;
use narrator::model::{ModelRegistry, build_prompt};
use narrator::segment::{Segmenter, SegmenterConfig, to_markup_with};
use owo_colors::OwoColorize;
use std::io::{IsTerminal, Read};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);
    tracing::debug!(version = %narrator::version_string(), "starting");

    match cli.command {
        Commands::Segment {
            file,
            max_chars,
            ssml,
        } => {
            let config = load_config(cli.config.as_deref())?;
            handle_segment(&config, file.as_deref(), max_chars, ssml)?;
        }
        Commands::Route { model_id } => {
            let family = ModelRegistry::with_defaults().route(&model_id)?;
            println!("{}", family);
        }
        Commands::Prompt { file, title, style } => {
            let article = read_input(file.as_deref())?;
            print!("{}", build_prompt(&article, title.as_deref(), &style));
            println!();
        }
        Commands::Validate { file, stage } => {
            let raw = read_input(file.as_deref())?;
            let payload: serde_json::Value = serde_json::from_str(&raw)?;
            let event = narrator::validate(&payload, stage.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&event.to_payload())?);
        }
        #[cfg(all(feature = "http", feature = "html"))]
        Commands::Extract {
            url,
            job_id,
            title,
            store,
            timeout,
        } => {
            let config = load_config(cli.config.as_deref())?;
            extract::run(config, url, job_id, title, &store, timeout)?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "narrator",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Route `tracing` output to stderr. `RUST_LOG` wins over the -q/-v flags.
fn init_logging(quiet: bool, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("narrator={}", log_filter(quiet, verbose))));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/narrator/config.toml)
/// 3. Built-in defaults
///
/// Environment overrides apply on top of all three.
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = match custom_path {
        Some(path) => Config::load(path)?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)?,
            None => Config::default(),
        },
    };

    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Read a whole file, or stdin when no file was given.
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn handle_segment(
    config: &Config,
    file: Option<&Path>,
    max_chars: Option<usize>,
    ssml: bool,
) -> Result<()> {
    let text = read_input(file)?;
    let segmenter = Segmenter::with_config(SegmenterConfig {
        max_chars: max_chars.unwrap_or(config.segmentation.max_chars),
        boundary_ratio: config.segmentation.boundary_ratio,
    });
    let chunks = segmenter.split(&text)?;

    let color = std::io::stdout().is_terminal();
    let total = chunks.len();
    for (index, chunk) in chunks.iter().enumerate() {
        let header = format!(
            "--- chunk {}/{} ({} chars)",
            index + 1,
            total,
            chunk.chars().count()
        );
        if color {
            println!("{}", header.dimmed());
        } else {
            println!("{}", header);
        }

        if ssml {
            println!("{}", to_markup_with(chunk, &config.markup)?);
        } else {
            println!("{}", chunk);
        }
    }
    Ok(())
}

#[cfg(all(feature = "http", feature = "html"))]
mod extract {
    use anyhow::Result;
    use narrator::collab::{
        CollabResult, CollaboratorError, FsArtifactStore, HtmlExtractor, HttpFetcher,
        LanguageModelProvider, SpeechRequest, SpeechSynthesisProvider,
    };
    use narrator::config::Config;
    use narrator::event::{self, Stage};
    use narrator::pipeline::{Collaborators, Pipeline, PipelineSettings};
    use owo_colors::OwoColorize;
    use serde_json::{Map, Value};
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    /// Stand-in for the hosted services the extract stage never calls.
    struct NotConfigured;

    impl LanguageModelProvider for NotConfigured {
        fn invoke_model(&self, _model_id: &str, _body: &Value) -> CollabResult<Value> {
            Err(CollaboratorError::Model {
                message: "no model provider configured".to_string(),
            })
        }
    }

    impl SpeechSynthesisProvider for NotConfigured {
        fn synthesize(&self, _request: &SpeechRequest<'_>) -> CollabResult<Vec<u8>> {
            Err(CollaboratorError::Synthesis {
                message: "no speech provider configured".to_string(),
            })
        }
    }

    pub fn run(
        config: Config,
        url: String,
        job_id: Option<String>,
        title: Option<String>,
        store: &Path,
        timeout: Option<u64>,
    ) -> Result<()> {
        let timeout = Duration::from_secs(timeout.unwrap_or(config.fetch.timeout_secs));
        let fetcher = HttpFetcher::new(timeout, &config.fetch.user_agent)?;

        let artifacts = Arc::new(FsArtifactStore::new(store));
        let not_configured = Arc::new(NotConfigured);
        let collaborators = Collaborators {
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(HtmlExtractor),
            store: artifacts.clone(),
            model: not_configured.clone(),
            speech: not_configured,
        };
        let pipeline = Pipeline::new(PipelineSettings::from(&config), collaborators);

        let mut payload = Map::new();
        let job_id = job_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        payload.insert(event::fields::JOB_ID.to_string(), Value::String(job_id));
        payload.insert(event::fields::SOURCE_URL.to_string(), Value::String(url));
        if let Some(title) = title {
            payload.insert(event::fields::TITLE.to_string(), Value::String(title));
        }

        let input = event::validate(&Value::Object(payload), Some(Stage::Extract.as_str()))?;
        let output = pipeline.extract(&input)?;

        if let Some(key) = output.article_key() {
            let location = output.storage_location(&pipeline.settings().storage_location);
            eprintln!(
                "{} {}",
                "Stored".green(),
                artifacts.path_for(location, key)?.display()
            );
        }
        println!("{}", serde_json::to_string_pretty(&output.to_payload())?);
        Ok(())
    }
}

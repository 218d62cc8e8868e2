//! Generator binary entry point

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;

use generator::{
    GenerationRequest, GeneratorConfig, GeneratorResult, IconGenerator, RealHttpTransport,
};
use shared::logging::{init_tracing, log_error, log_startup, log_success};
use shared::{process_debug, Credential, ProcessId, ProviderId, SamplingOverrides};

#[derive(Parser)]
#[command(name = "generator")]
#[command(about = "Generate an SVG icon from a text description")]
struct Args {
    /// Natural-language description of the icon
    description: String,

    /// Provider to use (openai, anthropic, gemini, ollama); defaults to LLM_PROVIDER
    #[arg(long)]
    provider: Option<String>,

    /// Model override for this call
    #[arg(long)]
    model: Option<String>,

    /// API key for this call; falls back to the configured key
    #[arg(long, env = "GENERATOR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long)]
    temperature: Option<f64>,

    #[arg(long)]
    max_tokens: Option<u32>,

    #[arg(long)]
    top_p: Option<f64>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Write the SVG to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Load environment from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> GeneratorResult<()> {
    let args = Args::parse();

    let process_id = ProcessId::init_generator();
    init_tracing(process_id, Some(&args.log_level));
    log_startup(process_id, "icon generator");

    let config = match &args.env_file {
        Some(path) => GeneratorConfig::from_env_file(path)?,
        None => GeneratorConfig::from_env()?,
    };
    process_debug!(process_id, "Providers ready without per-call key: {:?}", config.ready_providers());

    let mut request = GenerationRequest::new(args.description).with_sampling(SamplingOverrides {
        temperature: args.temperature,
        max_tokens: args.max_tokens,
        top_p: args.top_p,
    });
    if let Some(name) = &args.provider {
        request = request.with_provider(ProviderId::from_str(name)?);
    }
    if let Some(model) = args.model {
        request = request.with_model(model);
    }
    if let Some(credential) = Credential::from_optional(args.api_key.as_deref()) {
        request = request.with_credential(credential);
    }

    let transport = Arc::new(RealHttpTransport::new()?);
    let generator = IconGenerator::from_config(&config, transport);

    let result = match generator.generate(&request).await {
        Ok(result) => result,
        Err(e) => {
            log_error(process_id, "Icon generation", &e);
            return Err(e);
        }
    };

    match args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &result.markup) {
                log_error(process_id, &format!("Writing {}", path.display()), &e);
                std::process::exit(1);
            }
            log_success(
                process_id,
                &format!("Wrote icon from {} ({}) to {}", result.provider_used, result.model_used, path.display()),
            );
        }
        None => println!("{}", result.markup),
    }

    Ok(())
}

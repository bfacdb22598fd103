//! Validate a YAML template batch
//!
//! Usage: `fraudo-validate <payment|p2p> <templates.yaml>`
//!
//! Prints the validation response as JSON and exits non-zero when any
//! template fails to compile.

use anyhow::{bail, Context, Result};
use fraudo_sdk::{
    init_tracing, load_templates_file, EngineConfig, FraudEngineBuilder, ValidateTemplateResponse,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let args: Vec<String> = std::env::args().collect();
    let (domain, path) = match args.as_slice() {
        [_, domain, path] => (domain.as_str(), path.as_str()),
        _ => bail!("usage: fraudo-validate <payment|p2p> <templates.yaml>"),
    };

    let config = EngineConfig::load()?;
    let templates = load_templates_file(path)
        .with_context(|| format!("Failed to load templates from {}", path))?;

    let response: ValidateTemplateResponse = match domain {
        "payment" => FraudEngineBuilder::payment()
            .with_config(config)
            .build()
            .await?
            .validate_templates(&templates),
        "p2p" => FraudEngineBuilder::p2p()
            .with_config(config)
            .build()
            .await?
            .validate_templates(&templates),
        other => bail!("unknown domain '{}', expected payment or p2p", other),
    };

    info!(
        "Validated {} {} templates: {} errors",
        templates.len(),
        domain,
        response.errors.len()
    );
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}

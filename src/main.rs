#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

use anyhow::Context;
use http_request_text_lib::{ParserSettings, RequestParser};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args = std::env::args_os().skip(1);
    let request_path = args
        .next()
        .map(PathBuf::from)
        .context("Usage: http-request-text <request-file> [settings.json]")?;
    let settings = match args.next() {
        Some(path) => ParserSettings::load(path.as_ref()).context("Failed to load settings")?,
        None => ParserSettings::default(),
    };

    // Upload paths resolve against the document's directory, so hand it an absolute path.
    let request_path = request_path
        .canonicalize()
        .with_context(|| format!("Failed to open {}", request_path.display()))?;
    info!(path = %request_path.display(), "Parsing request");

    let parser = RequestParser::new(settings);
    let Some(request) = parser.parse_file(&request_path)? else {
        println!("no request");
        return Ok(());
    };
    println!("{}", serde_json::to_string_pretty(&request)?);

    // Drain the body so missing uploads and oversized streams surface here.
    let body_bytes = std::io::copy(&mut parser.body_reader(&request), &mut std::io::sink())
        .context("Failed to read request body")?;
    info!(body_bytes, "Request body is readable");
    Ok(())
}

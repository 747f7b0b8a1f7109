//! Notewise CLI entrypoint.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use mimalloc::MiMalloc;

use notewise::analysis::NoteAnalyzer;
use notewise::config::Config;
use notewise::embedding::{MiniLmConfig, MiniLmEmbedder};
use notewise::segment::{InMemorySegmentStore, ReferenceSegment};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const REFERENCE_ID: &str = "reference";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file holding the reference segments as an array of strings, in order
    #[clap(long)]
    segments: PathBuf,

    /// Plain-text notes file
    #[clap(long)]
    notes: PathBuf,

    /// Print compact JSON instead of pretty-printed
    #[clap(long, default_value = "false")]
    compact: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::from_env()?;
    config.validate()?;

    let raw_segments = std::fs::read_to_string(&args.segments)
        .with_context(|| format!("failed to read {}", args.segments.display()))?;
    let segment_texts: Vec<String> = serde_json::from_str(&raw_segments)
        .with_context(|| format!("{} is not a JSON array of strings", args.segments.display()))?;
    let notes = std::fs::read_to_string(&args.notes)
        .with_context(|| format!("failed to read {}", args.notes.display()))?;

    let embedder_config = if let Some(path) = &config.model_path {
        MiniLmConfig::new(path.clone())
    } else {
        tracing::warn!("No NOTEWISE_MODEL_PATH configured, running embedder in stub mode");
        MiniLmConfig::stub()
    };
    let embedder = Arc::new(MiniLmEmbedder::load(embedder_config)?);

    let segments = ReferenceSegment::embed_all(&segment_texts, embedder.as_ref())?;
    tracing::info!(
        num_segments = segments.len(),
        notes_len = notes.len(),
        stub = embedder.is_stub(),
        "Reference embedded"
    );

    let store = InMemorySegmentStore::new();
    store.insert(REFERENCE_ID, segments)?;

    let analyzer = NoteAnalyzer::from_config(embedder, store, &config);
    let analysis = analyzer.analyze(REFERENCE_ID, &notes).await?;

    let output = if args.compact {
        serde_json::to_string(&analysis)?
    } else {
        serde_json::to_string_pretty(&analysis)?
    };
    println!("{output}");

    Ok(())
}

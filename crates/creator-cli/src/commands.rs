//! Command implementations for the creator index.
//!
//! Handles:
//! - embed: load, embed and upsert, then optionally verify
//! - verify: check the store against the input file
//! - stats / fetch: read-only store inspection
//! - purge: delete the configured namespace

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use creator_embeddings::{
    Clock, EmbeddingModel, GeminiConfig, GeminiEmbedder, MockEmbedder, RetryPolicy,
    RetryingEmbedder, TokioClock,
};
use creator_indexing::{
    load_records, verify, FixedWindowLimiter, IndexingPipeline, PipelineConfig, RunSummary,
    VerificationReport,
};
use creator_types::Settings;
use creator_vector::{InMemoryStore, PineconeConfig, PineconeStore, VectorStore};

/// Input path from the CLI flag, falling back to configuration.
fn input_path(settings: &Settings, input: Option<&str>) -> PathBuf {
    input
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.expanded_input_path())
}

/// Load settings and apply CLI overrides (highest precedence).
pub fn load_settings(config_path: Option<&str>, log_level: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;
    if let Some(level) = log_level {
        settings.log_level = level.to_string();
    }
    Ok(settings)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Build the configured embedding model wrapped in rate-limit retry.
pub fn build_embedder(
    settings: &Settings,
    clock: Arc<dyn Clock>,
) -> Result<RetryingEmbedder<Box<dyn EmbeddingModel>>> {
    let embedding = &settings.embedding;
    let model: Box<dyn EmbeddingModel> = match embedding.provider.as_str() {
        "gemini" => {
            let api_key = settings.embedding_api_key()?;
            let config = GeminiConfig::new(api_key)
                .with_model(&embedding.model)
                .with_base_url(&embedding.base_url)
                .with_dimensions(embedding.dimensions)
                .with_timeout(embedding.timeout());
            Box::new(GeminiEmbedder::new(config).context("Failed to build Gemini client")?)
        }
        "mock" => Box::new(MockEmbedder::new(embedding.dimensions.unwrap_or(8))),
        other => bail!("Unknown embedding provider: {}", other),
    };

    let policy = RetryPolicy::rate_limited(embedding.max_retries, embedding.backoff_step());
    Ok(RetryingEmbedder::new(model, policy, clock))
}

/// Connect to the configured Pinecone index.
pub async fn connect_store(settings: &Settings) -> Result<PineconeStore> {
    let credentials = settings.store_credentials()?;
    let store = &settings.vector_store;
    let config = PineconeConfig::new(credentials.api_key, credentials.index_name.unwrap_or_default())
        .with_host(credentials.host)
        .with_namespace(&store.namespace)
        .with_control_plane_url(&store.control_plane_url)
        .with_timeout(store.timeout());
    PineconeStore::connect(config)
        .await
        .context("Failed to connect to vector store")
}

/// Run the embedding pipeline.
///
/// Credentials are checked and the input is loaded before any network
/// call, so configuration and data errors abort without partial work.
pub async fn run_embed(
    settings: &Settings,
    input: Option<&str>,
    dry_run: bool,
    verify_after: bool,
) -> Result<RunSummary> {
    let clock: Arc<dyn Clock> = Arc::new(TokioClock);
    let embedder = build_embedder(settings, clock.clone())?;
    if !dry_run {
        settings.store_credentials()?;
    }

    let path = input_path(settings, input);
    let loaded = load_records(&path)
        .with_context(|| format!("Failed to load records from {}", path.display()))?;

    let store: Box<dyn VectorStore> = if dry_run {
        info!("Dry run: vectors go to an in-memory store");
        Box::new(InMemoryStore::new().with_namespace(&settings.vector_store.namespace))
    } else {
        Box::new(connect_store(settings).await?)
    };

    let limiter = FixedWindowLimiter::from_settings(&settings.pacing, clock);
    let pipeline = IndexingPipeline::new(
        &embedder,
        &limiter,
        store.as_ref(),
        PipelineConfig::from_settings(settings),
    );
    let summary = pipeline.run(&loaded).await.context("Embedding run failed")?;
    print_summary(&summary);

    if verify_after {
        let expected = settings
            .verify
            .expected_count
            .unwrap_or(loaded.eligible.len() as u64);
        let sample = loaded.sample_ids(settings.verify.sample_size);
        let report = verify(store.as_ref(), expected, &sample)
            .await
            .context("Verification failed")?;
        print_report(&report);
    }

    Ok(summary)
}

/// Verify the configured store against the input file.
pub async fn run_verify(
    settings: &Settings,
    input: Option<&str>,
    expected: Option<u64>,
    sample: Option<usize>,
) -> Result<VerificationReport> {
    let store = connect_store(settings).await?;
    verify_store(settings, &store, input, expected, sample).await
}

/// Verification against an already-built store.
pub async fn verify_store(
    settings: &Settings,
    store: &dyn VectorStore,
    input: Option<&str>,
    expected: Option<u64>,
    sample: Option<usize>,
) -> Result<VerificationReport> {
    let path = input_path(settings, input);
    let loaded = load_records(&path)
        .with_context(|| format!("Failed to load records from {}", path.display()))?;

    let expected = expected
        .or(settings.verify.expected_count)
        .unwrap_or(loaded.eligible.len() as u64);
    let sample_ids = loaded.sample_ids(sample.unwrap_or(settings.verify.sample_size));

    let report = verify(store, expected, &sample_ids)
        .await
        .context("Verification failed")?;
    print_report(&report);
    Ok(report)
}

/// Print index statistics.
pub async fn show_stats(settings: &Settings, json: bool) -> Result<()> {
    let store = connect_store(settings).await?;
    let stats = store.describe_stats().await.context("Failed to read stats")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    println!("Total records: {}", stats.total_vector_count);
    match stats.dimension {
        Some(d) => println!("Dimension:     {}", d),
        None => println!("Dimension:     unknown"),
    }
    for (name, ns) in &stats.namespaces {
        let label = if name.is_empty() { "(default)" } else { name.as_str() };
        println!("  {:<20} {}", label, ns.vector_count);
    }
    Ok(())
}

/// Print stored metadata for `ids`.
pub async fn fetch_records(settings: &Settings, ids: &[String]) -> Result<()> {
    let store = connect_store(settings).await?;
    let fetched = store.fetch(ids).await.context("Failed to fetch records")?;

    for id in ids {
        match fetched.get(id) {
            Some(record) => {
                println!("{} (dim={})", id, record.dimension());
                println!("{}", serde_json::to_string_pretty(&record.metadata)?);
            }
            None => println!("{} not found", id),
        }
    }
    Ok(())
}

/// Delete every record in the configured namespace.
pub async fn purge(settings: &Settings, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("Refusing to delete all records without --yes");
    }
    let store = connect_store(settings).await?;
    warn!(namespace = %store.namespace(), "Deleting all records");
    store.delete_all().await.context("Failed to delete records")?;
    println!("Deleted all records in namespace {:?}", store.namespace());
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!(
        "Records: {} total, {} eligible, {} excluded",
        summary.total_records, summary.eligible, summary.excluded
    );
    println!(
        "Embedded {}, failed {} ({} chunk(s){})",
        summary.embedded,
        summary.failed(),
        summary.chunks,
        summary
            .dimension
            .map(|d| format!(", dim={}", d))
            .unwrap_or_default()
    );
    for failure in &summary.failures {
        println!("  failed: {}", failure);
    }
    println!(
        "Upserted {} vectors in {} batch(es)",
        summary.upsert.vectors_upserted, summary.upsert.batches_committed
    );
    if !summary.upsert.is_complete() {
        println!(
            "WARNING: {} batch(es) failed; {} vectors not written",
            summary.upsert.batches_failed,
            summary.upsert.failed_ids.len()
        );
    }
}

fn print_report(report: &VerificationReport) {
    println!();
    println!(
        "Store records: {} (expected {}){}",
        report.total_count,
        report.expected_count,
        if report.count_matches() { "" } else { "  MISMATCH" }
    );
    if report.is_empty_store() {
        println!("Store is empty; nothing to verify");
        return;
    }

    println!(
        "Fetched {}/{} sampled records",
        report.records.len(),
        report.sampled.len()
    );
    for id in &report.missing_ids {
        println!("  not found: {}", id);
    }
    for record in &report.records {
        println!("Record {}:", record.id);
        for check in &record.fields {
            let mark = if check.status.is_missing() { "x" } else { "ok" };
            println!("  [{}] {} {}", mark, check.field, check.status);
        }
    }

    if report.all_fields_present {
        println!("All required fields present");
    } else {
        println!("Some required fields missing; re-embed needed");
    }
}

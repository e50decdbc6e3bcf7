//! Command-level tests for the creator index CLI.
//!
//! Embedding uses the mock provider; the vector store is either the
//! in-memory dry-run store or a wiremock stand-in for Pinecone.

use std::io::Write;

use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use creator_cli::{purge, run_embed, run_verify};
use creator_types::Settings;

fn input_file(records: serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(records.to_string().as_bytes())
        .expect("write input");
    file
}

fn offline_settings() -> Settings {
    let mut settings = Settings::default();
    settings.embedding.provider = "mock".to_string();
    settings.pacing.call_delay_ms = 0;
    settings.pacing.chunk_pause_ms = 0;
    settings
}

fn pinecone_settings(server: &MockServer) -> Settings {
    let mut settings = offline_settings();
    settings.vector_store.api_key = Some("pc-key".to_string());
    settings.vector_store.host = Some(server.uri());
    settings
}

#[tokio::test]
async fn test_dry_run_embed_with_verify() {
    let file = input_file(json!([
        {"id": "1", "profile": {"name": "Asha"}, "brand": {"niche": "Fashion"}, "commercials": "Reel: 40k"},
        {"id": "2", "brand": {"niche": "Food"}},
        {"id": "3", "profile": {"name": "Ravi"}, "metrics": {"followers": 5400}}
    ]));
    let settings = offline_settings();

    let summary = run_embed(&settings, file.path().to_str(), true, true)
        .await
        .expect("dry run succeeds");

    assert_eq!(summary.eligible, 2);
    assert_eq!(summary.embedded, 2);
    assert_eq!(summary.upsert.batches_committed, 1);
}

#[tokio::test]
async fn test_missing_input_is_fatal() {
    let settings = offline_settings();
    let result = run_embed(&settings, Some("/nonexistent/creators.json"), true, false).await;
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("Failed to load records"));
}

#[tokio::test]
async fn test_missing_store_credentials_is_fatal() {
    let file = input_file(json!([
        {"id": "1", "profile": {"name": "Asha"}, "brand": {"niche": "Fashion"}}
    ]));
    let settings = offline_settings();

    let result = run_embed(&settings, file.path().to_str(), false, false).await;
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("PINECONE_API_KEY"));
}

#[tokio::test]
async fn test_missing_input_aborts_before_store_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/creators"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"host": server.uri()})))
        .expect(0)
        .mount(&server)
        .await;

    let mut settings = offline_settings();
    settings.vector_store.api_key = Some("pc-key".to_string());
    settings.vector_store.index_name = Some("creators".to_string());
    settings.vector_store.control_plane_url = server.uri();

    let result = run_embed(&settings, Some("/nonexistent/creators.json"), false, false).await;
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("Failed to load records"));
}

#[tokio::test]
async fn test_embed_upserts_to_pinecone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vectors/upsert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"upsertedCount": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let file = input_file(json!([
        {"id": "1", "profile": {"name": "Asha"}, "brand": {"niche": "Fashion"}}
    ]));
    let settings = pinecone_settings(&server);

    let summary = run_embed(&settings, file.path().to_str(), false, false)
        .await
        .expect("embed succeeds");
    assert_eq!(summary.upsert.vectors_upserted, 1);
}

#[tokio::test]
async fn test_verify_against_pinecone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/describe_index_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "namespaces": {"": {"vectorCount": 1}},
            "dimension": 8,
            "totalVectorCount": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/vectors/fetch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "vectors": {"1": {"id": "1", "values": [], "metadata": {"name": "Asha"}}}
        })))
        .mount(&server)
        .await;

    let file = input_file(json!([
        {"id": "1", "profile": {"name": "Asha"}, "brand": {"niche": "Fashion"}}
    ]));
    let settings = pinecone_settings(&server);

    let report = run_verify(&settings, file.path().to_str(), None, None)
        .await
        .expect("verify succeeds");
    assert_eq!(report.total_count, 1);
    assert!(report.count_matches());
    assert_eq!(report.records.len(), 1);
    assert!(!report.all_fields_present);
}

#[tokio::test]
async fn test_purge_requires_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vectors/delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let settings = pinecone_settings(&server);

    assert!(purge(&settings, false).await.is_err());
    purge(&settings, true).await.expect("purge succeeds");
}

//! audit-extract - CLI entry point
//!
//! Uploads a document and prints the extraction result as pretty JSON.

use anyhow::Context;
use audit_extract::{DocumentPayload, ExtractionWorkflow, HttpBackend, WorkflowConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audit_extract=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: audit-extract <document-path>")?;

    let config = WorkflowConfig::from_env().context(format!(
        "{} environment variable is not set",
        audit_extract::config::API_BASE_ENV
    ))?;

    let bytes = std::fs::read(&path).with_context(|| format!("failed to read {}", path))?;
    let filename = std::path::Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.clone());
    let media_type = match std::path::Path::new(&path)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => Some("application/pdf".to_string()),
        // Unknown extensions fall through to the workflow's default type.
        _ => None,
    };

    tracing::info!(%filename, bytes = bytes.len(), "starting upload-and-extract workflow");

    let backend = HttpBackend::new(&config)?;
    let workflow = ExtractionWorkflow::new(backend, config);
    let token = CancellationToken::new();

    let document = DocumentPayload::new(filename, media_type, bytes);
    let result = workflow
        .run::<serde_json::Value, _>(&document, &token, |state| {
            tracing::info!(phase = state.label(), "workflow progress");
        })
        .await;

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "workflow failed");
            Err(e.into())
        }
    }
}

//! Core triage pipeline implementation

use crate::alert::{AlertDispatcher, AlertOutcome};
use crate::assembler::RecordAssembler;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use crate::report::ReportWriter;
use crate::types::{TriageMetadata, TriageOutcome, TriageRequest};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn};
use triage_domain::traits::{CompletionModel, DocumentStore, Notifier, TextExtractor};
use triage_domain::{ClaimRecord, Schema, UpsertOutcome};

/// Turns one claim document into a persisted, reported and possibly
/// escalated `ClaimRecord`
///
/// The model, store and notifier are injected; the pipeline holds no global
/// state and makes exactly one model call per document.
pub struct TriagePipeline<L, S, N>
where
    L: CompletionModel,
    S: DocumentStore,
    N: Notifier,
{
    llm: Arc<L>,
    store: Arc<Mutex<S>>,
    alerts: AlertDispatcher<N>,
    prompt_builder: PromptBuilder,
    assembler: RecordAssembler,
    reports: ReportWriter,
    config: PipelineConfig,
}

impl<L, S, N> TriagePipeline<L, S, N>
where
    L: CompletionModel + Send + Sync + 'static,
    S: DocumentStore + Send + 'static,
    N: Notifier + Send + Sync + 'static,
    L::Error: std::fmt::Display,
    S::Error: std::fmt::Display,
    N::Error: std::fmt::Display,
{
    /// Create a new pipeline
    pub fn new(llm: L, store: S, notifier: N, config: PipelineConfig) -> Result<Self, PipelineError> {
        Self::from_shared(
            Arc::new(llm),
            Arc::new(Mutex::new(store)),
            Arc::new(notifier),
            config,
        )
    }

    /// Create a pipeline over collaborators the caller keeps handles to
    pub fn from_shared(
        llm: Arc<L>,
        store: Arc<Mutex<S>>,
        notifier: Arc<N>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;

        let schema = Schema::new(config.schema);
        let alerts = AlertDispatcher::new(notifier, config.alert_recipient.clone())
            .with_enabled(config.alerts_enabled);

        Ok(Self {
            llm,
            store,
            alerts,
            prompt_builder: PromptBuilder::new(schema),
            assembler: RecordAssembler::new(schema, config.claim_id_policy),
            reports: ReportWriter::new(config.report_dir.clone(), config.report_format),
            config,
        })
    }

    /// The active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Shared handle to the store
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// Extract text from document bytes, then triage it
    pub async fn process_document<E>(
        &self,
        extractor: &E,
        bytes: &[u8],
        supplied_claim_id: Option<String>,
    ) -> Result<TriageOutcome, PipelineError>
    where
        E: TextExtractor,
        E::Error: std::fmt::Display,
    {
        let document_text = extractor
            .extract_text(bytes)
            .map_err(|e| PipelineError::Extraction(e.to_string()))?;

        debug!(
            "Extracted {} chars from {} byte document",
            document_text.len(),
            bytes.len()
        );

        self.process(TriageRequest {
            document_text,
            supplied_claim_id,
        })
        .await
    }

    /// Triage one document
    ///
    /// Fails only when no reply could be obtained from the model. Every later
    /// stage reports its status in the returned outcome.
    pub async fn process(&self, request: TriageRequest) -> Result<TriageOutcome, PipelineError> {
        let start = Instant::now();

        let prompt = self.prompt_builder.build(&request.document_text)?;
        info!(
            "Starting triage: schema {}, document length {}",
            self.config.schema.as_str(),
            request.document_text.len()
        );
        debug!("Prompt length: {} chars", prompt.len());

        let reply = self.call_llm(&prompt).await?;
        debug!("Model reply length: {} chars", reply.len());
        let reply_chars = reply.len();

        let outcome = parse_response(&reply);
        let degraded = outcome.is_degraded();
        if degraded {
            warn!("Model reply degraded to raw output");
        }

        let record = self.assembler.assemble(
            outcome,
            request.supplied_claim_id.as_deref(),
            Utc::now(),
        );

        let persistence = self.persist(&record).await;
        let report = self.write_report(&record).await;
        let alert = self.dispatch_alert(&record).await;

        let metadata = TriageMetadata {
            model_name: self.llm.model_name().to_string(),
            prompt_chars: prompt.len(),
            reply_chars,
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Triage complete for claim {}: priority '{}', degraded {}, stored {}, report {}, alert {:?}",
            record.claim_id,
            record.priority,
            degraded,
            persistence.is_ok(),
            report.is_ok(),
            alert
        );

        Ok(TriageOutcome {
            record,
            degraded,
            persistence,
            report,
            alert,
            metadata,
        })
    }

    /// Upsert the record on the blocking pool; failures are returned, never raised
    async fn persist(&self, record: &ClaimRecord) -> Result<UpsertOutcome, String> {
        let store = Arc::clone(&self.store);
        let owned = record.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut store = store
                .lock()
                .map_err(|e| format!("Store lock error: {}", e))?;
            store
                .upsert(&owned)
                .map_err(|e| format!("Store error: {}", e))
        })
        .await
        .unwrap_or_else(|e| Err(format!("Task join error: {}", e)));

        if let Err(e) = &result {
            warn!("Failed to persist claim {}: {}", record.claim_id, e);
        }
        result
    }

    /// Render and write the report on the blocking pool; failures are returned, never raised
    async fn write_report(&self, record: &ClaimRecord) -> Result<std::path::PathBuf, String> {
        let reports = self.reports.clone();
        let owned = record.clone();

        let result = tokio::task::spawn_blocking(move || {
            reports.write(&owned).map_err(|e| e.to_string())
        })
        .await
        .unwrap_or_else(|e| Err(format!("Task join error: {}", e)));

        if let Err(e) = &result {
            warn!("Failed to write report for claim {}: {}", record.claim_id, e);
        }
        result
    }

    /// Run the alert gate on the blocking pool
    async fn dispatch_alert(&self, record: &ClaimRecord) -> AlertOutcome {
        let dispatcher = self.alerts.clone();
        let record = record.clone();

        tokio::task::spawn_blocking(move || dispatcher.maybe_notify(&record))
            .await
            .unwrap_or_else(|e| AlertOutcome::Failed(format!("Task join error: {}", e)))
    }

    /// Call the model
    async fn call_llm(&self, prompt: &str) -> Result<String, PipelineError> {
        let llm = Arc::clone(&self.llm);
        let prompt = prompt.to_string();

        // Call in a blocking context since CompletionModel is not async
        tokio::task::spawn_blocking(move || {
            llm.complete(&prompt)
                .map_err(|e| PipelineError::Model(e.to_string()))
        })
        .await
        .map_err(|e| PipelineError::Model(format!("Task join error: {}", e)))?
    }
}

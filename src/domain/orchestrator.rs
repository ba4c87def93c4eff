//! Orchestrator - the per-turn state machine.
//!
//! Sequences classification, extraction/merge, resolution, the ambiguity
//! policy and rendering for one turn: Start -> ClassifyIntent -> {Reject,
//! WriteConfig, CreatePath, ModifyPath}; the chart paths continue through
//! ExtractData / MergeWithLast -> ResolveParameters -> AmbiguityPolicy ->
//! {Render, Ask, Fail}. Ask suspends the turn and leaves the accumulated
//! request on the session; every other outcome is terminal for the turn.
//!
//! Every external call runs under a bounded timeout. A classifier failure
//! degrades to the deterministic fallback and a preference-store failure
//! degrades to all-null preferences; neither aborts the turn.

use chrono::Local;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::ports::classifier::{ClassifierError, IntentClassifier};
use crate::ports::extraction::{ExtractionError, InlineExtractor, SpreadsheetExtractor};
use crate::ports::preferences::PreferenceStore;
use crate::ports::renderer::{ChartRenderer, RenderError, RenderJob};

use super::ambiguity::{self, AmbiguityAction};
use super::chart::{ChartRequest, LastChartRecord, ResolvedChartRequest};
use super::compose;
use super::errors::TurnError;
use super::filename;
use super::intent::{Classification, DataOperation, Intent, ModificationDelta};
use super::merge;
use super::preferences::{PreferencePatch, Preferences};
use super::resolver;
use super::routing::{self, CLASSIFIER_WINDOW};
use super::session::{MissingParam, SessionState};

/// Bounded timeouts for the external collaborators.
#[derive(Debug, Clone)]
pub struct Timeouts {
    pub classifier: Duration,
    pub extraction: Duration,
    pub preferences: Duration,
    pub renderer: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            classifier: Duration::from_secs(30),
            extraction: Duration::from_secs(10),
            preferences: Duration::from_secs(5),
            renderer: Duration::from_secs(30),
        }
    }
}

/// One user turn: the text plus any explicit flag values (direct mode).
#[derive(Debug, Clone, Default)]
pub struct TurnInput {
    pub text: String,
    pub overrides: ChartRequest,
}

impl TurnInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            overrides: ChartRequest::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: ChartRequest) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Terminal state of one processed turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminal {
    /// A chart file was produced at this absolute path.
    Rendered { path: PathBuf },
    /// Conversational suspend point: the user was asked for missing items.
    Clarification { missing: Vec<MissingParam> },
    /// The request was out of scope.
    Rejected,
    /// An explicit default preference was written.
    PreferenceSaved,
    /// The turn failed; see the error for the cause.
    Failed(TurnError),
}

/// Result of processing one turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// New session snapshot including both turns of this exchange.
    pub session: SessionState,
    /// The single user-facing reply.
    pub reply: String,
    pub terminal: Terminal,
}

/// Sequences one turn through classification, resolution and rendering.
pub struct Orchestrator {
    classifier: Arc<dyn IntentClassifier>,
    inline: Arc<dyn InlineExtractor>,
    spreadsheet: Arc<dyn SpreadsheetExtractor>,
    preferences: Arc<dyn PreferenceStore>,
    renderer: Arc<dyn ChartRenderer>,
    timeouts: Timeouts,
}

impl Orchestrator {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        inline: Arc<dyn InlineExtractor>,
        spreadsheet: Arc<dyn SpreadsheetExtractor>,
        preferences: Arc<dyn PreferenceStore>,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Self {
        Self {
            classifier,
            inline,
            spreadsheet,
            preferences,
            renderer,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Process one user turn to its terminal state.
    pub async fn run_turn(&self, session: &SessionState, input: TurnInput) -> TurnOutcome {
        let session = session.with_user_turn(input.text.as_str());
        let language = session.language;

        let classification = self.classify(&session).await;
        debug!(intent = ?classification.intent, "routed turn");

        match classification.intent {
            Intent::OffTopic => {
                let reply = compose::rejection(language);
                finishing(session, reply, Terminal::Rejected)
            }
            Intent::SetPreference => self.write_config(session, classification).await,
            Intent::CreateChart => self.create_path(session, classification, &input).await,
            Intent::ModifyChart => self.modify_path(session, classification, &input).await,
        }
    }

    /// ClassifyIntent state: oracle first, deterministic fallback on any
    /// failure.
    async fn classify(&self, session: &SessionState) -> Classification {
        let known = session.pending.clone().unwrap_or_default();
        let window = session.recent_turns(CLASSIFIER_WINDOW);

        let result = match bounded(
            self.timeouts.classifier,
            self.classifier.classify(window, &known),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ClassifierError::Timeout {
                timeout_secs: self.timeouts.classifier.as_secs(),
            }),
        };

        match result {
            Ok(classification) => classification,
            Err(error) => {
                warn!(%error, "classifier failed; using heuristic fallback");
                routing::fallback_classification(session.latest_user_text().unwrap_or_default())
            }
        }
    }

    /// WriteConfig state: terminal, touches only the default slot.
    async fn write_config(
        &self,
        session: SessionState,
        classification: Classification,
    ) -> TurnOutcome {
        let language = session.language;
        let Some(update) = classification.preference else {
            let reply = compose::preference_not_understood(language);
            return finishing(session, reply, Terminal::Rejected);
        };

        let patch = PreferencePatch::from_update(update);
        let write = bounded(self.timeouts.preferences, self.preferences.write(patch)).await;
        match write {
            Ok(Ok(())) => {
                info!(
                    preference = update.target_name(),
                    value = update.value_token(),
                    "default preference saved"
                );
                let reply = compose::preference_saved(language, &update);
                finishing(session, reply, Terminal::PreferenceSaved)
            }
            Ok(Err(error)) => {
                warn!(%error, "preference write failed");
                let reply = compose::preference_save_failed(language);
                finishing(session, reply, Terminal::Rejected)
            }
            Err(_) => {
                warn!("preference write timed out");
                let reply = compose::preference_save_failed(language);
                finishing(session, reply, Terminal::Rejected)
            }
        }
    }

    /// CreatePath: layer the turn over any pending request, extract data,
    /// then resolve.
    async fn create_path(
        &self,
        session: SessionState,
        classification: Classification,
        input: &TurnInput,
    ) -> TurnOutcome {
        let base = session.pending.clone().unwrap_or_default();
        let request = base
            .overlaid_with(&classification.request)
            .overlaid_with(&input.overrides);

        let request = match self.extract_data(&session, request, &classification).await {
            Ok(request) => request,
            Err(error) => {
                let error = TurnError::from(error);
                let reply = compose::turn_failure(session.language, &error);
                return finishing(session, reply, Terminal::Failed(error));
            }
        };

        self.finish(session, request).await
    }

    /// ModifyPath: merge the delta over the last chart; degrade to
    /// CreatePath when there is nothing to modify.
    async fn modify_path(
        &self,
        session: SessionState,
        classification: Classification,
        input: &TurnInput,
    ) -> TurnOutcome {
        let Some(last) = session.last_chart.clone() else {
            debug!("modify requested without a previous chart; treating as create");
            return self.create_path(session, classification, input).await;
        };

        let delta = classification
            .delta
            .clone()
            .unwrap_or_else(|| delta_from_request(&classification));

        let request = merge::merge_with_last(&last, &delta).overlaid_with(&input.overrides);
        self.finish(session, request).await
    }

    /// ExtractData state: classifier-provided points, then a referenced
    /// file, then inline text, in that order.
    async fn extract_data(
        &self,
        session: &SessionState,
        request: ChartRequest,
        classification: &Classification,
    ) -> Result<ChartRequest, ExtractionError> {
        if request.data.is_some() {
            return Ok(request);
        }

        let data = if let Some(path) = &classification.source_file {
            bounded(self.timeouts.extraction, self.spreadsheet.extract(path))
                .await
                .map_err(|_| ExtractionError::BadFormat {
                    resource: path.display().to_string(),
                    detail: "extraction timed out".into(),
                })??
        } else {
            let text = session.latest_user_text().unwrap_or_default();
            bounded(self.timeouts.extraction, self.inline.extract(text))
                .await
                .map_err(|_| ExtractionError::NoInlineData)??
        };

        Ok(request.with_data(data))
    }

    /// ResolveParameters -> AmbiguityPolicy -> {Render, Ask, Fail}.
    async fn finish(&self, session: SessionState, request: ChartRequest) -> TurnOutcome {
        let language = session.language;
        let preferences = self.read_preferences().await;
        let resolution = resolver::resolve(&request, &preferences);

        match ambiguity::decide(session.mode, resolution) {
            AmbiguityAction::Proceed(resolved) => self.render(session, *resolved).await,
            AmbiguityAction::Clarify { missing, pending } => {
                let reply = compose::clarification(language, &missing);
                let session = session.with_pending(pending, missing.clone());
                finishing(session, reply, Terminal::Clarification { missing })
            }
            AmbiguityAction::Fail { missing } => {
                let error = TurnError::AmbiguousParameters { missing };
                let reply = compose::turn_failure(language, &error);
                finishing(session, reply, Terminal::Failed(error))
            }
        }
    }

    /// Render state: produce the file, then record last-chart and last-used.
    async fn render(&self, session: SessionState, resolved: ResolvedChartRequest) -> TurnOutcome {
        let language = session.language;
        let turn_text = session.latest_user_text().unwrap_or_default();
        let filename = filename::resolve_filename(
            resolved.filename.as_deref(),
            turn_text,
            resolved.format,
            Local::now(),
        );
        let job = RenderJob::new(&resolved, filename);

        let rendered = match bounded(self.timeouts.renderer, self.renderer.render(&job)).await {
            Ok(result) => result,
            Err(_) => Err(RenderError::Backend(format!(
                "renderer timed out after {}s",
                self.timeouts.renderer.as_secs()
            ))),
        };

        match rendered {
            Ok(path) => {
                info!(path = %path.display(), "chart rendered");
                self.record_last_used(&resolved).await;
                let record = LastChartRecord::new(&resolved, path.clone());
                let session = session.without_pending().with_last_chart(record);
                let reply = compose::success(language, &path);
                finishing(session, reply, Terminal::Rendered { path })
            }
            Err(error) => {
                let error = TurnError::from(error);
                let reply = compose::turn_failure(language, &error);
                finishing(session, reply, Terminal::Failed(error))
            }
        }
    }

    /// Preferences are read fresh every turn; failure degrades to all-null.
    async fn read_preferences(&self) -> Preferences {
        match bounded(self.timeouts.preferences, self.preferences.read()).await {
            Ok(Ok(preferences)) => preferences,
            Ok(Err(error)) => {
                warn!(%error, "preference read failed; continuing without preferences");
                Preferences::default()
            }
            Err(_) => {
                warn!("preference read timed out; continuing without preferences");
                Preferences::default()
            }
        }
    }

    /// Only a successful render updates the last-used slots.
    async fn record_last_used(&self, resolved: &ResolvedChartRequest) {
        let patch = PreferencePatch::last_used(resolved.style, resolved.format);
        match bounded(self.timeouts.preferences, self.preferences.write(patch)).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => warn!(%error, "failed to record last-used preferences"),
            Err(_) => warn!("recording last-used preferences timed out"),
        }
    }
}

/// Build a modification delta from bare aux fields when the classifier gave
/// no explicit delta.
fn delta_from_request(classification: &Classification) -> ModificationDelta {
    ModificationDelta {
        chart_type: classification.request.chart_type,
        style: classification.request.style,
        format: classification.request.format,
        operation: DataOperation::Keep,
        points: Vec::new(),
    }
}

/// Append the assistant reply and close the turn.
fn finishing(session: SessionState, reply: String, terminal: Terminal) -> TurnOutcome {
    let session = session.with_assistant_turn(reply.as_str());
    TurnOutcome {
        session,
        reply,
        terminal,
    }
}

async fn bounded<F, T>(limit: Duration, call: F) -> Result<T, tokio::time::error::Elapsed>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, call).await
}

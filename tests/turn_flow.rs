//! End-to-end turn flow tests.
//!
//! Drive the orchestrator through whole turns with mock external
//! collaborators: no network, no classifier, no real rendering backend.

use std::path::PathBuf;
use std::sync::Arc;

use chart_agent::adapters::classifier::MockIntentClassifier;
use chart_agent::adapters::extraction::{CsvDataExtractor, InlineDataExtractor};
use chart_agent::adapters::preferences::InMemoryPreferenceStore;
use chart_agent::adapters::render::MockChartRenderer;
use chart_agent::application;
use chart_agent::domain::chart::{
    BrandStyle, ChartRequest, ChartType, DataPoint, OutputFormat,
};
use chart_agent::domain::errors::TurnError;
use chart_agent::domain::intent::{
    Classification, DataOperation, Intent, ModificationDelta, PreferenceUpdate,
};
use chart_agent::domain::orchestrator::{Orchestrator, Terminal, TurnInput};
use chart_agent::domain::preferences::Preferences;
use chart_agent::domain::session::{InteractionMode, MissingParam, SessionState};
use chart_agent::ports::classifier::ClassifierError;
use chart_agent::ports::renderer::RenderError;

struct Harness {
    classifier: MockIntentClassifier,
    preferences: InMemoryPreferenceStore,
    renderer: MockChartRenderer,
    orchestrator: Orchestrator,
}

fn harness(classifier: MockIntentClassifier) -> Harness {
    harness_with(classifier, InMemoryPreferenceStore::new(), MockChartRenderer::new())
}

fn harness_with(
    classifier: MockIntentClassifier,
    preferences: InMemoryPreferenceStore,
    renderer: MockChartRenderer,
) -> Harness {
    let orchestrator = Orchestrator::new(
        Arc::new(classifier.clone()),
        Arc::new(InlineDataExtractor::new()),
        Arc::new(CsvDataExtractor::new()),
        Arc::new(preferences.clone()),
        Arc::new(renderer.clone()),
    );
    Harness {
        classifier,
        preferences,
        renderer,
        orchestrator,
    }
}

fn direct() -> SessionState {
    SessionState::new(InteractionMode::Direct)
}

fn conversational() -> SessionState {
    SessionState::new(InteractionMode::Conversational)
}

/// Scenario A: direct mode with full flags produces a file and exit 0.
#[tokio::test]
async fn scenario_direct_success() {
    // Classifier unreachable; the heuristic fallback carries the turn.
    let h = harness(MockIntentClassifier::new());
    let overrides = ChartRequest::new()
        .with_chart_type(ChartType::Bar)
        .with_style(BrandStyle::Fd)
        .with_format(OutputFormat::Raster);

    let outcome = h
        .orchestrator
        .run_turn(
            &direct(),
            TurnInput::text("A=10, B=20, C=30").with_overrides(overrides),
        )
        .await;

    let Terminal::Rendered { path } = &outcome.terminal else {
        panic!("expected Rendered, got {:?}", outcome.terminal);
    };
    assert!(outcome.reply.contains(&path.display().to_string()));
    assert_eq!(application::exit_code(&outcome.terminal), 0);

    let jobs = h.renderer.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].chart_type, ChartType::Bar);
    assert_eq!(jobs[0].data.len(), 3);
    assert!(jobs[0].filename.ends_with(".png"));
}

/// Scenario B: direct mode without a resolvable type fails fast, names the
/// missing item and its flag, and produces no file.
#[tokio::test]
async fn scenario_direct_missing_type_fails() {
    let h = harness(MockIntentClassifier::new());
    let overrides = ChartRequest::new().with_style(BrandStyle::Fd);

    let outcome = h
        .orchestrator
        .run_turn(
            &direct(),
            TurnInput::text("Mon=10, Tue=15").with_overrides(overrides),
        )
        .await;

    match &outcome.terminal {
        Terminal::Failed(TurnError::AmbiguousParameters { missing }) => {
            assert_eq!(missing, &vec![MissingParam::Type]);
        }
        other => panic!("expected ambiguity failure, got {other:?}"),
    }
    assert!(outcome.reply.contains("chart type"));
    assert!(outcome.reply.contains("--type"));
    assert_ne!(application::exit_code(&outcome.terminal), 0);
    assert!(h.renderer.jobs().is_empty());
}

/// Scenario C: a follow-up style change re-renders without re-asking for
/// anything the user already provided.
#[tokio::test]
async fn scenario_conversational_merge() {
    let classifier = MockIntentClassifier::new()
        .with_classification(
            Classification::of(Intent::CreateChart).with_request(
                ChartRequest::new()
                    .with_chart_type(ChartType::Bar)
                    .with_style(BrandStyle::Fd),
            ),
        )
        .with_classification(Classification::of(Intent::ModifyChart).with_delta(
            ModificationDelta {
                style: Some(BrandStyle::Bnr),
                ..ModificationDelta::default()
            },
        ));
    let h = harness(classifier);

    let first = h
        .orchestrator
        .run_turn(&conversational(), TurnInput::text("chart of A=10, B=20"))
        .await;
    assert!(matches!(first.terminal, Terminal::Rendered { .. }));

    let second = h
        .orchestrator
        .run_turn(&first.session, TurnInput::text("change the style to bnr"))
        .await;
    assert!(matches!(second.terminal, Terminal::Rendered { .. }));

    let jobs = h.renderer.jobs();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[1].style, BrandStyle::Bnr);
    // Everything else carried over from the first chart.
    assert_eq!(jobs[1].chart_type, ChartType::Bar);
    assert_eq!(jobs[1].format, jobs[0].format);
    assert_eq!(jobs[1].data, jobs[0].data);
}

/// Scenario D: a missing spreadsheet surfaces as a readable error naming
/// the resource; no crash, no file.
#[tokio::test]
async fn scenario_missing_spreadsheet() {
    let classifier = MockIntentClassifier::new().with_classification(
        Classification::of(Intent::CreateChart).with_source_file("missing.xlsx"),
    );
    let h = harness(classifier);

    let outcome = h
        .orchestrator
        .run_turn(&direct(), TurnInput::text("chart from missing.xlsx"))
        .await;

    assert!(matches!(
        outcome.terminal,
        Terminal::Failed(TurnError::DataExtraction(_))
    ));
    assert!(outcome.reply.contains("missing.xlsx"));
    assert_ne!(application::exit_code(&outcome.terminal), 0);
    assert!(h.renderer.jobs().is_empty());
}

/// With the classifier forced to fail, data-bearing turns still classify as
/// create via the heuristic.
#[tokio::test]
async fn classifier_unreachable_falls_back_to_heuristic() {
    let classifier =
        MockIntentClassifier::new().with_error(ClassifierError::Transport("down".into()));
    let h = harness(classifier);

    let outcome = h
        .orchestrator
        .run_turn(&conversational(), TurnInput::text("A=10, B=20"))
        .await;

    // The turn went down the create path: categorical labels and no style
    // anywhere leave both required fields open, so it asks.
    match &outcome.terminal {
        Terminal::Clarification { missing } => {
            assert_eq!(missing, &vec![MissingParam::Type, MissingParam::Style]);
        }
        other => panic!("expected Clarification, got {other:?}"),
    }
    let pending = outcome.session.pending.as_ref().expect("pending request");
    assert_eq!(pending.data.as_ref().unwrap().len(), 2);
}

/// Off-topic turns populate nothing and terminate in Reject.
#[tokio::test]
async fn off_topic_rejects_without_populating_request() {
    let classifier =
        MockIntentClassifier::new().with_classification(Classification::of(Intent::OffTopic));
    let h = harness(classifier);

    let outcome = h
        .orchestrator
        .run_turn(&conversational(), TurnInput::text("tell me a joke"))
        .await;

    assert_eq!(outcome.terminal, Terminal::Rejected);
    assert!(outcome.session.pending.is_none());
    assert!(h.renderer.jobs().is_empty());
}

/// A clarification suspends the turn; the next turn only supplies the
/// missing pieces and the accumulated request carries the rest.
#[tokio::test]
async fn ask_then_complete_accumulates_request() {
    let classifier = MockIntentClassifier::new()
        .with_error(ClassifierError::Unavailable("no key".into()))
        .with_classification(
            Classification::of(Intent::CreateChart).with_request(
                ChartRequest::new()
                    .with_chart_type(ChartType::Bar)
                    .with_style(BrandStyle::Fd),
            ),
        );
    let h = harness(classifier);

    let first = h
        .orchestrator
        .run_turn(&conversational(), TurnInput::text("Mon=10, Tue=15"))
        .await;
    assert!(matches!(first.terminal, Terminal::Clarification { .. }));

    let second = h
        .orchestrator
        .run_turn(&first.session, TurnInput::text("bar chart in fd please"))
        .await;

    assert!(matches!(second.terminal, Terminal::Rendered { .. }));
    let jobs = h.renderer.jobs();
    assert_eq!(jobs.len(), 1);
    // Data came from the suspended first turn.
    assert_eq!(jobs[0].data.points()[0], DataPoint::new("Mon", 10.0));
    // The pending request is cleared after the render.
    assert!(second.session.pending.is_none());

    // The classifier saw the accumulated fields on the second call.
    let calls = h.classifier.calls();
    assert!(calls[1].known_fields.data.is_some());
}

/// set_preference then a later create resolves style from the default.
#[tokio::test]
async fn preference_write_feeds_later_resolution() {
    let classifier = MockIntentClassifier::new()
        .with_classification(
            Classification::of(Intent::SetPreference)
                .with_preference(PreferenceUpdate::Style(BrandStyle::Fd)),
        )
        .with_error(ClassifierError::Transport("down".into()));
    let h = harness(classifier);

    let first = h
        .orchestrator
        .run_turn(
            &conversational(),
            TurnInput::text("set my default style to fd"),
        )
        .await;
    assert_eq!(first.terminal, Terminal::PreferenceSaved);
    assert_eq!(h.preferences.snapshot().default_style, Some(BrandStyle::Fd));
    assert_eq!(h.preferences.snapshot().last_used_style, None);

    // Time-indexed labels resolve the type; style comes from the default.
    let second = h
        .orchestrator
        .run_turn(&first.session, TurnInput::text("Jan=1, Feb=2"))
        .await;

    assert!(matches!(second.terminal, Terminal::Rendered { .. }));
    let jobs = h.renderer.jobs();
    assert_eq!(jobs[0].style, BrandStyle::Fd);
    assert_eq!(jobs[0].chart_type, ChartType::Line);
}

/// modify_chart with append extends the data and leaves other fields alone.
#[tokio::test]
async fn modify_append_extends_data() {
    let classifier = MockIntentClassifier::new()
        .with_classification(
            Classification::of(Intent::CreateChart).with_request(
                ChartRequest::new().with_style(BrandStyle::Fd),
            ),
        )
        .with_classification(Classification::of(Intent::ModifyChart).with_delta(
            ModificationDelta {
                operation: DataOperation::Append,
                points: vec![DataPoint::new("Q3", 150.0)],
                ..ModificationDelta::default()
            },
        ));
    let h = harness(classifier);

    let first = h
        .orchestrator
        .run_turn(&conversational(), TurnInput::text("Q1=100, Q2=200"))
        .await;
    assert!(matches!(first.terminal, Terminal::Rendered { .. }));

    let second = h
        .orchestrator
        .run_turn(&first.session, TurnInput::text("add Q3=150"))
        .await;
    assert!(matches!(second.terminal, Terminal::Rendered { .. }));

    let jobs = h.renderer.jobs();
    let labels: Vec<_> = jobs[1].data.labels().map(String::from).collect();
    assert_eq!(labels, vec!["Q1", "Q2", "Q3"]);
    assert_eq!(jobs[1].chart_type, jobs[0].chart_type);
    assert_eq!(jobs[1].style, jobs[0].style);
    assert_eq!(jobs[1].format, jobs[0].format);
}

/// modify without a previous chart degrades to the create path.
#[tokio::test]
async fn modify_without_last_chart_degrades_to_create() {
    let classifier = MockIntentClassifier::new().with_classification(
        Classification::of(Intent::ModifyChart)
            .with_request(ChartRequest::new().with_style(BrandStyle::Bnr))
            .with_delta(ModificationDelta {
                style: Some(BrandStyle::Bnr),
                operation: DataOperation::Replace,
                points: vec![DataPoint::new("Jan", 5.0)],
                ..ModificationDelta::default()
            }),
    );
    let h = harness(classifier);

    let outcome = h
        .orchestrator
        .run_turn(&conversational(), TurnInput::text("change it to Jan=5"))
        .await;

    // No previous chart: never an error. The replace points reach the
    // create path through inline extraction of the turn text.
    assert!(matches!(outcome.terminal, Terminal::Rendered { .. }));
    let jobs = h.renderer.jobs();
    assert_eq!(jobs[0].data.points()[0], DataPoint::new("Jan", 5.0));
}

/// Renderer failure aborts the turn and never claims a path.
#[tokio::test]
async fn render_failure_reports_no_file() {
    let renderer = MockChartRenderer::new().with_error(RenderError::Backend("boom".into()));
    let h = harness_with(
        MockIntentClassifier::new(),
        InMemoryPreferenceStore::new(),
        renderer,
    );
    let overrides = ChartRequest::new()
        .with_chart_type(ChartType::Bar)
        .with_style(BrandStyle::Fd);

    let outcome = h
        .orchestrator
        .run_turn(
            &direct(),
            TurnInput::text("A=1, B=2").with_overrides(overrides),
        )
        .await;

    assert!(matches!(
        outcome.terminal,
        Terminal::Failed(TurnError::Render(_))
    ));
    assert!(outcome.reply.contains("No file was produced"));
    // No last-chart snapshot is recorded for a failed render.
    assert!(outcome.session.last_chart.is_none());
    // Last-used preferences are untouched.
    assert_eq!(h.preferences.snapshot(), Preferences::default());
}

/// A failing preference store degrades to all-null preferences: the format
/// still resolves through the terminal default and nothing crashes.
#[tokio::test]
async fn preference_store_failure_degrades_gracefully() {
    let preferences = InMemoryPreferenceStore::new();
    preferences.fail_reads(true);
    preferences.fail_writes(true);
    let h = harness_with(
        MockIntentClassifier::new(),
        preferences,
        MockChartRenderer::new(),
    );
    let overrides = ChartRequest::new()
        .with_chart_type(ChartType::Bar)
        .with_style(BrandStyle::Fd);

    let outcome = h
        .orchestrator
        .run_turn(
            &direct(),
            TurnInput::text("A=1, B=2").with_overrides(overrides),
        )
        .await;

    // Format fell back to raster; the render still happened.
    assert!(matches!(outcome.terminal, Terminal::Rendered { .. }));
    assert_eq!(h.renderer.jobs()[0].format, OutputFormat::Raster);
}

/// A successful render records the last-used style and format.
#[tokio::test]
async fn render_records_last_used_preferences() {
    let h = harness(MockIntentClassifier::new());
    let overrides = ChartRequest::new()
        .with_chart_type(ChartType::Line)
        .with_style(BrandStyle::Bnr)
        .with_format(OutputFormat::Vector);

    let outcome = h
        .orchestrator
        .run_turn(
            &direct(),
            TurnInput::text("Jan=1, Feb=2").with_overrides(overrides),
        )
        .await;

    assert!(matches!(outcome.terminal, Terminal::Rendered { .. }));
    let stored = h.preferences.snapshot();
    assert_eq!(stored.last_used_style, Some(BrandStyle::Bnr));
    assert_eq!(stored.last_used_format, Some(OutputFormat::Vector));
    assert_eq!(stored.default_style, None);

    // The session carries the snapshot for the next modification turn.
    let last = outcome.session.last_chart.expect("last chart record");
    assert_eq!(last.style, BrandStyle::Bnr);
    assert_eq!(last.filepath, PathBuf::from("/mock/output").join(&h.renderer.jobs()[0].filename));
}

/// Dutch input gets a Dutch reply for that turn only.
#[tokio::test]
async fn replies_mirror_turn_language() {
    let classifier = MockIntentClassifier::new()
        .with_classification(Classification::of(Intent::OffTopic))
        .with_classification(Classification::of(Intent::OffTopic));
    let h = harness(classifier);

    let first = h
        .orchestrator
        .run_turn(
            &conversational(),
            TurnInput::text("vertel mij een grap over de kat en de hond"),
        )
        .await;
    assert!(first.reply.contains("Ik kan alleen grafieken maken"));

    let second = h
        .orchestrator
        .run_turn(&first.session, TurnInput::text("tell me a joke then"))
        .await;
    assert!(second.reply.contains("I can only help you create charts"));
}

/// An explicit "save as" phrase names the output file; the extension always
/// follows the format.
#[tokio::test]
async fn save_as_phrase_names_output_file() {
    let h = harness(MockIntentClassifier::new());
    let overrides = ChartRequest::new()
        .with_chart_type(ChartType::Bar)
        .with_style(BrandStyle::Fd)
        .with_format(OutputFormat::Vector);

    let outcome = h
        .orchestrator
        .run_turn(
            &direct(),
            TurnInput::text("A=1, B=2, save it as revenue.png").with_overrides(overrides),
        )
        .await;

    assert!(matches!(outcome.terminal, Terminal::Rendered { .. }));
    assert_eq!(h.renderer.jobs()[0].filename, "revenue.svg");
}

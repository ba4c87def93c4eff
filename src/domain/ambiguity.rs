//! Ambiguity policy: the single ask-vs-fail decision point.
//!
//! Every cause of unresolved parameters funnels through this one function,
//! parameterised by interaction mode. It is also the only constructor of
//! [`ResolvedChartRequest`], so no route can reach the renderer with
//! unresolved fields.

use super::chart::{ChartRequest, ResolvedChartRequest};
use super::resolver::Resolution;
use super::session::{InteractionMode, MissingParam};

/// The action the orchestrator takes after resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum AmbiguityAction {
    /// All required fields are set; hand the request to the renderer.
    Proceed(Box<ResolvedChartRequest>),
    /// Conversational mode: suspend the turn with one combined question.
    Clarify {
        missing: Vec<MissingParam>,
        pending: ChartRequest,
    },
    /// Direct mode: the turn is fatal; name what was missing.
    Fail { missing: Vec<MissingParam> },
}

/// Decide between render, ask and fail for a resolved request.
///
/// The caller guarantees data is present; missing data is an extraction
/// failure handled before resolution, never an ambiguity.
pub fn decide(mode: InteractionMode, resolution: Resolution) -> AmbiguityAction {
    let Resolution { request, missing } = resolution;

    if missing.is_empty() {
        // Format always resolves (terminal default) and type/style were just
        // checked; data presence is the caller's precondition.
        if let (Some(chart_type), Some(style), Some(format), Some(data)) = (
            request.chart_type,
            request.style,
            request.format,
            request.data.clone(),
        ) {
            return AmbiguityAction::Proceed(Box::new(ResolvedChartRequest {
                chart_type,
                style,
                format,
                filename: request.filename,
                data,
            }));
        }
        // Data absent despite an empty missing list: treat as ambiguity in
        // the caller's favor rather than rendering a partial request.
    }

    match mode {
        InteractionMode::Conversational => AmbiguityAction::Clarify {
            missing,
            pending: request,
        },
        InteractionMode::Direct => AmbiguityAction::Fail { missing },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{BrandStyle, ChartType, DataPoint, DataPoints, OutputFormat};

    fn complete_request() -> ChartRequest {
        ChartRequest::new()
            .with_chart_type(ChartType::Bar)
            .with_style(BrandStyle::Fd)
            .with_format(OutputFormat::Raster)
            .with_data(DataPoints::new(vec![DataPoint::new("A", 1.0)]).unwrap())
    }

    #[test]
    fn test_complete_request_proceeds() {
        let resolution = Resolution {
            request: complete_request(),
            missing: vec![],
        };

        let action = decide(InteractionMode::Direct, resolution);

        match action {
            AmbiguityAction::Proceed(resolved) => {
                assert_eq!(resolved.chart_type, ChartType::Bar);
                assert_eq!(resolved.style, BrandStyle::Fd);
            }
            other => panic!("expected Proceed, got {other:?}"),
        }
    }

    #[test]
    fn test_conversational_missing_clarifies_and_keeps_state() {
        let mut request = complete_request();
        request.style = None;
        let resolution = Resolution {
            request: request.clone(),
            missing: vec![MissingParam::Style],
        };

        let action = decide(InteractionMode::Conversational, resolution);

        match action {
            AmbiguityAction::Clarify { missing, pending } => {
                assert_eq!(missing, vec![MissingParam::Style]);
                // Resolved fields and data survive for the next turn.
                assert_eq!(pending.chart_type, Some(ChartType::Bar));
                assert!(pending.data.is_some());
            }
            other => panic!("expected Clarify, got {other:?}"),
        }
    }

    #[test]
    fn test_direct_missing_fails() {
        let mut request = complete_request();
        request.chart_type = None;
        request.style = None;
        let resolution = Resolution {
            request,
            missing: vec![MissingParam::Type, MissingParam::Style],
        };

        let action = decide(InteractionMode::Direct, resolution);

        assert_eq!(
            action,
            AmbiguityAction::Fail {
                missing: vec![MissingParam::Type, MissingParam::Style]
            }
        );
    }

    #[test]
    fn test_both_missing_produce_one_combined_clarification() {
        let resolution = Resolution {
            request: ChartRequest::new()
                .with_format(OutputFormat::Raster)
                .with_data(DataPoints::new(vec![DataPoint::new("Mon", 1.0)]).unwrap()),
            missing: vec![MissingParam::Type, MissingParam::Style],
        };

        match decide(InteractionMode::Conversational, resolution) {
            AmbiguityAction::Clarify { missing, .. } => {
                assert_eq!(missing.len(), 2);
            }
            other => panic!("expected Clarify, got {other:?}"),
        }
    }
}

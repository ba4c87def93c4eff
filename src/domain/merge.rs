//! Modification merger.
//!
//! Combines the last rendered chart with a partial follow-up delta so the
//! user never restates unchanged fields. The merged request re-enters the
//! resolver and ambiguity policy exactly like a fresh request.

use super::chart::{ChartRequest, DataPoints, LastChartRecord};
use super::intent::{DataOperation, ModificationDelta};

/// Merge a follow-up delta over the last rendered chart.
///
/// Fields fall back to the previous chart when the delta omits them; the
/// data operation decides whether points are kept, replaced or appended.
pub fn merge_with_last(last: &LastChartRecord, delta: &ModificationDelta) -> ChartRequest {
    let data = match delta.operation {
        DataOperation::Keep => Some(last.data.clone()),
        DataOperation::Append => Some(last.data.appended(&delta.points)),
        DataOperation::Replace => {
            DataPoints::new(delta.points.clone()).or_else(|| Some(last.data.clone()))
        }
    };

    ChartRequest {
        chart_type: delta.chart_type.or(Some(last.chart_type)),
        style: delta.style.or(Some(last.style)),
        format: delta.format.or(Some(last.format)),
        filename: None,
        data,
    }
}

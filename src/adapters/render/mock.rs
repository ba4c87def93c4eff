//! Mock chart renderer for testing.
//!
//! Records every job and returns a fabricated absolute path without
//! touching the filesystem; errors can be injected to exercise the
//! render-failure path.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::ports::renderer::{ChartRenderer, RenderError, RenderJob};

/// Mock renderer; succeeds by default.
#[derive(Debug, Clone, Default)]
pub struct MockChartRenderer {
    errors: Arc<Mutex<VecDeque<RenderError>>>,
    jobs: Arc<Mutex<Vec<RenderJob>>>,
}

impl MockChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an error for the next render call.
    pub fn with_error(self, error: RenderError) -> Self {
        self.errors.lock().unwrap().push_back(error);
        self
    }

    /// Jobs observed so far.
    pub fn jobs(&self) -> Vec<RenderJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChartRenderer for MockChartRenderer {
    async fn render(&self, job: &RenderJob) -> Result<PathBuf, RenderError> {
        self.jobs.lock().unwrap().push(job.clone());

        if let Some(error) = self.errors.lock().unwrap().pop_front() {
            return Err(error);
        }

        Ok(PathBuf::from("/mock/output").join(&job.filename))
    }
}

//! Chart renderer adapters.
//!
//! A shared scene builder feeds two backends: SVG (always compiled) for
//! vector output and Cairo (feature `cairo-backend`) for raster output.
//! Builds without the raster backend report raster jobs as a typed render
//! failure instead of producing a file.

#[cfg(feature = "cairo-backend")]
mod cairo;
mod mock;
pub mod scene;
mod svg;

pub use mock::MockChartRenderer;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::chart::OutputFormat;
use crate::ports::renderer::{ChartRenderer, RenderError, RenderJob};

/// Default canvas size, landscape.
pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 600;

/// Renderer that writes chart files into an output directory.
#[derive(Debug, Clone)]
pub struct FileChartRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
}

impl FileChartRenderer {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Absolute form of the output path, resolving relative directories
    /// against the current working directory.
    fn absolute(path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    }
}

#[async_trait]
impl ChartRenderer for FileChartRenderer {
    async fn render(&self, job: &RenderJob) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| RenderError::Io(e.to_string()))?;

        let path = Self::absolute(&self.output_dir.join(&job.filename));
        let scene = scene::build_scene(job, self.width, self.height);
        debug!(path = %path.display(), format = %job.format, "rendering chart");

        match job.format {
            OutputFormat::Vector => {
                let document = svg::write_svg(&scene);
                fs::write(&path, document)
                    .await
                    .map_err(|e| RenderError::Io(e.to_string()))?;
            }
            OutputFormat::Raster => {
                #[cfg(feature = "cairo-backend")]
                cairo::write_png(&scene, &path)?;

                #[cfg(not(feature = "cairo-backend"))]
                return Err(RenderError::UnsupportedFormat {
                    format: "raster",
                    hint: "rebuild with the cairo-backend feature or request vector output",
                });
            }
        }

        Ok(path)
    }
}

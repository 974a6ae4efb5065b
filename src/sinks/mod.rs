use crate::pagination::PageSelection;
use anyhow::Result;
use indicatif::ProgressBar;

mod docx;
pub use docx::*;

/// Turns the selected lines into an output document.
pub trait Render {
    fn render(&self, selection: &PageSelection, progress: &ProgressBar) -> Result<RenderStats>;
}

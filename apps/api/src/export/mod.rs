// PDF export of the rasterised résumé preview: decode → plan pages → write PDF.
// The CPU-bound part runs inside tokio::task::spawn_blocking (see handlers).

pub mod guard;
pub mod handlers;
pub mod pdf;

pub use guard::ExportGuard;

use tracing::debug;

use crate::layout::{plan_pages, ExportStrategy, PageSize};
use pdf::{decode_raster, raster_size, render_pdf, PdfError};

/// Full export pipeline for one uploaded preview image. The page plan is
/// checked against `max_pages` from the image header, before any pixels are
/// decoded.
pub fn export_pdf(
    image_bytes: &[u8],
    strategy: ExportStrategy,
    page: PageSize,
    max_pages: usize,
) -> Result<Vec<u8>, PdfError> {
    let size = raster_size(image_bytes)?;
    let plan = plan_pages(strategy, size, page, max_pages)?;
    debug!(
        "Export plan: {}x{} px raster → {} page(s) ({strategy})",
        size.width_px,
        size.height_px,
        plan.page_count()
    );

    let raster = decode_raster(image_bytes)?;
    render_pdf(&raster, &plan)
}

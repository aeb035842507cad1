// Page geometry and pagination of the rasterised résumé preview.
// Pure math in millimetres; the PDF writer in `export` consumes the plans.

pub mod page;
pub mod pagination;

pub use page::{PageSize, RasterSize};
pub use pagination::{plan_pages, ExportStrategy, PagePlan};

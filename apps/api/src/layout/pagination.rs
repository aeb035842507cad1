//! Placement of a tall rasterised preview onto fixed-size pages.
//!
//! # Strategies
//! - `Paginate`: scale the image to page width and tile it over as many pages
//!   as its height needs. Every page draws the *whole* image, shifted up so the
//!   next unseen slice lines up with the page top; the page box clips the rest.
//! - `FitToPage`: scale the image down uniformly until it fits one page.
//!
//! A document is always laid out with exactly one strategy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::page::{PageSize, RasterSize};

/// Remaining heights at or below this are treated as fully covered, so float
/// noise in `H * page_w / W` cannot spawn an empty trailing page.
const HEIGHT_EPSILON_MM: f64 = 1e-6;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStrategy {
    #[default]
    Paginate,
    FitToPage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown export strategy '{0}' (expected 'paginate' or 'fit_to_page')")]
pub struct UnknownStrategy(pub String);

impl FromStr for ExportStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paginate" => Ok(ExportStrategy::Paginate),
            "fit_to_page" | "fit-to-page" => Ok(ExportStrategy::FitToPage),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for ExportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportStrategy::Paginate => f.write_str("paginate"),
            ExportStrategy::FitToPage => f.write_str("fit_to_page"),
        }
    }
}

/// Where the image is drawn on one page, in millimetres from the page's
/// top-left corner. `y_mm` is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// One placement per page, in page order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePlan {
    pub page: PageSize,
    pub strategy: ExportStrategy,
    pub placements: Vec<ImagePlacement>,
}

impl PagePlan {
    pub fn page_count(&self) -> usize {
        self.placements.len()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaginationError {
    #[error("raster has no area ({width_px}x{height_px} px)")]
    EmptyRaster { width_px: u32, height_px: u32 },

    #[error("page size must be positive and finite ({width_mm} x {height_mm} mm)")]
    InvalidPage { width_mm: f64, height_mm: f64 },

    #[error("preview needs {needed} pages, more than the limit of {max_pages}")]
    TooManyPages { needed: usize, max_pages: usize },
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

fn check_inputs(raster: RasterSize, page: PageSize) -> Result<(), PaginationError> {
    if raster.width_px == 0 || raster.height_px == 0 {
        return Err(PaginationError::EmptyRaster {
            width_px: raster.width_px,
            height_px: raster.height_px,
        });
    }
    if !page.is_usable() {
        return Err(PaginationError::InvalidPage {
            width_mm: page.width_mm,
            height_mm: page.height_mm,
        });
    }
    Ok(())
}

/// Tiles the raster, scaled to page width, over `ceil(img_h / page_h)` pages.
/// Page `k` draws the image at vertical offset `-k * page_h`. Fails before
/// planning the page past `max_pages`; a single page is always allowed.
pub fn paginate(
    raster: RasterSize,
    page: PageSize,
    max_pages: usize,
) -> Result<PagePlan, PaginationError> {
    check_inputs(raster, page)?;

    let img_width = page.width_mm;
    let img_height = f64::from(raster.height_px) * page.width_mm / f64::from(raster.width_px);
    let place = |y_mm| ImagePlacement {
        x_mm: 0.0,
        y_mm,
        width_mm: img_width,
        height_mm: img_height,
    };

    let mut placements = vec![place(0.0)];
    let mut height_left = img_height - page.height_mm;

    while height_left > HEIGHT_EPSILON_MM {
        if placements.len() >= max_pages {
            return Err(PaginationError::TooManyPages {
                needed: (img_height / page.height_mm).ceil() as usize,
                max_pages,
            });
        }
        placements.push(place(height_left - img_height));
        height_left -= page.height_mm;
    }

    Ok(PagePlan {
        page,
        strategy: ExportStrategy::Paginate,
        placements,
    })
}

/// Scales the raster by `min(page_w / W, page_h / H)` onto a single page.
/// The scale factor is in millimetres per pixel.
pub fn fit_to_page(raster: RasterSize, page: PageSize) -> Result<PagePlan, PaginationError> {
    check_inputs(raster, page)?;

    let width_px = f64::from(raster.width_px);
    let height_px = f64::from(raster.height_px);
    let ratio = (page.width_mm / width_px).min(page.height_mm / height_px);

    Ok(PagePlan {
        page,
        strategy: ExportStrategy::FitToPage,
        placements: vec![ImagePlacement {
            x_mm: 0.0,
            y_mm: 0.0,
            width_mm: width_px * ratio,
            height_mm: height_px * ratio,
        }],
    })
}

pub fn plan_pages(
    strategy: ExportStrategy,
    raster: RasterSize,
    page: PageSize,
    max_pages: usize,
) -> Result<PagePlan, PaginationError> {
    match strategy {
        ExportStrategy::Paginate => paginate(raster, page, max_pages),
        ExportStrategy::FitToPage => fit_to_page(raster, page),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

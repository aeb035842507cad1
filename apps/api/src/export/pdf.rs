//! Minimal PDF writer for the rasterised preview.
//!
//! The image is embedded once as an RGB XObject; every page of the plan draws
//! that same XObject at its own offset and lets the MediaBox clip the rest.

use std::io::{Cursor, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;

use crate::layout::page::mm_to_pt;
use crate::layout::pagination::PaginationError;
use crate::layout::{PagePlan, RasterSize};

const IMAGE_NAME: &str = "Im0";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("could not decode preview image: {0}")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    Layout(#[from] PaginationError),

    #[error("compression failed: {0}")]
    Compress(#[from] std::io::Error),

    #[error("PDF serialization failed: {0}")]
    Write(String),

    #[error("page plan has no pages")]
    EmptyPlan,
}

/// A decoded preview: 8-bit RGB samples, row-major, no padding.
#[derive(Debug, Clone)]
pub struct DecodedRaster {
    pub size: RasterSize,
    rgb: Vec<u8>,
}

impl DecodedRaster {
    #[cfg(test)]
    pub fn from_rgb(size: RasterSize, rgb: Vec<u8>) -> Self {
        Self { size, rgb }
    }

    pub fn samples(&self) -> &[u8] {
        &self.rgb
    }
}

/// Reads the pixel dimensions from the image header without decoding pixels.
pub fn raster_size(bytes: &[u8]) -> Result<RasterSize, PdfError> {
    let (width_px, height_px) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?
        .into_dimensions()?;
    Ok(RasterSize {
        width_px,
        height_px,
    })
}

/// Decodes PNG or JPEG bytes. Transparent pixels are composited onto white,
/// matching how the preview looks on paper.
pub fn decode_raster(bytes: &[u8]) -> Result<DecodedRaster, PdfError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width_px, height_px) = rgba.dimensions();

    let mut rgb = Vec::with_capacity(width_px as usize * height_px as usize * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend([over_white(r, a), over_white(g, a), over_white(b, a)]);
    }

    Ok(DecodedRaster {
        size: RasterSize {
            width_px,
            height_px,
        },
        rgb,
    })
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (u16::from(channel), u16::from(alpha));
    ((c * a + 255 * (255 - a)) / 255) as u8
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, PdfError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Content stream that draws the image at one placement. PDF's origin is the
/// bottom-left corner, placements are measured from the top.
fn page_operations(plan: &PagePlan, index: usize) -> Vec<Operation> {
    let placement = plan.placements[index];
    let page_height_pt = plan.page.height_pt();

    let width_pt = mm_to_pt(placement.width_mm) as f32;
    let height_pt = mm_to_pt(placement.height_mm) as f32;
    let x_pt = mm_to_pt(placement.x_mm) as f32;
    let y_pt = (page_height_pt - mm_to_pt(placement.y_mm + placement.height_mm)) as f32;

    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                width_pt.into(),
                0.into(),
                0.into(),
                height_pt.into(),
                x_pt.into(),
                y_pt.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

/// Builds the PDF for `plan`, one page per placement.
pub fn render_pdf(raster: &DecodedRaster, plan: &PagePlan) -> Result<Vec<u8>, PdfError> {
    if plan.placements.is_empty() {
        return Err(PdfError::EmptyPlan);
    }

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(raster.size.width_px),
            "Height" => i64::from(raster.size.height_px),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        deflate(raster.samples())?,
    );
    let image_id = doc.add_object(image);

    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! { IMAGE_NAME => image_id },
    });

    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        (plan.page.width_pt() as f32).into(),
        (plan.page.height_pt() as f32).into(),
    ];

    let mut page_ids = Vec::with_capacity(plan.page_count());
    for index in 0..plan.page_count() {
        let content = Content {
            operations: page_operations(plan, index),
        };
        let encoded = content
            .encode()
            .map_err(|e| PdfError::Write(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            deflate(&encoded)?,
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.clone(),
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| PdfError::Write(e.to_string()))?;
    Ok(out)
}

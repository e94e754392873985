//! First-page rasterization and cropping
//!
//! Uses MuPDF to render the first page at native resolution (72 dpi) and
//! the `image` crate to crop and encode the region of interest.

use std::path::Path;

use image::{DynamicImage, RgbImage};
use mupdf::{Colorspace, Document, Matrix};

use super::types::{CroppedRegion, ExtractError, RoiBounds};

/// Render the first page of `pdf_path`, crop the region of interest and
/// persist it as a PNG inside `output_dir`.
///
/// MuPDF work is CPU-bound, so it runs on the blocking thread pool.
pub async fn extract_region(
    pdf_path: &Path,
    output_dir: &Path,
) -> Result<CroppedRegion, ExtractError> {
    let pdf_path = pdf_path.to_path_buf();
    let output_dir = output_dir.to_path_buf();

    tokio::task::spawn_blocking(move || extract_region_blocking(&pdf_path, &output_dir))
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))?
}

/// Synchronous variant of [`extract_region`]
pub fn extract_region_blocking(
    pdf_path: &Path,
    output_dir: &Path,
) -> Result<CroppedRegion, ExtractError> {
    let page = render_first_page(pdf_path)?;
    let region = crop_region(&page);

    tracing::debug!(
        page_width = page.width(),
        page_height = page.height(),
        region_width = region.width(),
        region_height = region.height(),
        "Cropped region of interest"
    );

    save_png(&region, output_dir)
}

/// Render page 0 to an RGB image at scale 1.0
pub fn render_first_page(pdf_path: &Path) -> Result<DynamicImage, ExtractError> {
    let path_str = pdf_path.to_string_lossy();
    let doc = Document::open(&*path_str).map_err(|e| ExtractError::Open(e.to_string()))?;

    let page_count = doc
        .page_count()
        .map_err(|e| ExtractError::Open(e.to_string()))?;
    if page_count < 1 {
        return Err(ExtractError::NoPages);
    }

    let page = doc
        .load_page(0)
        .map_err(|e| ExtractError::Render(e.to_string()))?;

    let matrix = Matrix::new_scale(1.0, 1.0);
    let colorspace = Colorspace::device_rgb();
    let pixmap = page
        .to_pixmap(&matrix, &colorspace, false, true)
        .map_err(|e| ExtractError::Render(e.to_string()))?;

    pixmap_to_image(&pixmap)
}

/// Crop the region of interest out of a rendered page
pub fn crop_region(page: &DynamicImage) -> DynamicImage {
    let rect = RoiBounds::FIRST_PAGE_HEADER.to_pixels(page.width(), page.height());
    page.crop_imm(rect.x, rect.y, rect.width, rect.height)
}

fn pixmap_to_image(pixmap: &mupdf::Pixmap) -> Result<DynamicImage, ExtractError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    if n < 3 {
        return Err(ExtractError::Image(format!(
            "unexpected pixmap component count {}",
            n
        )));
    }

    let mut rgb_buffer = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let pixel = samples
                .get(offset..offset + 3)
                .ok_or_else(|| ExtractError::Image("pixmap buffer too short".to_string()))?;
            rgb_buffer.extend_from_slice(pixel);
        }
    }

    let img = RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| ExtractError::Image("Failed to create image buffer".to_string()))?;

    Ok(DynamicImage::ImageRgb8(img))
}

fn save_png(region: &DynamicImage, output_dir: &Path) -> Result<CroppedRegion, ExtractError> {
    let mut file = tempfile::Builder::new()
        .prefix("roi-")
        .suffix(".png")
        .tempfile_in(output_dir)?;

    region
        .write_to(&mut file, image::ImageFormat::Png)
        .map_err(|e| ExtractError::Image(e.to_string()))?;

    Ok(CroppedRegion::new(
        file.into_temp_path(),
        region.width(),
        region.height(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::minimal_pdf;
    use image::Rgb;

    #[test]
    fn test_crop_region_picks_top_right_area() {
        let mut page = RgbImage::from_pixel(100, 200, Rgb([255, 255, 255]));
        // Marker inside the region: x in [80,100), y in [18,60)
        page.put_pixel(80, 18, Rgb([255, 0, 0]));
        page.put_pixel(99, 59, Rgb([0, 0, 255]));
        // Just outside the region
        page.put_pixel(79, 30, Rgb([0, 255, 0]));

        let region = crop_region(&DynamicImage::ImageRgb8(page)).to_rgb8();

        assert_eq!(region.dimensions(), (20, 42));
        assert_eq!(region.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(region.get_pixel(19, 41), &Rgb([0, 0, 255]));
        assert!(region.pixels().all(|p| p != &Rgb([0, 255, 0])));
    }

    #[test]
    fn test_extract_region_from_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("letter.pdf");
        std::fs::write(&pdf_path, minimal_pdf(612, 792, 1)).unwrap();

        let region = extract_region_blocking(&pdf_path, dir.path()).unwrap();

        assert_eq!((region.width, region.height), (123, 166));
        assert!(region.path().starts_with(dir.path()));
        let decoded = image::open(region.path()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (123, 166));
    }

    #[test]
    fn test_region_artifact_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("doc.pdf");
        std::fs::write(&pdf_path, minimal_pdf(200, 100, 1)).unwrap();

        let region = extract_region_blocking(&pdf_path, dir.path()).unwrap();
        let artifact = region.path().to_path_buf();
        assert!(artifact.exists());

        drop(region);
        assert!(!artifact.exists());
    }

    #[test]
    fn test_zero_page_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("empty.pdf");
        std::fs::write(&pdf_path, minimal_pdf(612, 792, 0)).unwrap();

        let result = extract_region_blocking(&pdf_path, dir.path());
        assert!(matches!(
            result,
            Err(ExtractError::NoPages) | Err(ExtractError::Open(_))
        ));
    }

    #[test]
    fn test_garbage_input_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("notes.pdf");
        std::fs::write(&pdf_path, b"this is not a pdf").unwrap();

        let result = extract_region_blocking(&pdf_path, dir.path());
        assert!(result.is_err());
        // No artifact is left behind
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "png").unwrap_or(false))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_extract_region_async_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_region(&dir.path().join("missing.pdf"), dir.path()).await;
        assert!(matches!(result, Err(ExtractError::Open(_))));
    }
}

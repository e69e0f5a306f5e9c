//! Single-page PDF packaging of a snapshot.

use std::io::Cursor;

use chrono::{Datelike, Timelike};
use image::ImageFormat;
use image::io::Reader as ImageReader;
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, TextStr};
use tracing::debug;

use super::geometry::{PageGeometry, PlacedImage};
use crate::capture::Snapshot;
use crate::error::{ExportError, ExportResult};

/// Resource name of the embedded snapshot
const IMAGE_NAME: Name<'static> = Name(b"Im1");

/// Producer string written to the document info dictionary
const PRODUCER: &str = concat!("resume-export ", env!("CARGO_PKG_VERSION"));

/// A finished PDF held in memory
#[derive(Debug, Clone)]
pub struct PdfDocument {
    bytes: Vec<u8>,
    geometry: PageGeometry,
    placement: PlacedImage,
}

impl PdfDocument {
    /// Raw PDF bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the document, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Page geometry the document was built for
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Where the snapshot sits on the page
    pub fn placement(&self) -> &PlacedImage {
        &self.placement
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document has no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Embed `snapshot` as the only image on a single page of a new PDF
///
/// The output depends only on the inputs.
pub fn package(snapshot: &Snapshot, geometry: &PageGeometry) -> ExportResult<PdfDocument> {
    if snapshot.pixel_width == 0 || snapshot.pixel_height == 0 {
        return Err(ExportError::Encoding(format!(
            "snapshot has zero dimensions ({}x{})",
            snapshot.pixel_width, snapshot.pixel_height
        )));
    }
    verify_jpeg(snapshot)?;

    let placement = PlacedImage::fit(geometry, snapshot.pixel_width, snapshot.pixel_height)?;
    let pixel_width = to_pdf_int(snapshot.pixel_width)?;
    let pixel_height = to_pdf_int(snapshot.pixel_height)?;

    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let page_id = Ref::new(3);
    let content_id = Ref::new(4);
    let image_id = Ref::new(5);
    let info_id = Ref::new(6);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id).kids([page_id]).count(1);

    {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(
            0.0,
            0.0,
            geometry.width_pts as f32,
            geometry.height_pts as f32,
        ))
        .parent(pages_id)
        .contents(content_id);
        page.resources().x_objects().pair(IMAGE_NAME, image_id);
    }

    {
        let mut image = pdf.image_xobject(image_id, &snapshot.image_data);
        image.filter(Filter::DctDecode);
        image.width(pixel_width);
        image.height(pixel_height);
        image.color_space().device_rgb();
        image.bits_per_component(8);
    }

    let mut content = Content::new();
    content.save_state();
    content.transform([
        placement.rendered_width as f32,
        0.0,
        0.0,
        placement.rendered_height as f32,
        placement.x as f32,
        placement.pdf_bottom(geometry) as f32,
    ]);
    content.x_object(IMAGE_NAME);
    content.restore_state();
    let raw = content.finish();
    pdf.stream(content_id, raw.as_slice());

    let captured = snapshot.captured_at;
    pdf.document_info(info_id)
        .title(TextStr(&snapshot.source))
        .producer(TextStr(PRODUCER))
        .creation_date(
            Date::new(u16::try_from(captured.year()).unwrap_or(0))
                .month(captured.month() as u8)
                .day(captured.day() as u8)
                .hour(captured.hour() as u8)
                .minute(captured.minute() as u8)
                .second(captured.second() as u8),
        );

    let bytes = pdf.finish();
    debug!(
        bytes = bytes.len(),
        x = placement.x,
        width = placement.rendered_width,
        height = placement.rendered_height,
        "packaged snapshot"
    );

    Ok(PdfDocument {
        bytes,
        geometry: *geometry,
        placement,
    })
}

/// Check that the buffer is a JPEG whose header matches the snapshot size
fn verify_jpeg(snapshot: &Snapshot) -> ExportResult<()> {
    let (width, height) = ImageReader::with_format(Cursor::new(&snapshot.image_data), ImageFormat::Jpeg)
        .into_dimensions()
        .map_err(|e| ExportError::Encoding(format!("snapshot is not a readable JPEG: {}", e)))?;

    if (width, height) != (snapshot.pixel_width, snapshot.pixel_height) {
        return Err(ExportError::Encoding(format!(
            "snapshot reports {}x{} but its JPEG is {}x{}",
            snapshot.pixel_width, snapshot.pixel_height, width, height
        )));
    }
    Ok(())
}

fn to_pdf_int(value: u32) -> ExportResult<i32> {
    i32::try_from(value)
        .map_err(|_| ExportError::Encoding(format!("dimension {} is too large for PDF", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::encode_jpeg;
    use image::{Rgb, RgbImage};

    fn jpeg_snapshot(width: u32, height: u32) -> Snapshot {
        let img = RgbImage::from_pixel(width, height, Rgb([220, 220, 220]));
        Snapshot::new(width, height, encode_jpeg(&img, 100).unwrap(), "resume-preview")
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_package_writes_single_page_pdf() {
        let snapshot = jpeg_snapshot(40, 56);
        let doc = package(&snapshot, &PageGeometry::a4_portrait()).unwrap();
        let bytes = doc.as_bytes();

        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(bytes, b"/MediaBox [0 0 595 842]"));
        assert!(contains(bytes, b"/Count 1"));
        assert!(contains(bytes, b"/DCTDecode"));
        assert!(contains(bytes, b"/Im1 Do"));
        assert!(contains(bytes, &snapshot.image_data));
    }

    #[test]
    fn test_package_is_deterministic() {
        let snapshot = jpeg_snapshot(30, 30);
        let geometry = PageGeometry::a4_portrait();

        let first = package(&snapshot, &geometry).unwrap();
        let second = package(&snapshot, &geometry).unwrap();
        assert_eq!(first.placement(), second.placement());
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_package_rejects_zero_width() {
        let mut snapshot = jpeg_snapshot(10, 10);
        snapshot.pixel_width = 0;

        let err = package(&snapshot, &PageGeometry::a4_portrait()).unwrap_err();
        assert!(matches!(err, ExportError::Encoding(msg) if msg.contains("zero")));
    }

    #[test]
    fn test_package_rejects_corrupt_buffer() {
        let snapshot = Snapshot::new(10, 10, b"not a jpeg".to_vec(), "bad");
        let err = package(&snapshot, &PageGeometry::a4_portrait()).unwrap_err();
        assert!(matches!(err, ExportError::Encoding(_)));
    }

    #[test]
    fn test_package_rejects_mismatched_dimensions() {
        let mut snapshot = jpeg_snapshot(10, 10);
        snapshot.pixel_height = 20;

        let err = package(&snapshot, &PageGeometry::a4_portrait()).unwrap_err();
        assert!(matches!(err, ExportError::Encoding(msg) if msg.contains("10x10")));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — emit a minimal one-page PDF that paints a single JPEG image.
//
// The document is a fixed sequence of five indirect objects (catalog, page
// tree, page, image XObject, content stream) followed by a cross-reference
// section and trailer. All structural text is ASCII; the image payload is
// copied into the stream verbatim.

use std::io::{self, Write};

use pagefit_core::error::{PagefitError, Result};
use pagefit_core::types::{ImageFilter, PageSpec, XrefMode};
use tracing::{debug, instrument};

use crate::image::EncodedImage;
use crate::layout::ImageGeometry;

/// Resource name the page uses for the image XObject.
const IMAGE_NAME: &str = "Im0";

/// Indirect objects 1..=5. The trailer's `/Size` adds the free-list head.
const OBJECT_COUNT: usize = 5;

/// JPEG start-of-image marker.
const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// Writes single-image PDF documents for one target page.
#[derive(Debug, Clone, Copy)]
pub struct PdfWriter {
    page: PageSpec,
    xref: XrefMode,
}

impl PdfWriter {
    /// Create a writer for the given page with an indexed cross-reference table.
    pub fn new(page: PageSpec) -> Self {
        Self {
            page,
            xref: XrefMode::Indexed,
        }
    }

    /// Create a writer targeting A4 at 150 dpi.
    pub fn a4() -> Self {
        Self::new(PageSpec::a4())
    }

    /// Choose how the cross-reference section is written.
    pub fn with_xref_mode(mut self, xref: XrefMode) -> Self {
        self.xref = xref;
        self
    }

    pub fn page(&self) -> &PageSpec {
        &self.page
    }

    pub fn xref_mode(&self) -> XrefMode {
        self.xref
    }

    /// Write the complete document to `sink` and return the number of bytes
    /// written.
    ///
    /// The image is checked before the first byte goes out. A sink failure
    /// part-way through leaves a truncated document behind; discarding it is
    /// the caller's job. The sink is flushed on success and dropped on every
    /// return path.
    #[instrument(skip_all, fields(xref = ?self.xref, image_bytes = image.len()))]
    pub fn write_document<W: Write>(
        &self,
        sink: W,
        geometry: &ImageGeometry,
        image: &EncodedImage,
    ) -> Result<u64> {
        check_image(&self.page, geometry, image)?;

        let mut out = CountingWriter::new(sink);
        self.emit(&mut out, geometry, image)
            .map_err(PagefitError::SinkWrite)?;

        debug!(bytes = out.written, "PDF document written");
        Ok(out.written)
    }

    /// Build the document in memory.
    pub fn to_bytes(&self, geometry: &ImageGeometry, image: &EncodedImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(image.len() + 1024);
        self.write_document(&mut buffer, geometry, image)?;
        Ok(buffer)
    }

    fn emit<W: Write>(
        &self,
        out: &mut CountingWriter<W>,
        geometry: &ImageGeometry,
        image: &EncodedImage,
    ) -> io::Result<()> {
        let mut offsets = [0u64; OBJECT_COUNT];

        out.write_all(b"%PDF-1.4\n")?;

        offsets[0] = out.written;
        out.write_all(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n")?;

        offsets[1] = out.written;
        out.write_all(b"2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n")?;

        offsets[2] = out.written;
        write!(
            out,
            "3 0 obj << /Type /Page /Parent 2 0 R /Resources << /XObject <</{IMAGE_NAME} 4 0 R>> >> \
             /MediaBox [0 0 {:.2} {:.2}] /Contents 5 0 R >> endobj\n",
            self.page.width_pt(),
            self.page.height_pt(),
        )?;

        offsets[3] = out.written;
        write!(
            out,
            "4 0 obj << /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /{} \
             /BitsPerComponent {} /Filter /{} /Length {} >> stream\n",
            image.width(),
            image.height(),
            image.color_model().pdf_color_space(),
            image.color_model().bits_per_component(),
            image.filter().pdf_name(),
            image.len(),
        )?;
        out.write_all(image.data())?;
        out.write_all(b"\nendstream\nendobj\n")?;

        offsets[4] = out.written;
        let content = content_stream(geometry);
        write!(
            out,
            "5 0 obj << /Length {} >> stream\n{content}\nendstream\nendobj\n",
            content.len()
        )?;

        let xref_offset = out.written;
        match self.xref {
            XrefMode::Indexed => {
                write!(out, "xref\n0 {}\n0000000000 65535 f \n", OBJECT_COUNT + 1)?;
                for offset in offsets {
                    write!(out, "{offset:010} 00000 n \n")?;
                }
                write!(
                    out,
                    "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
                    OBJECT_COUNT + 1
                )?;
            }
            XrefMode::Minimal => {
                write!(
                    out,
                    "xref\n0 {size}\n0000000000 65535 f \n\
                     trailer << /Size {size} /Root 1 0 R >>\nstartxref\n0\n%%EOF",
                    size = OBJECT_COUNT + 1
                )?;
            }
        }

        out.flush()
    }
}

/// Write a document for `page` to `sink` with an indexed cross-reference
/// table. See [`PdfWriter::write_document`].
pub fn write_document<W: Write>(
    sink: W,
    page: &PageSpec,
    geometry: &ImageGeometry,
    image: &EncodedImage,
) -> Result<u64> {
    PdfWriter::new(*page).write_document(sink, geometry, image)
}

/// The page's drawing program: map the unit square onto the placement
/// rectangle and paint the image there.
pub fn content_stream(geometry: &ImageGeometry) -> String {
    format!(
        "q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm /{IMAGE_NAME} Do\nQ\n",
        geometry.placement_width_pt,
        geometry.placement_height_pt,
        geometry.offset_x_pt,
        geometry.offset_y_pt,
    )
}

/// Reject images whose stream would not match its dictionary, and
/// placements computed for a different page than the one being written.
fn check_image(page: &PageSpec, geometry: &ImageGeometry, image: &EncodedImage) -> Result<()> {
    if (geometry.page_width_pt, geometry.page_height_pt) != (page.width_pt(), page.height_pt()) {
        return Err(PagefitError::EncodingError(format!(
            "placement was computed for a {}x{} pt page but the page is {}x{} pt",
            geometry.page_width_pt,
            geometry.page_height_pt,
            page.width_pt(),
            page.height_pt()
        )));
    }
    if image.declared_len() != image.len() {
        return Err(PagefitError::EncodingError(format!(
            "image declares {} bytes but carries {}",
            image.declared_len(),
            image.len()
        )));
    }
    if image.is_empty() {
        return Err(PagefitError::EncodingError("image payload is empty".into()));
    }
    if (image.width(), image.height()) != (geometry.scaled_width, geometry.scaled_height) {
        return Err(PagefitError::EncodingError(format!(
            "image is {}x{} px but the layout expects {}x{} px",
            image.width(),
            image.height(),
            geometry.scaled_width,
            geometry.scaled_height
        )));
    }
    match image.filter() {
        ImageFilter::Dct if !image.data().starts_with(&JPEG_SOI) => Err(
            PagefitError::EncodingError("payload tagged DCTDecode is not a JPEG stream".into()),
        ),
        ImageFilter::Dct => Ok(()),
    }
}

/// Tracks how many bytes have reached the sink so object offsets can be
/// recorded for the cross-reference table.
struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_geometry;
    use pagefit_core::types::ColorModel;

    /// A payload that looks like a JPEG to the SOI check and contains bytes
    /// that would break a text-mode writer.
    fn fake_jpeg() -> Vec<u8> {
        let mut data = JPEG_SOI.to_vec();
        data.extend_from_slice(b"\x00\r\nendstream\n\x80\xfe");
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    /// 200x100 pt page at 72 dpi with a 40x20 source: scales by exactly 5.
    fn fixture() -> (PdfWriter, ImageGeometry, EncodedImage) {
        let page = PageSpec::new(200.0, 100.0, 72.0).unwrap();
        let geometry = compute_geometry(&page, 40, 20).unwrap();
        let image = EncodedImage::new(fake_jpeg(), 200, 100, ColorModel::Rgb8, ImageFilter::Dct);
        (PdfWriter::new(page), geometry, image)
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    /// Parse the integer that follows `key` at or after `from`.
    fn number_after(haystack: &[u8], from: usize, key: &[u8]) -> (u64, usize) {
        let start = from + find(&haystack[from..], key).expect("key present") + key.len();
        let digits: Vec<u8> = haystack[start..]
            .iter()
            .copied()
            .take_while(u8::is_ascii_digit)
            .collect();
        let value = std::str::from_utf8(&digits).unwrap().parse().unwrap();
        (value, start + digits.len())
    }

    /// A sink that accepts `capacity` bytes and then fails like a full disk.
    struct FullDisk {
        accepted: Vec<u8>,
        capacity: usize,
    }

    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.capacity - self.accepted.len();
            if room == 0 {
                return Err(io::Error::other("no space left on device"));
            }
            let n = room.min(buf.len());
            self.accepted.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn structural_objects_are_written_in_order() {
        let (writer, geometry, image) = fixture();
        let pdf = writer.to_bytes(&geometry, &image).unwrap();

        let expected_head = "%PDF-1.4\n\
            1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n\
            2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n\
            3 0 obj << /Type /Page /Parent 2 0 R /Resources << /XObject <</Im0 4 0 R>> >> \
            /MediaBox [0 0 200.00 100.00] /Contents 5 0 R >> endobj\n\
            4 0 obj << /Type /XObject /Subtype /Image /Width 200 /Height 100 /ColorSpace /DeviceRGB \
            /BitsPerComponent 8 /Filter /DCTDecode /Length 19 >> stream\n";
        assert!(pdf.starts_with(expected_head.as_bytes()));
    }

    #[test]
    fn image_length_matches_embedded_payload() {
        let (writer, geometry, image) = fixture();
        let pdf = writer.to_bytes(&geometry, &image).unwrap();

        let obj4 = find(&pdf, b"4 0 obj").unwrap();
        let (length, after) = number_after(&pdf, obj4, b"/Length ");
        let body = after + b" >> stream\n".len();
        let end = body + length as usize;

        assert_eq!(length as usize, image.len());
        assert_eq!(&pdf[body..end], image.data());
        assert!(pdf[end..].starts_with(b"\nendstream\nendobj\n"));
    }

    #[test]
    fn content_stream_length_matches_program() {
        let (writer, geometry, image) = fixture();
        let pdf = writer.to_bytes(&geometry, &image).unwrap();
        let program = "q\n200.00 0 0 100.00 0.00 0.00 cm /Im0 Do\nQ\n";

        assert_eq!(content_stream(&geometry), program);
        let obj5 = find(&pdf, b"5 0 obj").unwrap();
        let (length, after) = number_after(&pdf, obj5, b"/Length ");
        let body = after + b" >> stream\n".len();

        assert_eq!(length as usize, program.len());
        assert_eq!(&pdf[body..body + program.len()], program.as_bytes());
        assert!(pdf[body + program.len()..].starts_with(b"\nendstream\nendobj\n"));
    }

    #[test]
    fn centred_placement_in_content_stream() {
        let page = PageSpec::new(600.0, 800.0, 72.0).unwrap();
        let geometry = compute_geometry(&page, 300, 300).unwrap();
        assert_eq!(
            content_stream(&geometry),
            "q\n600.00 0 0 600.00 0.00 100.00 cm /Im0 Do\nQ\n"
        );
    }

    #[test]
    fn identical_inputs_give_identical_bytes() {
        let (writer, geometry, image) = fixture();
        let mut first = Vec::new();
        let mut second = Vec::new();
        let n1 = writer.write_document(&mut first, &geometry, &image).unwrap();
        let n2 = writer.write_document(&mut second, &geometry, &image).unwrap();

        assert_eq!(first, second);
        assert_eq!(n1, n2);
        assert_eq!(n1 as usize, first.len());
    }

    #[test]
    fn indexed_xref_points_at_each_object() {
        let (writer, geometry, image) = fixture();
        let pdf = writer.to_bytes(&geometry, &image).unwrap();

        let xref = find(&pdf, b"xref\n0 6\n").unwrap();
        let (startxref, _) = number_after(&pdf, xref, b"startxref\n");
        assert_eq!(startxref as usize, xref);

        let entries = xref + b"xref\n0 6\n".len();
        assert_eq!(&pdf[entries..entries + 20], b"0000000000 65535 f \n");
        for object in 1..=5usize {
            let entry = &pdf[entries + object * 20..entries + (object + 1) * 20];
            assert!(entry.ends_with(b" 00000 n \n"));
            let offset: usize = std::str::from_utf8(&entry[..10]).unwrap().parse().unwrap();
            assert!(pdf[offset..].starts_with(format!("{object} 0 obj").as_bytes()));
        }
        assert!(find(&pdf, b"trailer\n<< /Size 6 /Root 1 0 R >>\n").is_some());
        assert!(pdf.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn minimal_xref_keeps_legacy_trailer() {
        let (writer, geometry, image) = fixture();
        let pdf = writer
            .with_xref_mode(XrefMode::Minimal)
            .to_bytes(&geometry, &image)
            .unwrap();

        let tail = b"endstream\nendobj\nxref\n0 6\n0000000000 65535 f \n\
            trailer << /Size 6 /Root 1 0 R >>\nstartxref\n0\n%%EOF";
        assert!(pdf.ends_with(tail));
    }

    #[test]
    fn gray_image_declares_device_gray() {
        let (writer, geometry, _) = fixture();
        let image = EncodedImage::new(fake_jpeg(), 200, 100, ColorModel::Gray8, ImageFilter::Dct);
        let pdf = writer.to_bytes(&geometry, &image).unwrap();
        assert!(find(&pdf, b"/ColorSpace /DeviceGray").is_some());
        assert!(find(&pdf, b"/DeviceRGB").is_none());
    }

    #[test]
    fn sink_failure_after_catalog_is_reported() {
        let (writer, geometry, image) = fixture();
        let capacity = "%PDF-1.4\n1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n".len();
        let mut sink = FullDisk {
            accepted: Vec::new(),
            capacity,
        };

        let result = writer.write_document(&mut sink, &geometry, &image);
        match result {
            Err(PagefitError::SinkWrite(err)) => {
                assert_eq!(err.to_string(), "no space left on device");
            }
            Err(other) => panic!("unexpected error variant: {other}"),
            Ok(n) => panic!("write reported success after {n} bytes"),
        }
        // What reached the sink is a fragment, not a document.
        assert_eq!(sink.accepted.len(), capacity);
        assert!(find(&sink.accepted, b"%%EOF").is_none());
    }

    #[test]
    fn declared_length_mismatch_writes_nothing() {
        let (writer, geometry, image) = fixture();
        let image = image.with_declared_len(999);
        let mut sink = Vec::new();

        assert!(matches!(
            writer.write_document(&mut sink, &geometry, &image),
            Err(PagefitError::EncodingError(_))
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let (writer, geometry, _) = fixture();
        let image = EncodedImage::new(fake_jpeg(), 199, 100, ColorModel::Rgb8, ImageFilter::Dct);
        assert!(matches!(
            writer.to_bytes(&geometry, &image),
            Err(PagefitError::EncodingError(_))
        ));
    }

    #[test]
    fn non_jpeg_payload_is_rejected() {
        let (writer, geometry, _) = fixture();
        let image = EncodedImage::new(
            b"\x89PNG\r\n".to_vec(),
            200,
            100,
            ColorModel::Rgb8,
            ImageFilter::Dct,
        );
        assert!(matches!(
            writer.to_bytes(&geometry, &image),
            Err(PagefitError::EncodingError(_))
        ));
    }

    #[test]
    fn geometry_for_another_page_is_rejected() {
        let geometry = compute_geometry(&PageSpec::a4(), 40, 20).unwrap();
        let image = EncodedImage::new(
            fake_jpeg(),
            geometry.scaled_width,
            geometry.scaled_height,
            ColorModel::Rgb8,
            ImageFilter::Dct,
        );
        let letter = PageSpec::new(612.0, 792.0, 150.0).unwrap();
        let mut sink = Vec::new();

        assert!(matches!(
            PdfWriter::new(letter).write_document(&mut sink, &geometry, &image),
            Err(PagefitError::EncodingError(_))
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn free_function_matches_writer() {
        let (writer, geometry, image) = fixture();
        let mut sink = Vec::new();
        write_document(&mut sink, writer.page(), &geometry, &image).unwrap();
        assert_eq!(sink, writer.to_bytes(&geometry, &image).unwrap());
    }
}

//! Minimal EXIF parser for JPEG files.
//!
//! Extracts the six capture tags the lightbox displays:
//! - Make (IFD0 271) and Model (IFD0 272)
//! - ExposureTime (Exif 33434) and FNumber (Exif 33437)
//! - ISOSpeedRatings (Exif 34855)
//! - FocalLength (Exif 37386)
//!
//! Reads the APP1 segment (`Exif\0\0` header) and walks the embedded TIFF
//! structure: IFD0 for the camera strings, then the Exif sub-IFD (pointed to
//! by tag 34665) for the exposure values.
//!
//! Zero external dependencies — pure Rust. Any malformed input yields an
//! empty [`ExifCapture`], never an error: missing metadata is a normal state
//! for scans and exports.

use std::path::Path;

/// Raw capture tag values extracted from an image file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifCapture {
    pub make: Option<String>,
    pub model: Option<String>,
    /// Aperture as a plain f-number (e.g. 1.8).
    pub f_number: Option<f64>,
    /// Exposure time in seconds (e.g. 0.004 for 1/250).
    pub exposure_time: Option<f64>,
    pub iso: Option<u32>,
    /// Focal length in millimetres.
    pub focal_length: Option<f64>,
}

impl ExifCapture {
    /// True when none of the six tags were present.
    pub fn is_empty(&self) -> bool {
        self.make.is_none()
            && self.model.is_none()
            && self.f_number.is_none()
            && self.exposure_time.is_none()
            && self.iso.is_none()
            && self.focal_length.is_none()
    }
}

/// Read capture metadata from a file, dispatching by extension.
/// Returns empty metadata on any read or parse failure.
pub fn read_exif(path: &Path) -> ExifCapture {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !matches!(ext.as_str(), "jpg" | "jpeg") {
        return ExifCapture::default();
    }

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(_) => return ExifCapture::default(),
    };

    read_exif_from_jpeg(&bytes)
}

// ---------------------------------------------------------------------------
// JPEG segment walking
// ---------------------------------------------------------------------------

const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Walk the APPn segments of a JPEG, yielding `(marker, byte_range)` pairs.
///
/// The range covers the whole segment including its `FF En` marker and
/// length field, so callers can splice segments verbatim. Scanning stops at
/// SOS — entropy-coded data follows and contains no further segments.
pub(crate) fn app_segments(data: &[u8]) -> Vec<(u8, std::ops::Range<usize>)> {
    let mut segments = Vec::new();
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return segments;
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            break;
        }
        let marker = data[pos + 1];
        // SOS: image data starts
        if marker == 0xDA {
            break;
        }
        // Standalone markers carry no length field
        if marker == 0xD8 || marker == 0xD9 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        // The length field counts itself, so anything below 2 is
        // structurally invalid and nothing after it can be trusted.
        if len < 2 {
            break;
        }
        let end = (pos + 2 + len).min(data.len());
        if (0xE0..=0xEF).contains(&marker) {
            segments.push((marker, pos..end));
        }
        pos = end;
    }

    segments
}

/// Extract capture tags from a JPEG's APP1 Exif segment.
fn read_exif_from_jpeg(data: &[u8]) -> ExifCapture {
    for (marker, range) in app_segments(data) {
        if marker != 0xE1 {
            continue;
        }
        // Segment body starts after marker (2) + length (2)
        let Some(body) = data.get(range.start + 4..range.end) else {
            continue;
        };
        if let Some(tiff) = body.strip_prefix(EXIF_HEADER) {
            return parse_tiff(tiff);
        }
    }
    ExifCapture::default()
}

// ---------------------------------------------------------------------------
// TIFF IFD parsing
// ---------------------------------------------------------------------------

// IFD0 tags
const TAG_MAKE: u16 = 271;
const TAG_MODEL: u16 = 272;
const TAG_EXIF_IFD: u16 = 34665;

// Exif sub-IFD tags
const TAG_EXPOSURE_TIME: u16 = 33434;
const TAG_F_NUMBER: u16 = 33437;
const TAG_ISO: u16 = 34855;
const TAG_FOCAL_LENGTH: u16 = 37386;

/// TIFF byte reader. All value offsets are relative to the start of the
/// TIFF header (the `II`/`MM` bytes), which is the start of `data` here.
struct TiffReader<'a> {
    data: &'a [u8],
    big_endian: bool,
}

impl<'a> TiffReader<'a> {
    fn new(data: &'a [u8]) -> Option<Self> {
        let big_endian = match data.get(0..2)? {
            b"MM" => true,
            b"II" => false,
            _ => return None,
        };
        let reader = Self { data, big_endian };
        // TIFF magic
        if reader.read_u16(2)? != 42 {
            return None;
        }
        Some(reader)
    }

    fn read_u16(&self, offset: usize) -> Option<u16> {
        let b = self.data.get(offset..offset + 2)?;
        Some(if self.big_endian {
            u16::from_be_bytes([b[0], b[1]])
        } else {
            u16::from_le_bytes([b[0], b[1]])
        })
    }

    fn read_u32(&self, offset: usize) -> Option<u32> {
        let b = self.data.get(offset..offset + 4)?;
        Some(if self.big_endian {
            u32::from_be_bytes([b[0], b[1], b[2], b[3]])
        } else {
            u32::from_le_bytes([b[0], b[1], b[2], b[3]])
        })
    }

    /// Bytes backing an IFD entry's value. Values of four bytes or fewer
    /// are stored inline in the offset field; longer values live at the
    /// offset it points to.
    fn value_bytes(&self, entry_offset: usize, byte_len: usize) -> Option<&'a [u8]> {
        if byte_len <= 4 {
            self.data.get(entry_offset + 8..entry_offset + 8 + byte_len)
        } else {
            let offset = self.read_u32(entry_offset + 4)? as usize;
            self.data.get(offset..offset + byte_len)
        }
    }
}

/// Byte width of one value of a TIFF field type.
fn type_size(typ: u16) -> usize {
    match typ {
        1 | 2 | 6 | 7 => 1, // BYTE, ASCII, SBYTE, UNDEFINED
        3 | 8 => 2,         // SHORT, SSHORT
        4 | 9 | 11 => 4,    // LONG, SLONG, FLOAT
        5 | 10 | 12 => 8,   // RATIONAL, SRATIONAL, DOUBLE
        _ => 1,
    }
}

/// One parsed IFD entry with its value bytes resolved.
struct IfdEntry<'a> {
    tag: u16,
    typ: u16,
    value: &'a [u8],
    big_endian: bool,
}

impl IfdEntry<'_> {
    fn as_string(&self) -> Option<String> {
        if self.typ != 2 {
            return None;
        }
        let s = String::from_utf8_lossy(self.value)
            .trim_end_matches('\0')
            .trim()
            .to_string();
        (!s.is_empty()).then_some(s)
    }

    fn as_u32(&self) -> Option<u32> {
        let from = |b: &[u8]| -> Option<u32> {
            match (self.typ, self.big_endian) {
                (3, true) => Some(u16::from_be_bytes([b[0], b[1]]) as u32),
                (3, false) => Some(u16::from_le_bytes([b[0], b[1]]) as u32),
                (4, true) => Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]])),
                (4, false) => Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
                _ => None,
            }
        };
        let width = type_size(self.typ);
        (self.value.len() >= width).then(|| from(self.value)).flatten()
    }

    fn as_rational(&self) -> Option<f64> {
        if self.typ != 5 || self.value.len() < 8 {
            return None;
        }
        let word = |b: &[u8]| {
            if self.big_endian {
                u32::from_be_bytes([b[0], b[1], b[2], b[3]])
            } else {
                u32::from_le_bytes([b[0], b[1], b[2], b[3]])
            }
        };
        let num = word(&self.value[0..4]);
        let den = word(&self.value[4..8]);
        (den != 0).then(|| num as f64 / den as f64)
    }
}

/// Walk one IFD, invoking the callback per entry. Returns the entry count
/// consumed, or `None` when the IFD is truncated.
fn walk_ifd<'a>(
    reader: &TiffReader<'a>,
    ifd_offset: usize,
    mut visit: impl FnMut(IfdEntry<'a>),
) -> Option<()> {
    let entry_count = reader.read_u16(ifd_offset)? as usize;
    let entries_start = ifd_offset + 2;

    for i in 0..entry_count {
        let entry_offset = entries_start + i * 12;
        let tag = reader.read_u16(entry_offset)?;
        let typ = reader.read_u16(entry_offset + 2)?;
        let count = reader.read_u32(entry_offset + 4)? as usize;
        let byte_len = count.checked_mul(type_size(typ))?;

        if let Some(value) = reader.value_bytes(entry_offset, byte_len) {
            visit(IfdEntry {
                tag,
                typ,
                value,
                big_endian: reader.big_endian,
            });
        }
    }
    Some(())
}

/// Parse the TIFF structure of an Exif blob into capture tags.
fn parse_tiff(data: &[u8]) -> ExifCapture {
    let mut result = ExifCapture::default();

    let Some(reader) = TiffReader::new(data) else {
        return result;
    };
    let Some(ifd0_offset) = reader.read_u32(4) else {
        return result;
    };

    let mut exif_ifd_offset: Option<usize> = None;
    let _ = walk_ifd(&reader, ifd0_offset as usize, |entry| match entry.tag {
        TAG_MAKE => result.make = entry.as_string(),
        TAG_MODEL => result.model = entry.as_string(),
        TAG_EXIF_IFD => exif_ifd_offset = entry.as_u32().map(|v| v as usize),
        _ => {}
    });

    if let Some(offset) = exif_ifd_offset {
        let _ = walk_ifd(&reader, offset, |entry| match entry.tag {
            TAG_EXPOSURE_TIME => result.exposure_time = entry.as_rational(),
            TAG_F_NUMBER => result.f_number = entry.as_rational(),
            TAG_ISO => result.iso = entry.as_u32(),
            TAG_FOCAL_LENGTH => result.focal_length = entry.as_rational(),
            _ => {}
        });
    }

    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a minimal little-endian Exif TIFF blob with IFD0 (Make, Model,
    /// ExifIFD pointer) and an Exif sub-IFD with the four exposure tags.
    pub(crate) fn synthetic_tiff(
        make: &str,
        model: &str,
        exposure: (u32, u32),
        f_number: (u32, u32),
        iso: u16,
        focal: (u32, u32),
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"II");
        buf.extend_from_slice(&42u16.to_le_bytes());
        buf.extend_from_slice(&8u32.to_le_bytes()); // IFD0 at offset 8

        // Layout (all offsets relative to TIFF start):
        //   8: IFD0 (3 entries) = 2 + 3*12 + 4 = 42 bytes → ends at 50
        //  50: Exif IFD (4 entries) = 2 + 4*12 + 4 = 54 bytes → ends at 104
        // 104: long values (strings, rationals)
        let ifd0 = 8u32;
        let exif_ifd = 50u32;
        let mut heap = 104u32;
        let mut heap_bytes: Vec<u8> = Vec::new();

        let mut push_heap = |bytes: &[u8]| -> u32 {
            let at = heap;
            heap_bytes.extend_from_slice(bytes);
            heap += bytes.len() as u32;
            at
        };

        let make_z = format!("{make}\0");
        let model_z = format!("{model}\0");
        let make_off = push_heap(make_z.as_bytes());
        let model_off = push_heap(model_z.as_bytes());
        let exp_off = push_heap(&[exposure.0.to_le_bytes(), exposure.1.to_le_bytes()].concat());
        let fnum_off = push_heap(&[f_number.0.to_le_bytes(), f_number.1.to_le_bytes()].concat());
        let focal_off = push_heap(&[focal.0.to_le_bytes(), focal.1.to_le_bytes()].concat());

        let entry = |tag: u16, typ: u16, count: u32, value: u32| -> Vec<u8> {
            let mut e = Vec::with_capacity(12);
            e.extend_from_slice(&tag.to_le_bytes());
            e.extend_from_slice(&typ.to_le_bytes());
            e.extend_from_slice(&count.to_le_bytes());
            e.extend_from_slice(&value.to_le_bytes());
            e
        };

        assert_eq!(buf.len(), ifd0 as usize);
        buf.extend_from_slice(&3u16.to_le_bytes());
        buf.extend(entry(TAG_MAKE, 2, make_z.len() as u32, make_off));
        buf.extend(entry(TAG_MODEL, 2, model_z.len() as u32, model_off));
        buf.extend(entry(TAG_EXIF_IFD, 4, 1, exif_ifd));
        buf.extend_from_slice(&0u32.to_le_bytes()); // no next IFD

        assert_eq!(buf.len(), exif_ifd as usize);
        buf.extend_from_slice(&4u16.to_le_bytes());
        buf.extend(entry(TAG_EXPOSURE_TIME, 5, 1, exp_off));
        buf.extend(entry(TAG_F_NUMBER, 5, 1, fnum_off));
        // SHORT value stored inline in the low bytes of the value field
        buf.extend(entry(TAG_ISO, 3, 1, iso as u32));
        buf.extend(entry(TAG_FOCAL_LENGTH, 5, 1, focal_off));
        buf.extend_from_slice(&0u32.to_le_bytes());

        assert_eq!(buf.len(), 104);
        buf.extend_from_slice(&heap_bytes);
        buf
    }

    /// Wrap a TIFF blob in a minimal JPEG (SOI + APP1 Exif + SOS + EOI).
    pub(crate) fn jpeg_with_exif(tiff: &[u8]) -> Vec<u8> {
        let mut jpeg = vec![0xFF, 0xD8];
        let body_len = (EXIF_HEADER.len() + tiff.len() + 2) as u16;
        jpeg.extend_from_slice(&[0xFF, 0xE1]);
        jpeg.extend_from_slice(&body_len.to_be_bytes());
        jpeg.extend_from_slice(EXIF_HEADER);
        jpeg.extend_from_slice(tiff);
        jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]);
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        jpeg
    }

    #[test]
    fn parse_synthetic_exif_all_tags() {
        let tiff = synthetic_tiff("Canon", "EOS R5", (1, 250), (18, 10), 200, (50, 1));
        let jpeg = jpeg_with_exif(&tiff);

        let capture = read_exif_from_jpeg(&jpeg);
        assert_eq!(capture.make.as_deref(), Some("Canon"));
        assert_eq!(capture.model.as_deref(), Some("EOS R5"));
        assert_eq!(capture.exposure_time, Some(0.004));
        assert_eq!(capture.f_number, Some(1.8));
        assert_eq!(capture.iso, Some(200));
        assert_eq!(capture.focal_length, Some(50.0));
        assert!(!capture.is_empty());
    }

    #[test]
    fn jpeg_without_app1_is_empty() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x02, 0xFF, 0xD9];
        assert!(read_exif_from_jpeg(&jpeg).is_empty());
    }

    #[test]
    fn non_jpeg_bytes_are_empty() {
        assert!(read_exif_from_jpeg(b"not a jpeg at all").is_empty());
    }

    #[test]
    fn truncated_tiff_is_empty() {
        let tiff = synthetic_tiff("Canon", "EOS R5", (1, 250), (18, 10), 200, (50, 1));
        let jpeg = jpeg_with_exif(&tiff[..20]);
        // Truncation cuts the value heap; strings and rationals drop out
        let capture = read_exif_from_jpeg(&jpeg);
        assert!(capture.make.is_none());
        assert!(capture.exposure_time.is_none());
    }

    #[test]
    fn zero_denominator_rational_ignored() {
        let tiff = synthetic_tiff("X", "Y", (1, 0), (18, 10), 100, (35, 1));
        let capture = read_exif_from_jpeg(&jpeg_with_exif(&tiff));
        assert_eq!(capture.exposure_time, None);
        assert_eq!(capture.f_number, Some(1.8));
    }

    #[test]
    fn zero_length_app1_segment_is_empty() {
        // Declared segment length of 0: the length field cannot even
        // cover itself. Must degrade to empty, not slice out of range.
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x00, 0xFF, 0xD9];
        assert!(app_segments(&jpeg).is_empty());
        assert!(read_exif_from_jpeg(&jpeg).is_empty());

        let jpeg = [0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x01, 0xFF, 0xD9];
        assert!(read_exif_from_jpeg(&jpeg).is_empty());
    }

    #[test]
    fn read_exif_with_garbled_segment_length() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("garbled.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x00, 0xFF, 0xD9]).unwrap();
        assert!(read_exif(&path).is_empty());
    }

    #[test]
    fn read_exif_nonexistent_file() {
        assert!(read_exif(Path::new("/nonexistent/image.jpg")).is_empty());
    }

    #[test]
    fn read_exif_unsupported_extension() {
        assert!(read_exif(Path::new("/some/file.png")).is_empty());
    }

    #[test]
    fn app_segments_lists_markers_in_order() {
        let tiff = synthetic_tiff("A", "B", (1, 60), (28, 10), 400, (85, 1));
        let jpeg = jpeg_with_exif(&tiff);
        let segs = app_segments(&jpeg);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].0, 0xE1);
        // Range covers the full segment including the marker header
        assert_eq!(&jpeg[segs[0].1.start..segs[0].1.start + 2], &[0xFF, 0xE1]);
    }

    #[test]
    fn app_segments_without_soi_is_empty() {
        assert!(app_segments(b"plain bytes").is_empty());
    }
}

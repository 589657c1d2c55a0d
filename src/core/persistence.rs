/*
 * This module is responsible for persisting style tables. A style can be
 * written in one of three interchangeable encodings, selected explicitly by
 * the caller via `StyleFormat` (extension sniffing is offered as a helper,
 * never applied implicitly):
 *
 *   - binary (`.rgsb`): signature, format version, slot count, then the raw
 *     slot values as little-endian u32 in table order;
 *   - text (`.rgst`): one `SYMBOLIC_NAME = 0xRRGGBBAA` line per slot,
 *     human-editable and diff-friendly;
 *   - image (`.png`): an RGBA8 thumbnail, one pixel per slot in row-major
 *     table order, so a style can be distributed as a previewable image.
 *
 * Loading is all-or-nothing: a table is only returned once the entire file
 * decoded cleanly against the expected layout, so a failed load can never
 * leave a caller with a partially applied style.
 *
 * It includes a trait for persistence operations (`StylePersistenceOperations`)
 * to facilitate testing and dependency injection, and a concrete
 * implementation (`CoreStyleCodec`).
 */
use super::layout::StyleLayout;
use super::style_table::StyleTable;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

pub const BINARY_FILE_EXTENSION: &str = "rgsb";
pub const TEXT_FILE_EXTENSION: &str = "rgst";
pub const IMAGE_FILE_EXTENSION: &str = "png";

const BINARY_SIGNATURE: [u8; 4] = *b"RGSB";
const BINARY_VERSION: u16 = 1;
const IMAGE_WIDTH: u32 = 16;

#[derive(Debug)]
pub enum StyleFileError {
    Io(io::Error),
    /// The binary signature bytes did not match.
    BadSignature,
    /// The binary format version is newer than this editor understands.
    UnsupportedVersion(u16),
    /// The file describes a different number of slots than the layout expects.
    SlotCountMismatch { expected: usize, found: usize },
    /// The binary payload ended before all declared slots were read.
    Truncated { expected_bytes: usize, found_bytes: usize },
    /// A text line could not be parsed as `NAME = VALUE`.
    MalformedLine { line: usize, reason: String },
    /// A text line names a slot unknown to the layout.
    UnknownSlotName { line: usize, name: String },
    /// A text file assigns the same slot twice.
    DuplicateSlot { line: usize, name: String },
    /// The image does not have the fixed width/height the layout dictates.
    ImageGeometry { width: u32, height: u32 },
    /// The image is not 8-bit RGBA.
    ImagePixelFormat(String),
    ImageDecode(png::DecodingError),
    ImageEncode(png::EncodingError),
}

impl From<io::Error> for StyleFileError {
    fn from(err: io::Error) -> Self {
        StyleFileError::Io(err)
    }
}

impl From<png::DecodingError> for StyleFileError {
    fn from(err: png::DecodingError) -> Self {
        StyleFileError::ImageDecode(err)
    }
}

impl From<png::EncodingError> for StyleFileError {
    fn from(err: png::EncodingError) -> Self {
        StyleFileError::ImageEncode(err)
    }
}

impl std::fmt::Display for StyleFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleFileError::Io(e) => write!(f, "Style file I/O error: {e}"),
            StyleFileError::BadSignature => write!(f, "Not a binary style file (bad signature)"),
            StyleFileError::UnsupportedVersion(v) => {
                write!(f, "Unsupported binary style version: {v}")
            }
            StyleFileError::SlotCountMismatch { expected, found } => {
                write!(f, "Style slot count mismatch: expected {expected}, found {found}")
            }
            StyleFileError::Truncated {
                expected_bytes,
                found_bytes,
            } => write!(
                f,
                "Truncated style data: expected {expected_bytes} bytes, found {found_bytes}"
            ),
            StyleFileError::MalformedLine { line, reason } => {
                write!(f, "Malformed style line {line}: {reason}")
            }
            StyleFileError::UnknownSlotName { line, name } => {
                write!(f, "Unknown style property '{name}' on line {line}")
            }
            StyleFileError::DuplicateSlot { line, name } => {
                write!(f, "Style property '{name}' assigned again on line {line}")
            }
            StyleFileError::ImageGeometry { width, height } => {
                write!(f, "Unexpected style image geometry: {width}x{height}")
            }
            StyleFileError::ImagePixelFormat(s) => {
                write!(f, "Unexpected style image pixel format: {s}")
            }
            StyleFileError::ImageDecode(e) => write!(f, "Style image decode error: {e}"),
            StyleFileError::ImageEncode(e) => write!(f, "Style image encode error: {e}"),
        }
    }
}

impl std::error::Error for StyleFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StyleFileError::Io(e) => Some(e),
            StyleFileError::ImageDecode(e) => Some(e),
            StyleFileError::ImageEncode(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StyleFileError>;

/*
 * The encoding a style file is written in. Callers always state the format
 * they intend; `StyleFormat::from_path` only helps translate a user-chosen
 * file name into that intent.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleFormat {
    Binary,
    Text,
    Image,
}

impl StyleFormat {
    pub fn extension(self) -> &'static str {
        match self {
            StyleFormat::Binary => BINARY_FILE_EXTENSION,
            StyleFormat::Text => TEXT_FILE_EXTENSION,
            StyleFormat::Image => IMAGE_FILE_EXTENSION,
        }
    }

    /// Recognizes a format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<StyleFormat> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            BINARY_FILE_EXTENSION => Some(StyleFormat::Binary),
            TEXT_FILE_EXTENSION => Some(StyleFormat::Text),
            IMAGE_FILE_EXTENSION => Some(StyleFormat::Image),
            _ => None,
        }
    }
}

impl std::fmt::Display for StyleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleFormat::Binary => write!(f, "binary"),
            StyleFormat::Text => write!(f, "text"),
            StyleFormat::Image => write!(f, "image"),
        }
    }
}

pub trait StylePersistenceOperations: Send + Sync {
    fn save_style(
        &self,
        table: &StyleTable,
        layout: &StyleLayout,
        path: &Path,
        format: StyleFormat,
    ) -> Result<()>;
    fn load_style(
        &self,
        layout: &StyleLayout,
        path: &Path,
        format: StyleFormat,
    ) -> Result<StyleTable>;
}

pub struct CoreStyleCodec {}

impl CoreStyleCodec {
    pub fn new() -> Self {
        CoreStyleCodec {}
    }

    fn save_binary(table: &StyleTable, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&BINARY_SIGNATURE)?;
        writer.write_all(&BINARY_VERSION.to_le_bytes())?;
        writer.write_all(&(table.len() as u16).to_le_bytes())?;
        for value in table.as_slice() {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    fn load_binary(layout: &StyleLayout, path: &Path) -> Result<StyleTable> {
        let data = fs::read(path)?;
        if data.len() < 4 || data[0..4] != BINARY_SIGNATURE {
            return Err(StyleFileError::BadSignature);
        }
        if data.len() < 8 {
            return Err(StyleFileError::Truncated {
                expected_bytes: 8,
                found_bytes: data.len(),
            });
        }
        let version = u16::from_le_bytes([data[4], data[5]]);
        if version != BINARY_VERSION {
            return Err(StyleFileError::UnsupportedVersion(version));
        }
        let slot_count = u16::from_le_bytes([data[6], data[7]]) as usize;
        if slot_count != layout.total_slots() {
            return Err(StyleFileError::SlotCountMismatch {
                expected: layout.total_slots(),
                found: slot_count,
            });
        }
        let expected_bytes = 8 + slot_count * 4;
        if data.len() < expected_bytes {
            return Err(StyleFileError::Truncated {
                expected_bytes,
                found_bytes: data.len(),
            });
        }
        let slots = data[8..expected_bytes]
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Ok(StyleTable::from_slots(slots))
    }

    fn save_text(table: &StyleTable, layout: &StyleLayout, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "# ReStyle style sheet")?;
        writeln!(writer, "# {} properties, NAME = 0xRRGGBBAA", table.len())?;
        for (name, value) in layout.slot_names().iter().zip(table.as_slice()) {
            writeln!(writer, "{name} = 0x{value:08X}")?;
        }
        writer.flush()?;
        Ok(())
    }

    fn load_text(layout: &StyleLayout, path: &Path) -> Result<StyleTable> {
        let content = fs::read_to_string(path)?;
        let name_to_offset = layout.name_to_offset();
        let mut slots: Vec<Option<u32>> = vec![None; layout.total_slots()];
        let mut found = 0usize;

        for (index, raw_line) in content.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw_line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((name_part, value_part)) = trimmed.split_once('=') else {
                return Err(StyleFileError::MalformedLine {
                    line,
                    reason: "missing '='".to_string(),
                });
            };
            let name = name_part.trim();
            let value_text = value_part.trim();
            let value = Self::parse_slot_value(value_text).ok_or_else(|| {
                StyleFileError::MalformedLine {
                    line,
                    reason: format!("'{value_text}' is not a slot value"),
                }
            })?;
            let Some(offset) = name_to_offset.get(name) else {
                return Err(StyleFileError::UnknownSlotName {
                    line,
                    name: name.to_string(),
                });
            };
            if slots[*offset].is_some() {
                return Err(StyleFileError::DuplicateSlot {
                    line,
                    name: name.to_string(),
                });
            }
            slots[*offset] = Some(value);
            found += 1;
        }

        if found != layout.total_slots() {
            return Err(StyleFileError::SlotCountMismatch {
                expected: layout.total_slots(),
                found,
            });
        }
        // Every entry is Some once the count matches; 0 is unreachable filler.
        Ok(StyleTable::from_slots(
            slots.into_iter().map(|v| v.unwrap_or(0)).collect(),
        ))
    }

    fn parse_slot_value(text: &str) -> Option<u32> {
        if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            u32::from_str_radix(hex, 16).ok()
        } else {
            text.parse::<u32>().ok()
        }
    }

    fn image_height(slot_count: usize) -> u32 {
        (slot_count as u32).div_ceil(IMAGE_WIDTH)
    }

    fn save_image(table: &StyleTable, path: &Path) -> Result<()> {
        let height = Self::image_height(table.len());
        // Padding pixels beyond the last slot stay zero.
        let mut pixels = vec![0u8; (IMAGE_WIDTH * height * 4) as usize];
        for (slot, value) in table.as_slice().iter().enumerate() {
            pixels[slot * 4..slot * 4 + 4].copy_from_slice(&value.to_be_bytes());
        }

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let mut encoder = png::Encoder::new(writer, IMAGE_WIDTH, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut png_writer = encoder.write_header()?;
        png_writer.write_image_data(&pixels)?;
        png_writer.finish()?;
        Ok(())
    }

    fn load_image(layout: &StyleLayout, path: &Path) -> Result<StyleTable> {
        let expected_height = Self::image_height(layout.total_slots());
        let file = File::open(path)?;
        let decoder = png::Decoder::new(BufReader::new(file));
        let mut reader = decoder.read_info()?;
        let mut pixels = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut pixels)?;

        if info.color_type != png::ColorType::Rgba || info.bit_depth != png::BitDepth::Eight {
            return Err(StyleFileError::ImagePixelFormat(format!(
                "{:?}/{:?}",
                info.color_type, info.bit_depth
            )));
        }
        if info.width != IMAGE_WIDTH || info.height != expected_height {
            return Err(StyleFileError::ImageGeometry {
                width: info.width,
                height: info.height,
            });
        }
        let slots = pixels[..layout.total_slots() * 4]
            .chunks_exact(4)
            .map(|px| u32::from_be_bytes([px[0], px[1], px[2], px[3]]))
            .collect();
        Ok(StyleTable::from_slots(slots))
    }
}

impl Default for CoreStyleCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl StylePersistenceOperations for CoreStyleCodec {
    /*
     * Writes the table to `path` in the requested encoding. The table is
     * written in full; the on-disk artifact never represents a partial style.
     */
    fn save_style(
        &self,
        table: &StyleTable,
        layout: &StyleLayout,
        path: &Path,
        format: StyleFormat,
    ) -> Result<()> {
        log::trace!("CoreStyleCodec: Saving {format} style to {path:?}");
        if table.len() != layout.total_slots() {
            return Err(StyleFileError::SlotCountMismatch {
                expected: layout.total_slots(),
                found: table.len(),
            });
        }
        match format {
            StyleFormat::Binary => Self::save_binary(table, path)?,
            StyleFormat::Text => Self::save_text(table, layout, path)?,
            StyleFormat::Image => Self::save_image(table, path)?,
        }
        log::debug!(
            "CoreStyleCodec: Saved {} slots as {format} style to {path:?}.",
            table.len()
        );
        Ok(())
    }

    /*
     * Reads a complete table from `path` in the stated encoding. On any
     * failure no table is produced, so the caller's current style stays
     * untouched.
     */
    fn load_style(
        &self,
        layout: &StyleLayout,
        path: &Path,
        format: StyleFormat,
    ) -> Result<StyleTable> {
        log::trace!("CoreStyleCodec: Loading {format} style from {path:?}");
        let table = match format {
            StyleFormat::Binary => Self::load_binary(layout, path)?,
            StyleFormat::Text => Self::load_text(layout, path)?,
            StyleFormat::Image => Self::load_image(layout, path)?,
        };
        log::debug!(
            "CoreStyleCodec: Loaded {} slots from {format} style {path:?}.",
            table.len()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::ControlType;
    use std::fs;
    use tempfile::TempDir;

    fn sample_table(layout: &StyleLayout) -> StyleTable {
        let mut table = StyleTable::default_light(layout);
        let button_base = layout
            .slot_index(ControlType::Button, 1)
            .expect("BUTTON slot 1 exists");
        table.set(button_base, 0xDEADBEEF);
        let picker_pressed = layout
            .slot_index(ControlType::ColorPicker, 5)
            .expect("COLORPICKER slot 5 exists");
        table.set(picker_pressed, 0x01020304);
        table
    }

    #[test]
    fn test_binary_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let layout = StyleLayout::new();
        let codec = CoreStyleCodec::new();
        let table = sample_table(&layout);
        let path = temp_dir.path().join("style.rgsb");

        codec
            .save_style(&table, &layout, &path, StyleFormat::Binary)
            .expect("binary save should succeed");
        let loaded = codec
            .load_style(&layout, &path, StyleFormat::Binary)
            .expect("binary load should succeed");
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_binary_round_trips_sentinel_table() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let layout = StyleLayout::new();
        let codec = CoreStyleCodec::new();
        let table = StyleTable::from_slots(vec![0xFFFFFFFF; layout.total_slots()]);
        let path = temp_dir.path().join("sentinel.rgsb");

        codec
            .save_style(&table, &layout, &path, StyleFormat::Binary)
            .expect("binary save should succeed");
        let loaded = codec
            .load_style(&layout, &path, StyleFormat::Binary)
            .expect("binary load should succeed");
        assert!(loaded.as_slice().iter().all(|v| *v == 0xFFFFFFFF));
    }

    #[test]
    fn test_text_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let layout = StyleLayout::new();
        let codec = CoreStyleCodec::new();
        let table = sample_table(&layout);
        let path = temp_dir.path().join("style.rgst");

        codec
            .save_style(&table, &layout, &path, StyleFormat::Text)
            .expect("text save should succeed");
        let loaded = codec
            .load_style(&layout, &path, StyleFormat::Text)
            .expect("text load should succeed");
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_text_file_is_hand_editable() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let layout = StyleLayout::new();
        let codec = CoreStyleCodec::new();
        let table = StyleTable::default_light(&layout);
        let path = temp_dir.path().join("style.rgst");

        codec
            .save_style(&table, &layout, &path, StyleFormat::Text)
            .expect("text save should succeed");
        let content = fs::read_to_string(&path).unwrap();
        let edited = content.replace(
            "LABEL_TEXT_COLOR_NORMAL = 0x686868FF",
            "LABEL_TEXT_COLOR_NORMAL = 0x112233FF",
        );
        assert_ne!(content, edited, "expected the default label color line");
        fs::write(&path, edited).unwrap();

        let loaded = codec
            .load_style(&layout, &path, StyleFormat::Text)
            .expect("edited text load should succeed");
        let offset = layout.slot_index(ControlType::Label, 0).unwrap();
        assert_eq!(loaded.get(offset), 0x112233FF);
    }

    #[test]
    fn test_image_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let layout = StyleLayout::new();
        let codec = CoreStyleCodec::new();
        let table = sample_table(&layout);
        let path = temp_dir.path().join("style.png");

        codec
            .save_style(&table, &layout, &path, StyleFormat::Image)
            .expect("image save should succeed");
        let loaded = codec
            .load_style(&layout, &path, StyleFormat::Image)
            .expect("image load should succeed");
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_binary_load_rejects_truncated_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let layout = StyleLayout::new();
        let codec = CoreStyleCodec::new();
        let table = StyleTable::default_light(&layout);
        let path = temp_dir.path().join("style.rgsb");

        codec
            .save_style(&table, &layout, &path, StyleFormat::Binary)
            .expect("binary save should succeed");
        let mut data = fs::read(&path).unwrap();
        data.truncate(data.len() - 10);
        fs::write(&path, data).unwrap();

        assert!(matches!(
            codec.load_style(&layout, &path, StyleFormat::Binary),
            Err(StyleFileError::Truncated { .. })
        ));
    }

    #[test]
    fn test_binary_load_rejects_bad_signature_and_version() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let layout = StyleLayout::new();
        let codec = CoreStyleCodec::new();
        let table = StyleTable::default_light(&layout);
        let path = temp_dir.path().join("style.rgsb");

        codec
            .save_style(&table, &layout, &path, StyleFormat::Binary)
            .expect("binary save should succeed");
        let good = fs::read(&path).unwrap();

        let mut bad_signature = good.clone();
        bad_signature[0] = b'X';
        fs::write(&path, &bad_signature).unwrap();
        assert!(matches!(
            codec.load_style(&layout, &path, StyleFormat::Binary),
            Err(StyleFileError::BadSignature)
        ));

        let mut bad_version = good;
        bad_version[4] = 99;
        fs::write(&path, &bad_version).unwrap();
        assert!(matches!(
            codec.load_style(&layout, &path, StyleFormat::Binary),
            Err(StyleFileError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_text_load_rejects_unknown_name_and_malformed_line() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let layout = StyleLayout::new();
        let codec = CoreStyleCodec::new();

        let path = temp_dir.path().join("unknown.rgst");
        fs::write(&path, "NOT_A_SLOT = 0x00000000\n").unwrap();
        assert!(matches!(
            codec.load_style(&layout, &path, StyleFormat::Text),
            Err(StyleFileError::UnknownSlotName { line: 1, .. })
        ));

        let path = temp_dir.path().join("malformed.rgst");
        fs::write(&path, "# header\nDEFAULT_BACKGROUND_COLOR 0x00000000\n").unwrap();
        assert!(matches!(
            codec.load_style(&layout, &path, StyleFormat::Text),
            Err(StyleFileError::MalformedLine { line: 2, .. })
        ));
    }

    #[test]
    fn test_text_load_rejects_missing_slots() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let layout = StyleLayout::new();
        let codec = CoreStyleCodec::new();
        let path = temp_dir.path().join("partial.rgst");
        fs::write(&path, "DEFAULT_BACKGROUND_COLOR = 0xF5F5F5FF\n").unwrap();

        assert!(matches!(
            codec.load_style(&layout, &path, StyleFormat::Text),
            Err(StyleFileError::SlotCountMismatch { found: 1, .. })
        ));
    }

    #[test]
    fn test_image_load_rejects_wrong_geometry() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let layout = StyleLayout::new();
        let codec = CoreStyleCodec::new();
        let path = temp_dir.path().join("wrong.png");

        let file = fs::File::create(&path).unwrap();
        let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), 8, 8);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&vec![0u8; 8 * 8 * 4]).unwrap();
        writer.finish().unwrap();

        assert!(matches!(
            codec.load_style(&layout, &path, StyleFormat::Image),
            Err(StyleFileError::ImageGeometry {
                width: 8,
                height: 8
            })
        ));
    }

    #[test]
    fn test_load_missing_file_reports_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let layout = StyleLayout::new();
        let codec = CoreStyleCodec::new();
        let path = temp_dir.path().join("nope.rgsb");
        assert!(matches!(
            codec.load_style(&layout, &path, StyleFormat::Binary),
            Err(StyleFileError::Io(_))
        ));
    }

    #[test]
    fn test_format_detection_by_extension() {
        assert_eq!(
            StyleFormat::from_path(Path::new("a/style.rgsb")),
            Some(StyleFormat::Binary)
        );
        assert_eq!(
            StyleFormat::from_path(Path::new("style.RGST")),
            Some(StyleFormat::Text)
        );
        assert_eq!(
            StyleFormat::from_path(Path::new("thumb.png")),
            Some(StyleFormat::Image)
        );
        assert_eq!(StyleFormat::from_path(Path::new("style.json")), None);
        assert_eq!(StyleFormat::from_path(Path::new("style")), None);
    }
}

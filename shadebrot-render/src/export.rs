//! PNG export with embedded metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use shadebrot_core::{CoordinateMapping, Session};

use crate::buffer::RenderBuffer;
use crate::error::RenderError;

/// Describes the exported view in tEXt chunks.
///
/// Informational only; nothing reads it back into a session.
#[derive(Debug, Clone)]
pub struct ExportMetadata {
    pub preset: String,
    pub mapping: String,
    pub offset_re: f64,
    pub offset_im: f64,
    pub scale: f64,
    pub max_iterations: u32,
    pub width: u32,
    pub height: u32,
}

impl ExportMetadata {
    pub fn from_session(session: &Session) -> Self {
        let vp = session.viewport();
        let (width, height) = session.size();
        let mapping = match vp.mapping {
            CoordinateMapping::Biased { bias } => format!("biased({bias})"),
            CoordinateMapping::CenterSubtracted => "center_subtracted".to_string(),
        };
        Self {
            preset: session.preset().name.clone(),
            mapping,
            offset_re: vp.offset.re,
            offset_im: vp.offset.im,
            scale: vp.scale,
            max_iterations: session.escape_time().max_iterations(),
            width,
            height,
        }
    }
}

/// Write an RGBA buffer as a PNG file with embedded view metadata.
///
/// Uses the `png` crate directly to inject custom tEXt chunks readable by
/// exiftool and most image viewers.
pub fn export_png(buffer: &RenderBuffer, path: &Path, metadata: &ExportMetadata) -> crate::Result<()> {
    let (width, height) = (buffer.width, buffer.height);
    if width == 0 || height == 0 || buffer.pixels.len() != width as usize * height as usize * 4 {
        return Err(RenderError::InvalidDimensions { width, height });
    }

    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "shadebrot".to_string())?;
    encoder.add_text_chunk("Description".to_string(), build_description(metadata))?;
    for (key, value) in build_metadata_pairs(metadata) {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;

    debug!("Exported PNG {}x{} to {}", width, height, path.display());
    Ok(())
}

fn build_description(meta: &ExportMetadata) -> String {
    format!(
        "{} - Offset: {} {}i, Scale: {}, Iterations: {}",
        meta.preset, meta.offset_re, meta.offset_im, meta.scale, meta.max_iterations,
    )
}

fn build_metadata_pairs(meta: &ExportMetadata) -> Vec<(String, String)> {
    vec![
        ("Shadebrot.Preset".into(), meta.preset.clone()),
        ("Shadebrot.Mapping".into(), meta.mapping.clone()),
        ("Shadebrot.OffsetRe".into(), meta.offset_re.to_string()),
        ("Shadebrot.OffsetIm".into(), meta.offset_im.to_string()),
        ("Shadebrot.Scale".into(), meta.scale.to_string()),
        ("Shadebrot.MaxIterations".into(), meta.max_iterations.to_string()),
        ("Shadebrot.Resolution".into(), format!("{}x{}", meta.width, meta.height)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadebrot_core::Preset;
    use std::io::Read;

    fn metadata() -> ExportMetadata {
        let session = Session::new(Preset::square(), 2, 2).unwrap();
        ExportMetadata::from_session(&session)
    }

    #[test]
    fn export_creates_valid_png() {
        let buffer = RenderBuffer::new(4, 4);
        let dir = std::env::temp_dir().join("shadebrot_test_export");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_export.png");
        export_png(&buffer, &path, &metadata()).expect("export should succeed");

        let mut file = std::fs::File::open(&path).expect("file should exist");
        let mut header = [0u8; 8];
        file.read_exact(&mut header).expect("should read header");
        assert_eq!(&header, b"\x89PNG\r\n\x1a\n", "valid PNG signature");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_embeds_text_chunks() {
        let buffer = RenderBuffer::new(2, 2);
        let dir = std::env::temp_dir().join("shadebrot_test_export_meta");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_meta.png");
        export_png(&buffer, &path, &metadata()).expect("export should succeed");

        let decoder = png::Decoder::new(std::fs::File::open(&path).expect("file should exist"));
        let reader = decoder.read_info().expect("should read info");
        let texts: Vec<_> = reader.info().uncompressed_latin1_text.iter().collect();
        assert!(texts
            .iter()
            .any(|t| t.keyword == "Software" && t.text == "shadebrot"));
        assert!(texts
            .iter()
            .any(|t| t.keyword == "Shadebrot.Preset" && t.text == "square"));
        assert!(texts
            .iter()
            .any(|t| t.keyword == "Shadebrot.Mapping" && t.text == "center_subtracted"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let mut buffer = RenderBuffer::new(2, 2);
        buffer.pixels.pop();
        let path = std::env::temp_dir().join("shadebrot_never_written.png");
        assert!(matches!(
            export_png(&buffer, &path, &metadata()),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let buffer = RenderBuffer::new(2, 2);
        let path = std::env::temp_dir()
            .join("shadebrot_no_such_dir")
            .join("nested")
            .join("out.png");
        assert!(matches!(
            export_png(&buffer, &path, &metadata()),
            Err(RenderError::Io(_))
        ));
    }
}

use std::fs;
use std::path::Path;

use png::{BitDepth, ColorType, Encoder};

use crate::error::OutputError;

/// Encode straight RGBA8 pixels as PNG. Same input, same bytes.
pub fn encode_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, OutputError> {
    let mut buf = Vec::new();
    {
        let mut encoder = Encoder::new(&mut buf, width, height);
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba)?;
        writer.finish()?;
    }
    Ok(buf)
}

pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    fs::write(path, bytes)?;
    log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_signature() {
        let bytes = encode_rgba(2, 1, &[255, 0, 0, 255, 0, 0, 255, 128]).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_short_buffer_is_an_error() {
        assert!(matches!(
            encode_rgba(4, 4, &[0; 8]),
            Err(OutputError::Encoding(_))
        ));
    }
}

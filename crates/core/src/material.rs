use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::settings::MaterialSettings;

/// Raw image bytes handed over by the host, tagged with their MIME type.
#[derive(Clone)]
pub struct TexturePayload {
    bytes: Arc<[u8]>,
    mime_type: String,
}

impl TexturePayload {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for TexturePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TexturePayload")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialVariant {
    #[default]
    Unlit,
    Lit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Srgb,
    Linear,
}

#[derive(Debug, Clone)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
    pub color_space: ColorSpace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Normal,
    Unlit,
    Lit,
}

#[derive(Debug, Clone)]
pub enum MaterialDesc {
    /// Colors each fragment by its surface normal; needs no lights.
    Normal,
    Unlit { texture: TextureImage },
    Lit { texture: TextureImage, roughness: f32 },
}

impl MaterialDesc {
    pub fn kind(&self) -> MaterialKind {
        match self {
            MaterialDesc::Normal => MaterialKind::Normal,
            MaterialDesc::Unlit { .. } => MaterialKind::Unlit,
            MaterialDesc::Lit { .. } => MaterialKind::Lit,
        }
    }

    pub fn texture(&self) -> Option<&TextureImage> {
        match self {
            MaterialDesc::Normal => None,
            MaterialDesc::Unlit { texture } | MaterialDesc::Lit { texture, .. } => Some(texture),
        }
    }

    pub fn roughness(&self) -> f32 {
        match self {
            MaterialDesc::Lit { roughness, .. } => *roughness,
            _ => 1.0,
        }
    }

    pub fn needs_lights(&self) -> bool {
        matches!(self, MaterialDesc::Lit { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureDecodeError {
    Empty,
    Decode(String),
    ZeroSize,
}

impl fmt::Display for TextureDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureDecodeError::Empty => write!(f, "texture payload is empty"),
            TextureDecodeError::Decode(message) => write!(f, "texture decode failed: {message}"),
            TextureDecodeError::ZeroSize => write!(f, "texture has zero size"),
        }
    }
}

impl std::error::Error for TextureDecodeError {}

/// Decodes the payload to RGBA8, downscaling so neither side exceeds
/// `max_size` (0 disables the limit).
pub fn decode_texture(
    payload: &TexturePayload,
    max_size: u32,
) -> Result<TextureImage, TextureDecodeError> {
    if payload.is_empty() {
        return Err(TextureDecodeError::Empty);
    }
    // "image/png; charset=binary" and friends still name the format first.
    let mime = payload.mime_type().split(';').next().unwrap_or("").trim();
    let decoded = match image::ImageFormat::from_mime_type(mime) {
        Some(format) => image::load_from_memory_with_format(payload.bytes(), format)
            .or_else(|_| image::load_from_memory(payload.bytes())),
        None => image::load_from_memory(payload.bytes()),
    }
    .map_err(|err| TextureDecodeError::Decode(err.to_string()))?;

    let decoded = if max_size > 0 && (decoded.width() > max_size || decoded.height() > max_size) {
        tracing::debug!(
            "downscaling texture {}x{} to fit {max_size}",
            decoded.width(),
            decoded.height()
        );
        decoded.resize(max_size, max_size, image::imageops::FilterType::Triangle)
    } else {
        decoded
    };
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureDecodeError::ZeroSize);
    }
    Ok(TextureImage {
        width,
        height,
        pixels: Arc::from(rgba.into_raw()),
        color_space: ColorSpace::Srgb,
    })
}

pub fn select_material(payload: Option<&TexturePayload>, settings: &MaterialSettings) -> MaterialDesc {
    let Some(payload) = payload else {
        return MaterialDesc::Normal;
    };
    let texture = match decode_texture(payload, settings.max_texture_size) {
        Ok(texture) => texture,
        Err(err) => {
            tracing::warn!(
                "{err} ({} bytes, mime {:?}); using normal material",
                payload.len(),
                payload.mime_type()
            );
            return MaterialDesc::Normal;
        }
    };
    tracing::debug!(
        "decoded texture {}x{} for {:?} material",
        texture.width,
        texture.height,
        settings.variant
    );
    match settings.variant {
        MaterialVariant::Unlit => MaterialDesc::Unlit { texture },
        MaterialVariant::Lit => MaterialDesc::Lit {
            texture,
            roughness: settings.roughness.clamp(0.0, 1.0),
        },
    }
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut img = image::RgbaImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = image::Rgba([(x * 40) as u8, (y * 40) as u8, 200, 255]);
    }
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MaterialSettings;

    fn lit_settings() -> MaterialSettings {
        MaterialSettings {
            variant: MaterialVariant::Lit,
            ..MaterialSettings::default()
        }
    }

    #[test]
    fn no_payload_gives_normal_material() {
        let material = select_material(None, &MaterialSettings::default());
        assert_eq!(material.kind(), MaterialKind::Normal);
        assert!(material.texture().is_none());
    }

    #[test]
    fn png_payload_gives_unlit_texture_by_default() {
        let payload = TexturePayload::new(png_bytes(4, 3), "image/png");
        let material = select_material(Some(&payload), &MaterialSettings::default());
        assert_eq!(material.kind(), MaterialKind::Unlit);
        let texture = material.texture().unwrap();
        assert_eq!((texture.width, texture.height), (4, 3));
        assert_eq!(texture.pixels.len(), 4 * 3 * 4);
        assert_eq!(texture.color_space, ColorSpace::Srgb);
    }

    #[test]
    fn lit_variant_carries_roughness() {
        let payload = TexturePayload::new(png_bytes(2, 2), "image/png");
        let material = select_material(Some(&payload), &lit_settings());
        assert_eq!(material.kind(), MaterialKind::Lit);
        assert_eq!(material.roughness(), 0.5);
        assert!(material.needs_lights());
    }

    #[test]
    fn wrong_mime_still_decodes_by_sniffing() {
        let payload = TexturePayload::new(png_bytes(2, 2), "image/jpeg");
        let material = select_material(Some(&payload), &MaterialSettings::default());
        assert_eq!(material.kind(), MaterialKind::Unlit);

        let payload = TexturePayload::new(png_bytes(2, 2), "application/octet-stream");
        assert!(decode_texture(&payload, 4096).is_ok());
    }

    #[test]
    fn mime_parameters_are_ignored() {
        let payload = TexturePayload::new(png_bytes(2, 2), "image/png; charset=binary");
        assert!(decode_texture(&payload, 4096).is_ok());
    }

    #[test]
    fn garbage_payload_falls_back_to_normal() {
        let payload = TexturePayload::new(vec![1u8, 2, 3, 4, 5], "image/png");
        assert!(matches!(
            decode_texture(&payload, 4096),
            Err(TextureDecodeError::Decode(_))
        ));
        let material = select_material(Some(&payload), &lit_settings());
        assert_eq!(material.kind(), MaterialKind::Normal);
    }

    #[test]
    fn empty_payload_falls_back_to_normal() {
        let payload = TexturePayload::new(Vec::new(), "image/png");
        assert_eq!(decode_texture(&payload, 4096).unwrap_err(), TextureDecodeError::Empty);
        let material = select_material(Some(&payload), &MaterialSettings::default());
        assert_eq!(material.kind(), MaterialKind::Normal);
    }

    #[test]
    fn oversized_texture_is_downscaled_to_fit() {
        let payload = TexturePayload::new(png_bytes(64, 8), "image/png");
        let texture = decode_texture(&payload, 16).unwrap();
        assert_eq!((texture.width, texture.height), (16, 2));
        assert_eq!(texture.pixels.len(), 16 * 2 * 4);

        let settings = MaterialSettings {
            max_texture_size: 16,
            ..MaterialSettings::default()
        };
        let material = select_material(Some(&payload), &settings);
        assert_eq!(material.kind(), MaterialKind::Unlit);
        let texture = material.texture().unwrap();
        assert_eq!((texture.width, texture.height), (16, 2));
    }

    #[test]
    fn texture_within_limit_keeps_its_size() {
        let payload = TexturePayload::new(png_bytes(16, 4), "image/png");
        let texture = decode_texture(&payload, 16).unwrap();
        assert_eq!((texture.width, texture.height), (16, 4));
        let texture = decode_texture(&payload, 0).unwrap();
        assert_eq!((texture.width, texture.height), (16, 4));
    }

    #[test]
    fn payload_debug_hides_bytes() {
        let payload = TexturePayload::new(vec![0u8; 16], "image/png");
        let text = format!("{payload:?}");
        assert!(text.contains("len: 16"));
    }
}

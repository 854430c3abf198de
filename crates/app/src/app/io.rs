use std::path::Path;

use rfd::FileDialog;

use solido_core::TexturePayload;

use crate::error::ViewerError;
use crate::host::HostMessage;

use super::SolidoApp;

const TEXTURE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// MIME type guessed from the file extension. Unknown extensions get an
/// empty type and are sniffed from the bytes at decode time.
pub(crate) fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "",
    }
}

pub(crate) fn load_texture_file(path: &Path) -> Result<TexturePayload, ViewerError> {
    let bytes = std::fs::read(path).map_err(|source| ViewerError::Texture {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!("texture {:?}: {} bytes", path, bytes.len());
    Ok(TexturePayload::new(bytes, mime_for_path(path)))
}

impl SolidoApp {
    pub(super) fn open_texture_dialog(&self) {
        let Some(path) = FileDialog::new()
            .add_filter("Image", &TEXTURE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        match load_texture_file(&path) {
            Ok(payload) => self.inbox.push(HostMessage::SetTexture(payload)),
            Err(err) => tracing::error!("{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for_path(Path::new("wood.PNG")), "image/png");
        assert_eq!(mime_for_path(Path::new("a/b/stone.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("noext")), "");
        assert!(TEXTURE_EXTENSIONS
            .iter()
            .all(|ext| !mime_for_path(&PathBuf::from(format!("x.{ext}"))).is_empty()));
    }

    #[test]
    fn texture_file_keeps_its_bytes() {
        let path = std::env::temp_dir().join(format!("solido_io_{}.png", std::process::id()));
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let payload = load_texture_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(payload.bytes(), &[1, 2, 3]);
        assert_eq!(payload.mime_type(), "image/png");
    }
}

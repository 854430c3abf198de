use std::path::PathBuf;

use solido_core::{SceneConfig, ShapeKind, ShapeSpec, ViewerSettings};

use crate::app::load_texture_file;
use crate::error::ViewerError;

pub(crate) const DEFAULT_HEADLESS_FRAMES: u64 = 1;

#[derive(Debug, Default)]
pub(crate) struct LaunchArgs {
    pub(crate) shape: Option<String>,
    pub(crate) texture: Option<PathBuf>,
    pub(crate) settings: Option<PathBuf>,
    pub(crate) headless: bool,
    pub(crate) frames: Option<u64>,
    pub(crate) help: bool,
}

impl LaunchArgs {
    pub(crate) fn parse(args: &[String]) -> Result<Self, ViewerError> {
        let mut parsed = LaunchArgs::default();
        let mut iter = args.iter().skip(1);

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--headless" | "-headless" => parsed.headless = true,
                "--shape" => parsed.shape = Some(required(&mut iter, "--shape", "a tag")?),
                "--texture" => {
                    parsed.texture = Some(PathBuf::from(required(&mut iter, "--texture", "a path")?))
                }
                "--settings" => {
                    parsed.settings =
                        Some(PathBuf::from(required(&mut iter, "--settings", "a path")?))
                }
                "--frames" => {
                    let value = required(&mut iter, "--frames", "a count")?;
                    let frames = value
                        .parse::<u64>()
                        .map_err(|_| ViewerError::Args(format!("invalid frame count {value}")))?;
                    parsed.frames = Some(frames);
                }
                "--help" | "-h" => parsed.help = true,
                other => tracing::debug!("ignoring argument {other}"),
            }
        }

        Ok(parsed)
    }

    pub(crate) fn frames(&self) -> u64 {
        self.frames.unwrap_or(DEFAULT_HEADLESS_FRAMES)
    }

    pub(crate) fn load_settings(&self) -> Result<ViewerSettings, ViewerError> {
        match &self.settings {
            Some(path) => {
                let settings = ViewerSettings::load(path)?;
                tracing::info!("settings loaded from {:?}", path);
                Ok(settings)
            }
            None => Ok(ViewerSettings::default()),
        }
    }

    /// A texture that cannot be read is an error here; one that cannot be
    /// decoded falls back to the normal material later on.
    pub(crate) fn scene_config(&self) -> Result<SceneConfig, ViewerError> {
        let shape = self
            .shape
            .as_deref()
            .map(ShapeSpec::parse)
            .unwrap_or_default();
        let texture = self
            .texture
            .as_deref()
            .map(load_texture_file)
            .transpose()?;
        Ok(SceneConfig::new(shape, texture))
    }
}

fn required<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
    what: &str,
) -> Result<String, ViewerError> {
    iter.next()
        .cloned()
        .ok_or_else(|| ViewerError::Args(format!("{flag} requires {what}")))
}

pub(crate) fn print_help() {
    let tags: Vec<&str> = ShapeKind::ALL.iter().map(|kind| kind.tag()).collect();
    println!(
        "Usage: solido [options]\n  --shape <tag>       one of: {}\n  --texture <path>    png or jpeg image mapped onto the solid\n  --settings <path>   viewer settings JSON\n  --headless          build the scene without a window and print a report\n  --frames <n>        frames to run in headless mode (default {DEFAULT_HEADLESS_FRAMES})",
        tags.join(", ")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("solido")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn parses_every_flag() {
        let parsed = LaunchArgs::parse(&args(&[
            "--shape",
            "sphere",
            "--texture",
            "wood.png",
            "--settings",
            "viewer.json",
            "--headless",
            "--frames",
            "12",
        ]))
        .unwrap();
        assert_eq!(parsed.shape.as_deref(), Some("sphere"));
        assert_eq!(parsed.texture, Some(PathBuf::from("wood.png")));
        assert_eq!(parsed.settings, Some(PathBuf::from("viewer.json")));
        assert!(parsed.headless);
        assert_eq!(parsed.frames(), 12);
    }

    #[test]
    fn missing_values_are_errors() {
        assert!(matches!(
            LaunchArgs::parse(&args(&["--shape"])),
            Err(ViewerError::Args(_))
        ));
        assert!(matches!(
            LaunchArgs::parse(&args(&["--frames", "many"])),
            Err(ViewerError::Args(_))
        ));
    }

    #[test]
    fn defaults_to_a_cube_without_texture() {
        let parsed = LaunchArgs::parse(&args(&[])).unwrap();
        assert!(!parsed.headless);
        assert_eq!(parsed.frames(), DEFAULT_HEADLESS_FRAMES);
        let config = parsed.scene_config().unwrap();
        assert_eq!(config.shape, ShapeSpec::default());
        assert!(config.texture.is_none());
    }

    #[test]
    fn unknown_shape_tags_pass_through() {
        let parsed = LaunchArgs::parse(&args(&["--shape", "torus"])).unwrap();
        let config = parsed.scene_config().unwrap();
        assert!(!config.shape.is_recognized());
    }

    #[test]
    fn unreadable_texture_is_reported() {
        let parsed =
            LaunchArgs::parse(&args(&["--texture", "/nonexistent/solido/texture.png"])).unwrap();
        assert!(matches!(
            parsed.scene_config(),
            Err(ViewerError::Texture { .. })
        ));
    }
}

use solido_core::{FrameLoop, SceneReport};

use crate::args::LaunchArgs;
use crate::error::ViewerError;

const HEADLESS_WIDTH: u32 = 800;

/// Runs the scene without a window when `--headless` is given. Returns
/// false when the caller should start the interactive viewer instead.
pub fn maybe_run_headless(args: &LaunchArgs) -> Result<bool, ViewerError> {
    if !args.headless {
        return Ok(false);
    }

    let report = run_frames(args)?;
    let json = report
        .to_json()
        .map_err(|err| ViewerError::Args(format!("report serialization failed: {err}")))?;
    println!("{json}");

    tracing::info!("headless: completed after {} frames", report.frames);
    Ok(true)
}

fn run_frames(args: &LaunchArgs) -> Result<SceneReport, ViewerError> {
    let settings = args.load_settings()?;
    let config = args.scene_config()?;
    let width = HEADLESS_WIDTH;
    let height = settings.surface_height.max(1.0) as u32;

    let mut frame_loop = FrameLoop::new(settings);
    frame_loop.initialize(config, [width, height]);
    for _ in 0..args.frames() {
        frame_loop.tick();
    }

    let report = SceneReport::from_loop(&frame_loop)
        .ok_or_else(|| ViewerError::Args("headless: scene was not assembled".to_string()))?;
    let released = frame_loop.stop();
    tracing::debug!("headless: released {} resources", released.len());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch(list: &[&str]) -> LaunchArgs {
        let args: Vec<String> = std::iter::once("solido")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect();
        LaunchArgs::parse(&args).unwrap()
    }

    #[test]
    fn interactive_launch_is_not_headless() {
        assert!(!maybe_run_headless(&launch(&["--shape", "cube"])).unwrap());
    }

    #[test]
    fn report_reflects_frames_and_shape() {
        let report = run_frames(&launch(&["--headless", "--shape", "sphere", "--frames", "10"]))
            .unwrap();
        assert_eq!(report.shape, "sphere");
        assert!(report.recognized);
        assert_eq!(report.frames, 10);
        assert!((report.rotation[0] - 0.05).abs() < 1e-5);
        assert!((report.rotation[1] - 0.05).abs() < 1e-5);
        assert_eq!(report.rotation[2], 0.0);
        assert_eq!(report.surface_size, [800, 600]);
    }

    #[test]
    fn unknown_shape_reports_the_fallback_box() {
        let report = run_frames(&launch(&["--headless", "--shape", "torus"])).unwrap();
        assert!(!report.recognized);
        assert_eq!(report.bounds_size, [2.0, 2.0, 2.0]);
        assert_eq!(report.lights, vec!["ambient"]);
    }
}

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use crate::assets::ExerciseAssets;
use crate::exercise::Exercise;
use crate::render::{CameraParams, LightParams};
use crate::scene::SceneConfig;

/// Longest step fed to the controls, so a stalled frame doesn't teleport the model.
const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

/// Measures the time between consecutive frames.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { last: start }
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        elapsed.min(MAX_FRAME_STEP).as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

pub fn camera_params(config: &SceneConfig, aspect: f32) -> CameraParams {
    CameraParams {
        view: config.camera.view(),
        projection: config.projection.matrix(aspect),
        sky_view: config.camera.skybox_view(),
        position: config.camera.position,
    }
}

pub fn light_params(config: &SceneConfig) -> Option<LightParams> {
    config.light.map(|light| LightParams {
        position: light.position,
        color: light.color,
        ambient_color: light.ambient_color,
        ambient_strength: light.ambient_strength,
        specular_strength: light.specular_strength,
        specular_phong: light.specular_phong,
    })
}

/// Human readable description of a loaded exercise.
pub fn summary(exercise: Exercise, config: &SceneConfig, assets: &ExerciseAssets) -> String {
    let mut out = String::new();
    let mesh = &assets.mesh;
    let _ = writeln!(out, "Exercise: {exercise}");
    let _ = writeln!(
        out,
        "Window: \"{}\" {}x{}",
        config.window.title, config.window.width, config.window.height
    );
    let _ = writeln!(
        out,
        "Mesh: {} vertices, {} triangles, {} floats per vertex",
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.layout.floats_per_vertex()
    );
    if let Some(texture) = &assets.texture {
        let _ = writeln!(out, "Texture: {}x{}", texture.width, texture.height);
    }
    if let Some(normal) = &assets.normal_map {
        let _ = writeln!(out, "Normal map: {}x{}", normal.width, normal.height);
    }
    if let Some(skybox) = &assets.skybox {
        let _ = writeln!(out, "Skybox: {} faces of {}px", skybox.faces.len(), skybox.size);
    }
    let translation = config.transform.matrix().w_axis;
    let _ = writeln!(
        out,
        "Model position: ({:.2}, {:.2}, {:.2})",
        translation.x, translation.y, translation.z
    );
    out
}

pub fn print_summary(exercise: Exercise, config: &SceneConfig, assets: &ExerciseAssets) {
    print!("{}", summary(exercise, config, assets));
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::path::Path;

    #[test]
    fn frame_clock_reports_elapsed_seconds() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let dt = clock.tick_at(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);
        assert_eq!(clock.tick_at(start + Duration::from_millis(16)), 0.0);
    }

    #[test]
    fn frame_clock_caps_long_frames() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        assert_eq!(clock.tick_at(start + Duration::from_secs(3)), 0.1);
    }

    #[test]
    fn aspect_ratio_is_width_over_height() {
        assert_eq!(aspect_ratio(800, 400), 2.0);
        assert_eq!(aspect_ratio(800, 0), 1.0);
    }

    #[test]
    fn camera_params_follow_config() {
        let config = Exercise::Textured.preset();
        let camera = camera_params(&config, 1.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(camera.view, config.camera.view());
        assert_eq!(camera.sky_view.w_axis.truncate(), Vec3::ZERO);
        assert!(light_params(&config).is_some());
        assert!(light_params(&Exercise::Pentagon.preset()).is_none());
    }

    #[test]
    fn summary_describes_the_pentagon() {
        let config = Exercise::Pentagon.preset();
        let assets = ExerciseAssets::load(&config, Path::new(".")).unwrap();
        let text = summary(Exercise::Pentagon, &config, &assets);
        assert!(text.contains("Exercise: pentagon"));
        assert!(text.contains("Window: \"Pentagon\" 640x640"));
        assert!(text.contains("Mesh: 5 vertices, 3 triangles, 3 floats per vertex"));
        assert!(text.contains("Model position: (0.00, 0.00, 0.00)"));
        assert!(!text.contains("Texture"));
    }
}

use std::any::Any;
use std::env;
use std::fmt;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use pollster::block_on;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyboardInput, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::WindowBuilder;

use render_labs::app::{aspect_ratio, camera_params, light_params, print_summary, FrameClock};
use render_labs::{
    Exercise, ExerciseAssets, InputState, KeyCode, ModelTransform, NamedKey, Renderer, SceneConfig,
};

const USAGE: &str =
    "Usage: render-labs <pentagon|bunny|textured|normal-mapped> [--scene <file.xml>] [--assets <dir>] [--summary-only]";

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse(env::args().skip(1))?;
    let mut config = options.exercise.preset();
    if let Some(path) = &options.scene {
        let xml = fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        config
            .apply_xml(&xml)
            .with_context(|| format!("failed to apply scene {}", path.display()))?;
    }
    config.validate()?;

    let assets = ExerciseAssets::load(&config, &options.assets)
        .with_context(|| format!("failed to load assets for {}", options.exercise))?;
    info!("assets loaded from {}", options.assets.display());

    if options.summary_only {
        print_summary(options.exercise, &config, &assets);
        return Ok(());
    }

    match run_interactive(&config, &assets) {
        Ok(()) => Ok(()),
        Err(err) if err.downcast_ref::<WindowInitError>().is_some() => {
            eprintln!(
                "{err}. Falling back to --summary-only mode (set DISPLAY or install X11 libs to enable rendering)."
            );
            print_summary(options.exercise, &config, &assets);
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn run_interactive(config: &SceneConfig, assets: &ExerciseAssets) -> Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let mut event_loop =
        event_loop.map_err(|panic| WindowInitError::from_panic("event loop", panic))?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(LogicalSize::new(
                config.window.width as f64,
                config.window.height as f64,
            ))
            .build(&event_loop)
            .map_err(|err| WindowInitError::from_error("window", err))?,
    );

    let renderer = block_on(Renderer::new(Arc::clone(&window), config, assets))?;
    let mut app = AppState {
        renderer,
        transform: config.transform,
        config: config.clone(),
        input: InputState::new(),
        clock: FrameClock::new(),
        last_error: None,
    };

    event_loop.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        if let Err(err) = app.process_event(&event, control_flow) {
            app.last_error = Some(err);
            control_flow.set_exit();
        }
    });

    let position = app.transform.translation;
    println!(
        "Final model position: ({:.2}, {:.2}, {:.2})",
        position.x, position.y, position.z
    );

    match app.last_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct AppState {
    renderer: Renderer,
    config: SceneConfig,
    transform: ModelTransform,
    input: InputState,
    clock: FrameClock,
    last_error: Option<anyhow::Error>,
}

impl AppState {
    fn process_event(&mut self, event: &Event<()>, control_flow: &mut ControlFlow) -> Result<()> {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.renderer.window_id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        control_flow.set_exit();
                    }
                    WindowEvent::Resized(size) => {
                        self.renderer.resize(*size);
                    }
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        self.renderer.resize(**new_inner_size);
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        if self.handle_keyboard(input) == Some(KeyCode::Named(NamedKey::Escape)) {
                            control_flow.set_exit();
                        }
                    }
                    _ => {}
                }
            }
            Event::RedrawRequested(window_id) if *window_id == self.renderer.window_id() => {
                self.draw_frame()?;
            }
            Event::MainEventsCleared => {
                self.renderer.window().request_redraw();
            }
            _ => {}
        }
        Ok(())
    }

    fn draw_frame(&mut self) -> Result<()> {
        let dt = self.clock.tick();
        let velocity = self.input.velocity(&self.config.controls);
        self.transform.advance(&velocity, dt);

        let size = self.renderer.size();
        let camera = camera_params(&self.config, aspect_ratio(size.width, size.height));
        let light = light_params(&self.config);
        self.renderer.update_globals(&camera, light.as_ref());
        self.renderer
            .update_object(self.transform.matrix(), self.config.color);

        if let Err(err) = self.renderer.render() {
            match err {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    let size = self.renderer.window().inner_size();
                    self.renderer.resize(size);
                }
                wgpu::SurfaceError::OutOfMemory => {
                    return Err(anyhow!("GPU is out of memory"));
                }
                wgpu::SurfaceError::Timeout => {
                    warn!("surface timeout; retrying next frame");
                }
            }
        }
        Ok(())
    }

    /// Records the key transition and returns the key when it was pressed.
    fn handle_keyboard(&self, input: &KeyboardInput) -> Option<KeyCode> {
        let keycode = input.virtual_keycode.and_then(map_keycode)?;
        match input.state {
            ElementState::Pressed => {
                self.input.set_key_down(keycode);
                Some(keycode)
            }
            ElementState::Released => {
                self.input.set_key_up(keycode);
                None
            }
        }
    }
}

#[derive(Debug)]
struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

fn map_keycode(code: winit::event::VirtualKeyCode) -> Option<KeyCode> {
    use winit::event::VirtualKeyCode as Key;
    Some(match code {
        Key::Left => KeyCode::Named(NamedKey::Left),
        Key::Right => KeyCode::Named(NamedKey::Right),
        Key::Up => KeyCode::Named(NamedKey::Up),
        Key::Down => KeyCode::Named(NamedKey::Down),
        Key::Escape => KeyCode::Named(NamedKey::Escape),
        Key::A => KeyCode::Character('A'),
        Key::D => KeyCode::Character('D'),
        Key::E => KeyCode::Character('E'),
        Key::Q => KeyCode::Character('Q'),
        Key::S => KeyCode::Character('S'),
        Key::W => KeyCode::Character('W'),
        Key::X => KeyCode::Character('X'),
        Key::Z => KeyCode::Character('Z'),
        _ => return None,
    })
}

struct CliOptions {
    exercise: Exercise,
    scene: Option<PathBuf>,
    assets: PathBuf,
    summary_only: bool,
}

impl CliOptions {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = args.into_iter();
        let Some(name) = args.next() else {
            return Err(anyhow!(USAGE));
        };
        let exercise: Exercise = name.parse()?;
        let mut scene = None;
        let mut assets = PathBuf::from(".");
        let mut summary_only = false;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--scene" => {
                    let path = args.next().context("--scene expects a file path")?;
                    scene = Some(PathBuf::from(path));
                }
                "--assets" => {
                    let path = args.next().context("--assets expects a directory")?;
                    assets = PathBuf::from(path);
                }
                "--summary-only" => summary_only = true,
                other => {
                    return Err(anyhow!("Unknown argument: {other}. {USAGE}"));
                }
            }
        }
        Ok(Self {
            exercise,
            scene,
            assets,
            summary_only,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliOptions> {
        CliOptions::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn parses_all_flags() {
        let options = parse(&[
            "textured",
            "--scene",
            "sword.xml",
            "--assets",
            "course",
            "--summary-only",
        ])
        .unwrap();
        assert_eq!(options.exercise, Exercise::Textured);
        assert_eq!(options.scene, Some(PathBuf::from("sword.xml")));
        assert_eq!(options.assets, PathBuf::from("course"));
        assert!(options.summary_only);
    }

    #[test]
    fn defaults_to_current_directory() {
        let options = parse(&["pentagon"]).unwrap();
        assert_eq!(options.assets, PathBuf::from("."));
        assert!(options.scene.is_none());
        assert!(!options.summary_only);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["pentagon", "--scene"]).is_err());
        assert!(parse(&["pentagon", "--fullscreen"]).is_err());
    }

    #[test]
    fn maps_control_keys() {
        use winit::event::VirtualKeyCode as Key;
        assert_eq!(map_keycode(Key::W), Some(KeyCode::Character('W')));
        assert_eq!(
            map_keycode(Key::Escape),
            Some(KeyCode::Named(NamedKey::Escape))
        );
        assert_eq!(map_keycode(Key::F1), None);
    }
}

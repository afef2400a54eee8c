use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use raylib::prelude::*;

use slidedeck::constants::*;
use slidedeck::fullscreen::Fullscreen;
use slidedeck::input::{Key, Point};
use slidedeck::logging;
use slidedeck::prompt::GoToPrompt;
use slidedeck::stage::{Control, Hit, Stage, WindowMode};
use slidedeck::texture_loader::{load_all, load_sorted_image_paths, load_texture_with_exif_rotation};
use slidedeck::{Deck, PresentationController, Profile};

const CLICK_SLOP: f32 = 10.0; // Pointer travel still treated as a click

/// Present a directory of images as slides.
#[derive(Parser, Debug)]
#[command(name = "slidedeck", version)]
struct Cli {
    /// Directory containing the slide images, shown in file name order
    dir: PathBuf,

    /// Transition profile: modern or classic
    #[arg(long, default_value = "modern")]
    profile: String,

    /// TOML file overriding profile settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start in a window instead of fullscreen
    #[arg(long)]
    windowed: bool,

    /// Log navigation details
    #[arg(short, long)]
    verbose: bool,
}

fn key_from_raylib(key: KeyboardKey) -> Key {
    match key {
        KeyboardKey::KEY_LEFT => Key::Left,
        KeyboardKey::KEY_RIGHT => Key::Right,
        KeyboardKey::KEY_UP => Key::Up,
        KeyboardKey::KEY_DOWN => Key::Down,
        KeyboardKey::KEY_PAGE_UP => Key::PageUp,
        KeyboardKey::KEY_PAGE_DOWN => Key::PageDown,
        KeyboardKey::KEY_SPACE => Key::Space,
        KeyboardKey::KEY_ENTER | KeyboardKey::KEY_KP_ENTER => Key::Enter,
        KeyboardKey::KEY_HOME => Key::Home,
        KeyboardKey::KEY_END => Key::End,
        KeyboardKey::KEY_ESCAPE => Key::Escape,
        KeyboardKey::KEY_BACKSPACE => Key::Backspace,
        _ => Key::Other,
    }
}

fn point(v: Vector2) -> Point {
    Point::new(v.x, v.y)
}

fn log_controls() {
    tracing::info!("controls:");
    tracing::info!("  Right / Down / Space / Enter / Page Down: next slide");
    tracing::info!("  Left / Up / Page Up: previous slide");
    tracing::info!("  Home / End: first / last slide");
    tracing::info!("  G then a number and Enter: go to slide");
    tracing::info!("  F / F11 / fullscreen button: toggle fullscreen, Escape: exit fullscreen");
    tracing::info!("  click left or right half, or swipe, to navigate");
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let profile = match &cli.config {
        Some(path) => Profile::load(path, &cli.profile),
        None => Profile::by_name(&cli.profile),
    }
    .context("invalid presentation profile")?;

    let image_paths = load_sorted_image_paths(&cli.dir)?;
    tracing::info!(
        dir = %cli.dir.display(),
        slides = image_paths.len(),
        profile = %profile.name,
        "opening presentation"
    );

    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
        .title("Slide Deck")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    // Escape belongs to the presentation, not to raylib's quit shortcut
    rl.set_exit_key(None);

    // --- Load slides; images that fail to load are skipped ---
    let textures = load_all(&image_paths, |path| {
        load_texture_with_exif_rotation(&mut rl, &thread, path)
    });
    if textures.is_empty() {
        bail!("no slides could be loaded from {}", cli.dir.display());
    }

    let mut deck = Deck::new(textures.len())?;
    let mut controller = PresentationController::new(profile.clone(), &mut deck)?;

    let mut window_mode = WindowMode::default();
    let mut fullscreen = Fullscreen::detect(&window_mode.backend(&mut rl));
    if !cli.windowed {
        fullscreen.enter(&mut window_mode.backend(&mut rl));
    }

    let screen = (rl.get_screen_width() as f32, rl.get_screen_height() as f32);
    let mut stage = Stage::new(textures, &profile, &deck, screen.0, screen.1);

    log_controls();

    let mut prompt = GoToPrompt::default();
    let mut press_at: Option<Vector2> = None;

    // --- Main loop ---
    while !rl.window_should_close() {
        let dt = rl.get_frame_time();

        controller.handle_visibility(rl.is_window_minimized() || rl.is_window_hidden());
        if rl.is_window_resized() {
            controller.handle_resize();
        }

        // Keyboard: an open prompt takes its editing keys, everything else reaches the
        // controller, where text-entry suppression applies
        while let Some(raw) = rl.get_key_pressed() {
            let key = key_from_raylib(raw);
            if prompt.handle_key(key, &mut controller, &mut deck) {
                continue;
            }
            controller.handle_key(key, &mut deck, &fullscreen, &mut window_mode.backend(&mut rl));
            if prompt.is_open() {
                continue;
            }

            match raw {
                KeyboardKey::KEY_G => prompt.open(&mut deck),
                KeyboardKey::KEY_F | KeyboardKey::KEY_F11 => {
                    fullscreen.toggle(&mut window_mode.backend(&mut rl));
                }
                _ => {}
            }
        }
        while let Some(c) = rl.get_char_pressed() {
            prompt.push(c);
        }

        // Pointer and touch: a long horizontal drag is a swipe, a short one a click
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            let at = rl.get_mouse_position();
            controller.touch_start(point(at));
            press_at = Some(at);
        }
        if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
            let at = rl.get_mouse_position();
            let swiped = controller.touch_end(point(at), &mut deck).is_some();
            let travel = press_at.take().map_or(f32::MAX, |start| start.distance_to(at));
            if !swiped && travel < CLICK_SLOP {
                match stage.hit_test(at.x, at.y) {
                    Hit::Control(Control::Previous) => controller.previous_slide(&mut deck),
                    Hit::Control(Control::Next) => controller.next_slide(&mut deck),
                    Hit::Control(Control::Fullscreen) => {
                        fullscreen.toggle(&mut window_mode.backend(&mut rl))
                    }
                    Hit::Zone(zone) => controller.handle_click_zone(zone, &mut deck),
                }
            }
        }

        controller.tick(Duration::from_secs_f32(dt), &mut deck);
        fullscreen.sync(&window_mode.backend(&mut rl), &mut deck);

        let (sw, sh) = (rl.get_screen_width() as f32, rl.get_screen_height() as f32);
        stage.update(dt, &deck, sw, sh);

        let mut d = rl.begin_drawing(&thread);
        stage.draw(&mut d, &deck, prompt.text());
    }

    tracing::info!(
        slide = controller.current_slide(),
        total = controller.total_slides(),
        "presentation closed"
    );
    Ok(())
}

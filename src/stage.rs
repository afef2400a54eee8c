//! raylib rendering of a [`Deck`].
//!
//! The deck only says where each slide should be (its classes and inline
//! overrides). The stage eases the drawn offset and opacity toward those
//! targets over the profile's transition duration, the way a browser runs CSS
//! transitions, and plays each slide's content entry animation.

use raylib::ease::{self, Tween};
use raylib::prelude::*;

use crate::constants::*;
use crate::deck::{Deck, FullscreenIcon, SlideStyle, Surface};
use crate::error::FullscreenError;
use crate::fullscreen::{Capability, FullscreenBackend};
use crate::input::Zone;
use crate::profile::Profile;

const BAR_HEIGHT: f32 = 6.0;
const BUTTON_W: f32 = 48.0;
const BUTTON_H: f32 = 40.0;
const COUNTER_FONT: i32 = 24;
const ACCENT: Color = Color { r: 96, g: 165, b: 250, a: 255 };
const MUTED: Color = Color { r: 255, g: 255, b: 255, a: 60 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Previous,
    Next,
    Fullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Control(Control),
    Zone(Zone),
}

/// Offset and opacity a slide settles at when it has no inline overrides.
pub fn resting_targets(style: &SlideStyle, distance: f32) -> (f32, f32) {
    let offset = style.offset.unwrap_or(if style.active {
        0.0
    } else if style.previous {
        -distance
    } else {
        distance
    });
    let opacity = style.opacity.unwrap_or(if style.active { 1.0 } else { 0.0 });
    (offset, opacity)
}

/// Largest rectangle with the texture's aspect ratio that fits the screen, centered.
pub fn fit_rect(
    tex_width: f32,
    tex_height: f32,
    screen_width: f32,
    screen_height: f32,
) -> Rectangle {
    let scale =
        (screen_width * SLIDE_FILL / tex_width).min(screen_height * SLIDE_FILL / tex_height);
    let w = tex_width * scale;
    let h = tex_height * scale;
    Rectangle::new((screen_width - w) * 0.5, (screen_height - h) * 0.5, w, h)
}

fn control_rects(screen_width: f32, screen_height: f32) -> [(Control, Rectangle); 3] {
    let y = screen_height - BUTTON_H - 24.0;
    [
        (Control::Previous, Rectangle::new(screen_width * 0.5 - 140.0, y, BUTTON_W, BUTTON_H)),
        (Control::Next, Rectangle::new(screen_width * 0.5 + 92.0, y, BUTTON_W, BUTTON_H)),
        (
            Control::Fullscreen,
            Rectangle::new(screen_width - BUTTON_W - 16.0, 16.0, BUTTON_W, BUTTON_H),
        ),
    ]
}

fn contains(rec: &Rectangle, x: f32, y: f32) -> bool {
    x >= rec.x && x <= rec.x + rec.width && y >= rec.y && y <= rec.y + rec.height
}

/// Buttons take precedence; everything else falls into the left or right zone.
pub fn hit_test(x: f32, y: f32, screen_width: f32, screen_height: f32) -> Hit {
    control_rects(screen_width, screen_height)
        .iter()
        .find(|(_, rec)| contains(rec, x, y))
        .map(|(control, _)| Hit::Control(*control))
        .unwrap_or_else(|| Hit::Zone(Zone::at(x, screen_width)))
}

fn white(alpha: f32) -> Color {
    Color::new(255, 255, 255, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

struct Motion {
    tween: Tween,
    target: f32,
    value: f32,
    elapsed: f32,
    duration: f32,
}

impl Motion {
    fn at_rest(value: f32) -> Self {
        Self {
            tween: Tween::new(ease::linear_none, value, value, 0.0),
            target: value,
            value,
            elapsed: 0.0,
            duration: 0.0,
        }
    }

    fn retarget(&mut self, target: f32, duration: f32) {
        if target == self.target {
            return;
        }
        self.tween = Tween::new(ease::cubic_out, self.value, target, duration);
        self.target = target;
        self.elapsed = 0.0;
        self.duration = duration;
    }

    fn update(&mut self, dt: f32) {
        if self.value == self.target {
            return;
        }
        self.elapsed += dt;
        self.value = if self.elapsed >= self.duration {
            self.target
        } else {
            self.tween.apply(dt)
        };
    }
}

struct SlideView {
    texture: Texture2D,
    fit: Rectangle,
    offset: Motion,
    opacity: Motion,
    animation_generation: u32,
    entry_timer: f32,
}

impl SlideView {
    // (scale, alpha) of the content entry animation
    fn entry(&self) -> (f32, f32) {
        let t = (self.entry_timer / ENTRY_ANIMATION_DURATION).min(1.0);
        let eased = ease::cubic_out(t, 0.0, 1.0, 1.0);
        (ENTRY_ANIMATION_SCALE + (1.0 - ENTRY_ANIMATION_SCALE) * eased, eased)
    }
}

pub struct Stage {
    slides: Vec<Option<SlideView>>,
    distance: f32,
    transition: f32,
    show_progress: bool,
    layout_generation: u32,
    screen_width: f32,
    screen_height: f32,
}

impl Stage {
    pub fn new(
        textures: Vec<Texture2D>,
        profile: &Profile,
        deck: &Deck,
        screen_width: f32,
        screen_height: f32,
    ) -> Self {
        let slides = textures
            .into_iter()
            .enumerate()
            .map(|(i, texture)| {
                let style = deck.slide(i + 1)?;
                let (offset, opacity) = resting_targets(style, profile.offset);
                let fit = fit_rect(
                    texture.width() as f32,
                    texture.height() as f32,
                    screen_width,
                    screen_height,
                );
                Some(SlideView {
                    texture,
                    fit,
                    offset: Motion::at_rest(offset),
                    opacity: Motion::at_rest(opacity),
                    animation_generation: style.animation_generation(),
                    entry_timer: 0.0,
                })
            })
            .collect();

        Self {
            slides,
            distance: profile.offset,
            transition: profile.transition.as_secs_f32(),
            show_progress: profile.progress_bar,
            layout_generation: deck.layout_generation(),
            screen_width,
            screen_height,
        }
    }

    fn relayout(&mut self) {
        for view in self.slides.iter_mut().flatten() {
            view.fit = fit_rect(
                view.texture.width() as f32,
                view.texture.height() as f32,
                self.screen_width,
                self.screen_height,
            );
        }
    }

    /// Follows the deck's current targets and advances every running animation by `dt` seconds.
    /// Slide layout only follows the screen size when the deck reflows.
    pub fn update(&mut self, dt: f32, deck: &Deck, screen_width: f32, screen_height: f32) {
        self.screen_width = screen_width;
        self.screen_height = screen_height;
        if self.layout_generation != deck.layout_generation() {
            self.layout_generation = deck.layout_generation();
            tracing::debug!(screen_width, screen_height, "recomputing slide layout");
            self.relayout();
        }

        for (i, slot) in self.slides.iter_mut().enumerate() {
            let (Some(view), Some(style)) = (slot.as_mut(), deck.slide(i + 1)) else {
                continue;
            };
            let (offset, opacity) = resting_targets(style, self.distance);
            view.offset.retarget(offset, self.transition);
            view.opacity.retarget(opacity, self.transition);
            view.offset.update(dt);
            view.opacity.update(dt);

            if view.animation_generation != style.animation_generation() {
                view.animation_generation = style.animation_generation();
                view.entry_timer = 0.0;
            } else {
                view.entry_timer += dt;
            }
        }
    }

    pub fn hit_test(&self, x: f32, y: f32) -> Hit {
        hit_test(x, y, self.screen_width, self.screen_height)
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle, deck: &Deck, prompt: Option<&str>) {
        d.clear_background(Color::BLACK);

        // Logical offsets are laid out against the render width
        let unit = self.screen_width / RENDER_WIDTH as f32;

        for (i, slot) in self.slides.iter().enumerate() {
            let (Some(view), Some(style)) = (slot.as_ref(), deck.slide(i + 1)) else {
                continue;
            };
            if style.hidden || view.opacity.value <= 0.001 {
                continue;
            }

            let (entry_scale, entry_alpha) = view.entry();
            let w = view.fit.width * entry_scale;
            let h = view.fit.height * entry_scale;
            let center_x = view.fit.x + view.fit.width * 0.5 + view.offset.value * unit;
            let center_y = view.fit.y + view.fit.height * 0.5;

            d.draw_texture_pro(
                &view.texture,
                Rectangle::new(0.0, 0.0, view.texture.width() as f32, view.texture.height() as f32),
                Rectangle::new(center_x, center_y, w, h),
                Vector2::new(w * 0.5, h * 0.5),
                0.0,
                white(view.opacity.value * entry_alpha),
            );
        }

        self.draw_status(d, deck);

        if let Some(text) = prompt {
            self.draw_prompt(d, text);
        }
    }

    fn draw_status(&self, d: &mut RaylibDrawHandle, deck: &Deck) {
        if self.show_progress {
            if let Some(progress) = deck.progress() {
                let track = Rectangle::new(0.0, 0.0, self.screen_width, BAR_HEIGHT);
                d.draw_rectangle_rec(track, MUTED);
                let width = self.screen_width * progress.width / 100.0;
                d.draw_rectangle_rec(Rectangle::new(0.0, 0.0, width, BAR_HEIGHT), ACCENT);
            }
        }

        for (control, rec) in control_rects(self.screen_width, self.screen_height) {
            match control {
                Control::Previous => draw_button_text(d, &rec, "<"),
                Control::Next => draw_button_text(d, &rec, ">"),
                Control::Fullscreen => {
                    if let Some(button) = deck.fullscreen_button() {
                        draw_fullscreen_icon(d, &rec, button.icon);
                    }
                }
            }
        }

        if let Some(counter) = deck.counter() {
            let text = format!("{} / {}", counter.current, counter.total);
            let width = raylib::core::text::measure_text(&text, COUNTER_FONT);
            let y = self.screen_height - BUTTON_H - 24.0 + (BUTTON_H - COUNTER_FONT as f32) * 0.5;
            d.draw_text(
                &text,
                (self.screen_width * 0.5) as i32 - width / 2,
                y as i32,
                COUNTER_FONT,
                Color::WHITE,
            );
        }
    }

    fn draw_prompt(&self, d: &mut RaylibDrawHandle, text: &str) {
        let label = format!("Go to slide: {text}_");
        let font = 32;
        let width = raylib::core::text::measure_text(&label, font);
        let x = (self.screen_width * 0.5) as i32 - width / 2;
        let y = (self.screen_height * 0.5) as i32 - font / 2;
        d.draw_rectangle(x - 24, y - 16, width + 48, font + 32, Color::new(0, 0, 0, 200));
        d.draw_rectangle_lines(x - 24, y - 16, width + 48, font + 32, ACCENT);
        d.draw_text(&label, x, y, font, Color::WHITE);
    }
}

fn draw_button_text(d: &mut RaylibDrawHandle, rec: &Rectangle, glyph: &str) {
    d.draw_rectangle_lines(rec.x as i32, rec.y as i32, rec.width as i32, rec.height as i32, MUTED);
    let width = raylib::core::text::measure_text(glyph, COUNTER_FONT);
    d.draw_text(
        glyph,
        (rec.x + rec.width * 0.5) as i32 - width / 2,
        (rec.y + (rec.height - COUNTER_FONT as f32) * 0.5) as i32,
        COUNTER_FONT,
        Color::WHITE,
    );
}

// Four corner brackets: pointing outward to expand, inward to collapse
fn draw_fullscreen_icon(d: &mut RaylibDrawHandle, rec: &Rectangle, icon: FullscreenIcon) {
    let size = 20.0;
    let arm = 6.0;
    let left = rec.x + (rec.width - size) * 0.5;
    let top = rec.y + (rec.height - size) * 0.5;
    let corners = [
        (left, top, 1.0, 1.0),
        (left + size, top, -1.0, 1.0),
        (left, top + size, 1.0, -1.0),
        (left + size, top + size, -1.0, -1.0),
    ];
    for (x, y, sx, sy) in corners {
        let (cx, cy) = match icon {
            FullscreenIcon::Expand => (x, y),
            FullscreenIcon::Collapse => (x + sx * arm, y + sy * arm),
        };
        let (hx, vy) = match icon {
            FullscreenIcon::Expand => (cx + sx * arm, cy + sy * arm),
            FullscreenIcon::Collapse => (cx - sx * arm, cy - sy * arm),
        };
        d.draw_line_v(Vector2::new(cx, cy), Vector2::new(hx, cy), Color::WHITE);
        d.draw_line_v(Vector2::new(cx, cy), Vector2::new(cx, vy), Color::WHITE);
    }
}

/// Tracks the borderless window mode, which raylib toggles but does not report.
#[derive(Debug, Default)]
pub struct WindowMode {
    borderless: bool,
}

impl WindowMode {
    pub fn backend<'a>(&'a mut self, rl: &'a mut RaylibHandle) -> RaylibFullscreen<'a> {
        RaylibFullscreen { rl, mode: self }
    }
}

pub struct RaylibFullscreen<'a> {
    rl: &'a mut RaylibHandle,
    mode: &'a mut WindowMode,
}

impl FullscreenBackend for RaylibFullscreen<'_> {
    fn supports(&self, capability: Capability) -> bool {
        let monitors = raylib::core::window::get_monitor_count();
        match capability {
            Capability::Borderless | Capability::Exclusive => monitors > 0,
            Capability::Unsupported => false,
        }
    }

    fn is_active(&self, capability: Capability) -> bool {
        match capability {
            Capability::Borderless => self.mode.borderless,
            Capability::Exclusive => self.rl.is_window_fullscreen(),
            Capability::Unsupported => false,
        }
    }

    fn set_active(&mut self, capability: Capability, active: bool) -> Result<(), FullscreenError> {
        match capability {
            Capability::Borderless => {
                self.rl.toggle_borderless_windowed();
                self.mode.borderless = active;
            }
            Capability::Exclusive => {
                self.rl.toggle_fullscreen();
                if self.rl.is_window_fullscreen() != active {
                    return Err(FullscreenError::Rejected("window manager refused".into()));
                }
            }
            Capability::Unsupported => return Err(FullscreenError::Unsupported),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resting_targets_follow_classes() {
        let mut style = SlideStyle::default();
        assert_eq!(resting_targets(&style, 30.0), (30.0, 0.0));
        style.previous = true;
        assert_eq!(resting_targets(&style, 30.0), (-30.0, 0.0));
        style.active = true;
        assert_eq!(resting_targets(&style, 30.0), (0.0, 1.0));
    }

    #[test]
    fn inline_overrides_win_over_classes() {
        let style = SlideStyle {
            active: true,
            offset: Some(-30.0),
            opacity: Some(0.0),
            ..Default::default()
        };
        assert_eq!(resting_targets(&style, 30.0), (-30.0, 0.0));
    }

    #[test]
    fn fit_rect_letterboxes_wide_images() {
        let rec = fit_rect(4000.0, 1000.0, 1920.0, 1080.0);
        assert!((rec.width - 1728.0).abs() < 0.01);
        assert!((rec.height - 432.0).abs() < 0.01);
        assert!((rec.x - 96.0).abs() < 0.01);
        assert!((rec.y - 324.0).abs() < 0.01);
    }

    #[test]
    fn buttons_take_precedence_over_zones() {
        assert_eq!(hit_test(1880.0, 30.0, 1920.0, 1080.0), Hit::Control(Control::Fullscreen));
        assert_eq!(hit_test(840.0, 1030.0, 1920.0, 1080.0), Hit::Control(Control::Previous));
        assert_eq!(hit_test(1072.0, 1030.0, 1920.0, 1080.0), Hit::Control(Control::Next));
        assert_eq!(hit_test(200.0, 500.0, 1920.0, 1080.0), Hit::Zone(Zone::Left));
        assert_eq!(hit_test(1500.0, 500.0, 1920.0, 1080.0), Hit::Zone(Zone::Right));
    }
}

pub const RENDER_WIDTH: i32 = 1920;           // Logical width slides are laid out against
pub const RENDER_HEIGHT: i32 = 1080;          // Logical height slides are laid out against
pub const FPS: u32 = 60;                      // Frames per second

pub const SWIPE_THRESHOLD: f32 = 50.0;        // Minimum horizontal travel for a swipe (units)
pub const RESIZE_DEBOUNCE_MS: u64 = 250;      // Quiet period before a resize reflows the slides
pub const ENTRY_ANIMATION_DURATION: f32 = 0.6; // Slide content scale-in / fade (seconds)
pub const ENTRY_ANIMATION_SCALE: f32 = 0.96;  // Starting scale of the content entry animation
pub const SLIDE_FILL: f32 = 0.9;              // Fraction of the window a slide may cover

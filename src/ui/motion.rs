//! Scroll- and time-linked animation math.

use std::time::Duration;

pub const WORDS_PER_MINUTE: usize = 200;
/// Viewports narrower than this get no parallax.
pub const PARALLAX_MIN_WIDTH: f64 = 768.0;
/// Scrolling down only counts once past this offset.
pub const SCROLL_DIRECTION_THRESHOLD: f64 = 100.0;

/// Cubic ease-out on `t ∈ [0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Value shown by a counter animating from 0 to `end` over `duration`.
pub fn counter_value(end: u64, elapsed: Duration, duration: Duration) -> u64 {
    if duration.is_zero() || elapsed >= duration {
        return end;
    }
    let progress = elapsed.as_secs_f64() / duration.as_secs_f64();
    (ease_out_cubic(progress) * end as f64).floor() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallaxDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy)]
pub struct ParallaxOptions {
    pub speed: f64,
    pub direction: ParallaxDirection,
    /// How fast the layer fades relative to one viewport of scroll.
    pub fade: f64,
    pub disabled: bool,
}

impl Default for ParallaxOptions {
    fn default() -> Self {
        Self {
            speed: 0.3,
            direction: ParallaxDirection::Up,
            fade: 0.5,
            disabled: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxValue {
    pub y: f64,
    pub opacity: f64,
}

impl ParallaxValue {
    pub const REST: ParallaxValue = ParallaxValue { y: 0.0, opacity: 1.0 };
}

/// Offset and opacity of a parallax layer for the given scroll state.
/// Reduced motion, narrow viewports, and disabled layers stay at rest.
pub fn parallax(
    options: &ParallaxOptions,
    scroll_y: f64,
    viewport_width: f64,
    viewport_height: f64,
    reduced_motion: bool,
) -> ParallaxValue {
    if options.disabled || reduced_motion || viewport_width < PARALLAX_MIN_WIDTH {
        return ParallaxValue::REST;
    }

    let sign = match options.direction {
        ParallaxDirection::Up => -1.0,
        ParallaxDirection::Down => 1.0,
    };
    let opacity = if viewport_height > 0.0 {
        (1.0 - (scroll_y / viewport_height) * options.fade).max(0.0)
    } else {
        1.0
    };

    ParallaxValue {
        y: scroll_y * options.speed * sign,
        opacity,
    }
}

/// Page scroll progress as a percentage in `[0, 100]`.
pub fn scroll_progress(scroll_top: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Tracks the last scroll offset to report direction, e.g. to hide a navbar.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    last_y: f64,
    direction: ScrollDirection,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self {
            last_y: 0.0,
            direction: ScrollDirection::Up,
        }
    }
}

impl ScrollTracker {
    pub fn update(&mut self, y: f64) -> ScrollDirection {
        self.direction = if y > self.last_y && y > SCROLL_DIRECTION_THRESHOLD {
            ScrollDirection::Down
        } else {
            ScrollDirection::Up
        };
        self.last_y = y;
        self.direction
    }

    pub fn position(&self) -> f64 {
        self.last_y
    }
}

/// Estimated minutes to read `text`, rounded up. Empty text reads in 0.
pub fn reading_minutes(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE) as u32
}

/// Minutes left after reading `progress_percent` of a `total`-minute text.
pub fn minutes_remaining(total: u32, progress_percent: f64) -> u32 {
    let fraction = 1.0 - progress_percent.clamp(0.0, 100.0) / 100.0;
    (total as f64 * fraction).ceil() as u32
}

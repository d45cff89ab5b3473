//! Typewriter effect cycling through a list of phrases.
//!
//! Driven by [`Typewriter::tick`]: each call performs one step and returns
//! how long the caller should wait before the next one.

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct TypingSpeeds {
    pub type_delay: Duration,
    pub delete_delay: Duration,
    pub pause: Duration,
}

impl Default for TypingSpeeds {
    fn default() -> Self {
        Self {
            type_delay: Duration::from_millis(100),
            delete_delay: Duration::from_millis(50),
            pause: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    texts: Vec<Vec<char>>,
    speeds: TypingSpeeds,
    index: usize,
    shown: usize,
    deleting: bool,
}

impl Typewriter {
    pub fn new<S: AsRef<str>>(texts: &[S], speeds: TypingSpeeds) -> Self {
        Self {
            texts: texts.iter().map(|t| t.as_ref().chars().collect()).collect(),
            speeds,
            index: 0,
            shown: 0,
            deleting: false,
        }
    }

    /// Text currently visible.
    pub fn current(&self) -> String {
        self.texts
            .get(self.index)
            .map(|t| t[..self.shown].iter().collect())
            .unwrap_or_default()
    }

    pub fn phrase_index(&self) -> usize {
        self.index
    }

    /// Advances one step and returns the delay until the next tick.
    pub fn tick(&mut self) -> Duration {
        let Some(full) = self.texts.get(self.index) else {
            return self.speeds.pause;
        };

        if !self.deleting {
            if self.shown < full.len() {
                self.shown += 1;
                if self.shown == full.len() {
                    self.deleting = true;
                    return self.speeds.pause;
                }
                return self.speeds.type_delay;
            }
            self.deleting = true;
            return self.speeds.pause;
        }

        if self.shown > 0 {
            self.shown -= 1;
            return self.speeds.delete_delay;
        }

        self.deleting = false;
        self.index = (self.index + 1) % self.texts.len();
        self.speeds.type_delay
    }
}

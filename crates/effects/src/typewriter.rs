//! Typewriter headline: types, holds, deletes and cycles through strings.
//!
//! One keystroke happens per step and every step waits for the delay of the
//! phase it leaves. Steps are counted in `char`s, so multi-byte text is never
//! cut inside a code point.

use serde::{Deserialize, Serialize};

/// Delays between keystrokes, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterTiming {
    pub type_ms: f64,
    pub hold_ms: f64,
    pub delete_ms: f64,
    pub gap_ms: f64,
    pub cursor_ms: f64,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            type_ms: 80.0,
            hold_ms: 1500.0,
            delete_ms: 40.0,
            gap_ms: 200.0,
            cursor_ms: 530.0,
        }
    }
}

/// Delays are floored at this so a zero timing cannot spin forever.
const MIN_STEP_MS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting out the initial delay.
    Delayed,
    Typing,
    /// Full text shown.
    Holding,
    Deleting,
    /// Text fully deleted, about to move on.
    Pausing,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    texts: Vec<String>,
    index: usize,
    /// Visible prefix length in chars.
    shown: usize,
    phase: Phase,
    /// Time left until the next step.
    remaining_ms: f64,
    elapsed_ms: f64,
    timing: TypewriterTiming,
}

impl Typewriter {
    pub fn new(texts: Vec<String>) -> Self {
        Self::with_timing(texts, TypewriterTiming::default(), 0.0)
    }

    /// Postpones the first keystroke by `delay_ms`.
    pub fn with_delay(texts: Vec<String>, delay_ms: f64) -> Self {
        Self::with_timing(texts, TypewriterTiming::default(), delay_ms)
    }

    pub fn with_timing(texts: Vec<String>, timing: TypewriterTiming, delay_ms: f64) -> Self {
        let mut tw = Self {
            texts,
            index: 0,
            shown: 0,
            phase: Phase::Delayed,
            remaining_ms: 0.0,
            elapsed_ms: 0.0,
            timing,
        };
        if delay_ms.is_finite() && delay_ms > 0.0 {
            tw.remaining_ms = delay_ms;
        } else {
            tw.enter_typing();
            tw.remaining_ms = tw.phase_delay();
        }
        tw
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the string currently being typed or deleted.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        match self.texts.get(self.index) {
            Some(full) => {
                let end = full
                    .char_indices()
                    .nth(self.shown)
                    .map_or(full.len(), |(byte, _)| byte);
                &full[..end]
            }
            None => "",
        }
    }

    /// The cursor starts visible and toggles every `cursor_ms`.
    pub fn cursor_visible(&self) -> bool {
        let period = self.timing.cursor_ms.max(MIN_STEP_MS);
        (self.elapsed_ms / period).floor() as u64 % 2 == 0
    }

    /// Moves the clock forward, applying every step that falls due.
    ///
    /// Negative or non-finite input is ignored. An empty text list only
    /// advances the cursor.
    pub fn advance(&mut self, elapsed_ms: f64) {
        if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return;
        }
        self.elapsed_ms += elapsed_ms;
        if self.texts.is_empty() {
            return;
        }
        self.remaining_ms -= elapsed_ms;
        while self.remaining_ms <= 0.0 {
            self.step();
            self.remaining_ms += self.phase_delay();
        }
    }

    fn current_len(&self) -> usize {
        self.texts
            .get(self.index)
            .map_or(0, |t| t.chars().count())
    }

    fn phase_delay(&self) -> f64 {
        let t = &self.timing;
        let ms = match self.phase {
            Phase::Delayed => MIN_STEP_MS,
            Phase::Typing => t.type_ms,
            Phase::Holding => t.hold_ms,
            Phase::Deleting => t.delete_ms,
            Phase::Pausing => t.gap_ms,
        };
        ms.max(MIN_STEP_MS)
    }

    fn enter_typing(&mut self) {
        self.phase = if self.current_len() == 0 {
            Phase::Holding
        } else {
            Phase::Typing
        };
    }

    fn step(&mut self) {
        match self.phase {
            Phase::Delayed => self.enter_typing(),
            Phase::Typing => {
                self.shown += 1;
                if self.shown >= self.current_len() {
                    self.phase = Phase::Holding;
                }
            }
            Phase::Holding => {
                self.phase = if self.shown == 0 {
                    Phase::Pausing
                } else {
                    Phase::Deleting
                };
            }
            Phase::Deleting => {
                self.shown = self.shown.saturating_sub(1);
                if self.shown == 0 {
                    self.phase = Phase::Pausing;
                }
            }
            Phase::Pausing => {
                self.index = (self.index + 1) % self.texts.len();
                self.enter_typing();
            }
        }
    }
}

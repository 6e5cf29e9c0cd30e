use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Source of the current instant
pub trait TimeSource {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven time for tests and simulations. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualTimeSource {
    now: Rc<Cell<Instant>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// What `start` does with a value left behind by `pause`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartMode {
    #[default]
    Reset,
    Resume,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightMode {
    /// Every second at or past a threshold is highlighted
    #[default]
    Threshold,
    /// Only the exact displays of each threshold ("2:00", "2:30", "3:00")
    ExactBoundary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TimerTier {
    Neutral,
    Warning,
    Elevated,
    Critical,
}

/// Elapsed seconds at which each tier begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerThresholds {
    pub warning_secs: u64,
    pub elevated_secs: u64,
    pub critical_secs: u64,
}

impl Default for TimerThresholds {
    fn default() -> Self {
        Self {
            warning_secs: 120,
            elevated_secs: 150,
            critical_secs: 180,
        }
    }
}

impl TimerThresholds {
    pub fn tier(&self, elapsed_secs: u64, mode: HighlightMode) -> TimerTier {
        match mode {
            HighlightMode::Threshold => {
                if elapsed_secs >= self.critical_secs {
                    TimerTier::Critical
                } else if elapsed_secs >= self.elevated_secs {
                    TimerTier::Elevated
                } else if elapsed_secs >= self.warning_secs {
                    TimerTier::Warning
                } else {
                    TimerTier::Neutral
                }
            }
            HighlightMode::ExactBoundary => {
                if elapsed_secs == self.critical_secs {
                    TimerTier::Critical
                } else if elapsed_secs == self.elevated_secs {
                    TimerTier::Elevated
                } else if elapsed_secs == self.warning_secs {
                    TimerTier::Warning
                } else {
                    TimerTier::Neutral
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default)]
    pub start_mode: StartMode,
    #[serde(default)]
    pub highlight: HighlightMode,
    #[serde(default)]
    pub thresholds: TimerThresholds,
}

/// `M:SS`, minutes unbounded, sub-second part dropped
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}

/// Snapshot of the clock for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerReading {
    pub running: bool,
    pub elapsed: Duration,
    pub display: String,
    pub tier: TimerTier,
}

/// Speech timer. Elapsed time is recomputed from the start instant
/// whenever it is polled; nothing increments it in the background.
#[derive(Debug)]
pub struct Clock<T: TimeSource = SystemTimeSource> {
    source: T,
    settings: TimerSettings,
    running: bool,
    started_at: Option<Instant>,
    /// Time carried over from before `started_at`
    base: Duration,
    elapsed: Duration,
}

impl<T: TimeSource> Clock<T> {
    pub fn with_source(source: T, settings: TimerSettings) -> Self {
        Self {
            source,
            settings,
            running: false,
            started_at: None,
            base: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    /// Returns false when already running
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        if self.settings.start_mode == StartMode::Reset {
            self.elapsed = Duration::ZERO;
        }
        self.base = self.elapsed;
        self.started_at = Some(self.source.now());
        self.running = true;
        true
    }

    pub fn tick(&mut self) -> Duration {
        if self.running {
            if let Some(started_at) = self.started_at {
                self.elapsed = self.base + self.source.now().saturating_duration_since(started_at);
            }
        }
        self.elapsed
    }

    /// Freeze without clearing, so `StartMode::Resume` can continue from here
    pub fn pause(&mut self) -> Duration {
        self.tick();
        self.running = false;
        self.started_at = None;
        self.elapsed
    }

    /// Freeze, clear, and hand back the frozen value as `M:SS`
    pub fn stop(&mut self) -> String {
        let frozen = self.pause();
        self.elapsed = Duration::ZERO;
        format_elapsed(frozen)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tier(&self) -> TimerTier {
        self.settings
            .thresholds
            .tier(self.elapsed.as_secs(), self.settings.highlight)
    }

    pub fn reading(&self) -> TimerReading {
        TimerReading {
            running: self.running,
            elapsed: self.elapsed,
            display: format_elapsed(self.elapsed),
            tier: self.tier(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual_clock(settings: TimerSettings) -> (ManualTimeSource, Clock<ManualTimeSource>) {
        let source = ManualTimeSource::new();
        let clock = Clock::with_source(source.clone(), settings);
        (source, clock)
    }

    #[test]
    fn format_pads_seconds_and_keeps_minutes_unbounded() {
        assert_eq!(format_elapsed(Duration::ZERO), "0:00");
        assert_eq!(format_elapsed(Duration::from_millis(9_999)), "0:09");
        assert_eq!(format_elapsed(Duration::from_secs(185)), "3:05");
        assert_eq!(format_elapsed(Duration::from_secs(61 * 60 + 1)), "61:01");
    }

    #[test]
    fn threshold_tiers() {
        let t = TimerThresholds::default();
        let mode = HighlightMode::Threshold;
        assert_eq!(t.tier(0, mode), TimerTier::Neutral);
        assert_eq!(t.tier(119, mode), TimerTier::Neutral);
        assert_eq!(t.tier(120, mode), TimerTier::Warning);
        assert_eq!(t.tier(149, mode), TimerTier::Warning);
        assert_eq!(t.tier(150, mode), TimerTier::Elevated);
        assert_eq!(t.tier(179, mode), TimerTier::Elevated);
        assert_eq!(t.tier(180, mode), TimerTier::Critical);
        assert_eq!(t.tier(600, mode), TimerTier::Critical);
    }

    #[test]
    fn exact_boundary_tiers() {
        let t = TimerThresholds::default();
        let mode = HighlightMode::ExactBoundary;
        assert_eq!(t.tier(120, mode), TimerTier::Warning);
        assert_eq!(t.tier(121, mode), TimerTier::Neutral);
        assert_eq!(t.tier(150, mode), TimerTier::Elevated);
        assert_eq!(t.tier(180, mode), TimerTier::Critical);
        assert_eq!(t.tier(185, mode), TimerTier::Neutral);
    }

    #[test]
    fn tick_polls_elapsed_while_running() {
        let (source, mut clock) = manual_clock(TimerSettings::default());
        assert!(clock.start());
        source.advance(Duration::from_secs(185));
        clock.tick();

        let reading = clock.reading();
        assert!(reading.running);
        assert_eq!(reading.display, "3:05");
        assert_eq!(reading.tier, TimerTier::Critical);
    }

    #[test]
    fn tick_is_noop_when_stopped() {
        let (source, mut clock) = manual_clock(TimerSettings::default());
        source.advance(Duration::from_secs(30));
        assert_eq!(clock.tick(), Duration::ZERO);
    }

    #[test]
    fn start_while_running_is_ignored() {
        let (source, mut clock) = manual_clock(TimerSettings::default());
        clock.start();
        source.advance(Duration::from_secs(10));
        assert!(!clock.start());
        source.advance(Duration::from_secs(5));
        assert_eq!(clock.tick(), Duration::from_secs(15));
    }

    #[test]
    fn stop_returns_frozen_value_and_clears() {
        let (source, mut clock) = manual_clock(TimerSettings::default());
        clock.start();
        source.advance(Duration::from_secs(95));
        assert_eq!(clock.stop(), "1:35");
        assert!(!clock.is_running());
        assert_eq!(clock.reading().elapsed, Duration::ZERO);

        source.advance(Duration::from_secs(20));
        assert_eq!(clock.tick(), Duration::ZERO);
    }

    #[test]
    fn start_after_pause_resets_by_default() {
        let (source, mut clock) = manual_clock(TimerSettings::default());
        clock.start();
        source.advance(Duration::from_secs(40));
        assert_eq!(clock.pause(), Duration::from_secs(40));

        clock.start();
        source.advance(Duration::from_secs(3));
        assert_eq!(clock.tick(), Duration::from_secs(3));
    }

    #[test]
    fn start_after_pause_resumes_when_configured() {
        let settings = TimerSettings {
            start_mode: StartMode::Resume,
            ..TimerSettings::default()
        };
        let (source, mut clock) = manual_clock(settings);
        clock.start();
        source.advance(Duration::from_secs(40));
        clock.pause();
        source.advance(Duration::from_secs(100));

        clock.start();
        source.advance(Duration::from_secs(3));
        assert_eq!(clock.tick(), Duration::from_secs(43));
    }
}

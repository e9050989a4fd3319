//! Release-date brush and the animated walkthrough
//!
//! [`BrushMachine`] owns every transition of the coarse timeline selector.
//! The view feeds it gestures and frame time; each call returns the filters
//! that must be broadcast, in order.

use std::time::Duration;

use chrono::{Duration as DayDelta, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::time::{shift_months, DateExtent, TimeFilter, TimeRange};
use crate::timer::{IntervalTimer, OneShotTimer};

/// Tuning knobs for the brush and walkthrough
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Width of the default selection ending at the newest release
    pub default_window_months: u32,
    /// Year the walkthrough starts in (Jan 1st, clamped to the data)
    pub walkthrough_start_year: i32,
    /// Width of the walkthrough window
    pub walkthrough_window_months: u32,
    /// How far the window moves per tick
    pub walkthrough_step_days: i64,
    /// Time between walkthrough ticks
    pub walkthrough_interval: Duration,
    /// Delay before the default selection is re-applied after a clear
    pub reapply_delay: Duration,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            default_window_months: 12,
            walkthrough_start_year: 2006,
            walkthrough_window_months: 12,
            walkthrough_step_days: 7,
            walkthrough_interval: Duration::from_millis(50),
            reapply_delay: Duration::from_millis(100),
        }
    }
}

/// Where the brush currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum BrushState {
    NoSelection,
    UserSelection(TimeRange),
    AppliedDefault(TimeRange),
    WalkthroughActive { window: TimeRange },
}

/// Everything that can move the brush
#[derive(Debug, Clone, PartialEq)]
pub enum BrushInput {
    DataLoaded(DateExtent),
    DragMoved(TimeRange),
    DragEnded(TimeRange),
    Cleared,
    ToggleWalkthrough,
    Elapsed(Duration),
}

pub struct BrushMachine {
    config: BrushConfig,
    state: BrushState,
    extent: Option<DateExtent>,
    walkthrough_timer: IntervalTimer,
    reapply_timer: OneShotTimer,
}

impl BrushMachine {
    pub fn new(config: BrushConfig) -> Self {
        let walkthrough_timer = IntervalTimer::new(config.walkthrough_interval);
        let reapply_timer = OneShotTimer::new(config.reapply_delay);
        Self {
            config,
            state: BrushState::NoSelection,
            extent: None,
            walkthrough_timer,
            reapply_timer,
        }
    }

    pub fn state(&self) -> &BrushState {
        &self.state
    }

    pub fn extent(&self) -> Option<DateExtent> {
        self.extent
    }

    /// Range the brush should be drawn at.
    pub fn selection(&self) -> Option<TimeRange> {
        match &self.state {
            BrushState::NoSelection => None,
            BrushState::UserSelection(range) | BrushState::AppliedDefault(range) => Some(*range),
            BrushState::WalkthroughActive { window } => Some(*window),
        }
    }

    /// Filter matching the current state.
    pub fn filter(&self) -> TimeFilter {
        self.selection().map_or(TimeFilter::All, TimeFilter::Range)
    }

    pub fn is_walkthrough_active(&self) -> bool {
        matches!(self.state, BrushState::WalkthroughActive { .. })
    }

    /// True while a timer is pending and the owner should keep requesting frames.
    pub fn needs_ticks(&self) -> bool {
        self.walkthrough_timer.is_running() || self.reapply_timer.is_armed()
    }

    /// Apply one input and return the filters to broadcast.
    pub fn handle(&mut self, input: BrushInput) -> Vec<TimeFilter> {
        let mut emitted = Vec::new();
        match input {
            BrushInput::DataLoaded(extent) => {
                self.extent = Some(extent);
                self.stop_walkthrough();
                self.reapply_timer.cancel();
                self.apply_default(&mut emitted);
            }
            BrushInput::DragMoved(range) | BrushInput::DragEnded(range) => {
                if self.is_walkthrough_active() {
                    tracing::debug!("drag interrupted walkthrough");
                    self.stop_walkthrough();
                }
                self.reapply_timer.cancel();
                self.state = BrushState::UserSelection(range);
                emitted.push(TimeFilter::Range(range));
            }
            BrushInput::Cleared => {
                self.stop_walkthrough();
                self.state = BrushState::NoSelection;
                emitted.push(TimeFilter::All);
                if self.extent.is_some() {
                    self.reapply_timer.arm();
                }
            }
            BrushInput::ToggleWalkthrough => {
                if self.is_walkthrough_active() {
                    self.stop_walkthrough();
                    self.apply_default(&mut emitted);
                } else {
                    self.start_walkthrough(&mut emitted);
                }
            }
            BrushInput::Elapsed(dt) => self.tick(dt, &mut emitted),
        }
        emitted
    }

    fn tick(&mut self, dt: Duration, emitted: &mut Vec<TimeFilter>) {
        if self.reapply_timer.advance(dt) && self.state == BrushState::NoSelection {
            self.apply_default(emitted);
        }

        let fires = self.walkthrough_timer.advance(dt);
        for _ in 0..fires {
            if !self.step_walkthrough(emitted) {
                break;
            }
        }
    }

    fn default_range(&self) -> Option<TimeRange> {
        let extent = self.extent?;
        let start = shift_months(extent.max, -(self.config.default_window_months as i32));
        Some(TimeRange::new(start.max(extent.min), extent.max))
    }

    fn apply_default(&mut self, emitted: &mut Vec<TimeFilter>) {
        match self.default_range() {
            Some(range) => {
                self.state = BrushState::AppliedDefault(range);
                emitted.push(TimeFilter::Range(range));
            }
            None => {
                self.state = BrushState::NoSelection;
                emitted.push(TimeFilter::All);
            }
        }
    }

    fn walkthrough_window(&self, start: NaiveDate) -> TimeRange {
        TimeRange::new(start, shift_months(start, self.config.walkthrough_window_months as i32))
    }

    fn start_walkthrough(&mut self, emitted: &mut Vec<TimeFilter>) {
        let Some(extent) = self.extent else {
            tracing::warn!("walkthrough requested before data was loaded");
            return;
        };
        let first_day = NaiveDate::from_ymd_opt(self.config.walkthrough_start_year, 1, 1)
            .unwrap_or(extent.min)
            .max(extent.min);

        let window = self.walkthrough_window(first_day);
        tracing::info!(start = %window.start(), "walkthrough started");
        self.reapply_timer.cancel();
        self.state = BrushState::WalkthroughActive { window };
        self.walkthrough_timer.start();
        emitted.push(TimeFilter::Range(window));
    }

    /// Move the window one step. Returns `false` once the walkthrough ended.
    fn step_walkthrough(&mut self, emitted: &mut Vec<TimeFilter>) -> bool {
        let (window, extent) = match (&self.state, self.extent) {
            (BrushState::WalkthroughActive { window }, Some(extent)) => (*window, extent),
            _ => {
                self.walkthrough_timer.stop();
                return false;
            }
        };

        let start = window.start() + DayDelta::days(self.config.walkthrough_step_days);
        let next = self.walkthrough_window(start);
        if next.end() > extent.max {
            tracing::info!("walkthrough reached the newest release");
            self.stop_walkthrough();
            self.apply_default(emitted);
            return false;
        }

        self.state = BrushState::WalkthroughActive { window: next };
        emitted.push(TimeFilter::Range(next));
        true
    }

    fn stop_walkthrough(&mut self) {
        self.walkthrough_timer.stop();
    }
}

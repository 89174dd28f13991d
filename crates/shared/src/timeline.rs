//! Year cursor and the autoplay state machine.
//!
//! Playback is `Stopped` or `Playing`. While playing, every tick advances the
//! year by one; reaching [`YEAR_MAX`] stops playback. Starting playback from
//! the last year rewinds to [`YEAR_MIN`] first.

use crate::models::Year;

pub const YEAR_MIN: Year = 1498;
pub const YEAR_MAX: Year = 2000;

/// Delay between two autoplay ticks.
pub const PLAY_INTERVAL_MS: u32 = 120;

pub fn clamp_year(year: Year) -> Year {
    year.clamp(YEAR_MIN, YEAR_MAX)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Playback {
    #[default]
    Stopped,
    Playing,
}

/// Result of a timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Playback is stopped; nothing changed.
    Idle,
    /// The year moved forward and playback continues.
    Advanced(Year),
    /// The year reached the upper bound and playback stopped.
    Finished(Year),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    year: Year,
    playback: Playback,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(YEAR_MIN)
    }
}

impl Timeline {
    pub fn new(year: Year) -> Self {
        Self {
            year: clamp_year(year),
            playback: Playback::Stopped,
        }
    }

    pub fn year(&self) -> Year {
        self.year
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback == Playback::Playing
    }

    /// Play/pause button. Returns the new playback state.
    pub fn toggle(&mut self) -> Playback {
        match self.playback {
            Playback::Playing => self.stop(),
            Playback::Stopped => self.play(),
        }
        self.playback
    }

    pub fn play(&mut self) {
        if self.playback == Playback::Playing {
            return;
        }
        if self.year >= YEAR_MAX {
            self.year = YEAR_MIN;
        }
        self.playback = Playback::Playing;
    }

    pub fn stop(&mut self) {
        self.playback = Playback::Stopped;
    }

    pub fn tick(&mut self) -> Tick {
        if self.playback == Playback::Stopped {
            return Tick::Idle;
        }
        self.year = (self.year + 1).min(YEAR_MAX);
        if self.year >= YEAR_MAX {
            self.playback = Playback::Stopped;
            Tick::Finished(self.year)
        } else {
            Tick::Advanced(self.year)
        }
    }

    /// Slider input. Clamps to the supported range; playback continues from
    /// the new year.
    pub fn seek(&mut self, year: Year) -> Year {
        self.year = clamp_year(year);
        self.year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_stopped_at_min_year() {
        let timeline = Timeline::default();
        assert_eq!(timeline.year(), YEAR_MIN);
        assert_eq!(timeline.playback(), Playback::Stopped);
    }

    #[test]
    fn test_play_from_max_rewinds() {
        let mut timeline = Timeline::new(2000);
        assert_eq!(timeline.toggle(), Playback::Playing);
        assert_eq!(timeline.year(), 1498);
    }

    #[test]
    fn test_play_from_middle_keeps_year() {
        let mut timeline = Timeline::new(1700);
        timeline.toggle();
        assert!(timeline.is_playing());
        assert_eq!(timeline.year(), 1700);
    }

    #[test]
    fn test_tick_advances_one_year() {
        let mut timeline = Timeline::new(1600);
        timeline.play();
        assert_eq!(timeline.tick(), Tick::Advanced(1601));
        assert_eq!(timeline.tick(), Tick::Advanced(1602));
        assert_eq!(timeline.year(), 1602);
    }

    #[test]
    fn test_tick_reaching_max_stops() {
        let mut timeline = Timeline::new(1999);
        timeline.play();
        assert_eq!(timeline.tick(), Tick::Finished(2000));
        assert_eq!(timeline.playback(), Playback::Stopped);
        assert_eq!(timeline.year(), 2000);
        assert_eq!(timeline.tick(), Tick::Idle);
        assert_eq!(timeline.year(), 2000);
    }

    #[test]
    fn test_tick_while_stopped_is_idle() {
        let mut timeline = Timeline::new(1700);
        assert_eq!(timeline.tick(), Tick::Idle);
        assert_eq!(timeline.year(), 1700);
    }

    #[test]
    fn test_toggle_pauses() {
        let mut timeline = Timeline::new(1700);
        timeline.toggle();
        timeline.tick();
        assert_eq!(timeline.toggle(), Playback::Stopped);
        assert_eq!(timeline.tick(), Tick::Idle);
        assert_eq!(timeline.year(), 1701);
    }

    #[test]
    fn test_full_run_visits_every_year() {
        let mut timeline = Timeline::default();
        timeline.play();
        let mut years = vec![timeline.year()];
        loop {
            match timeline.tick() {
                Tick::Advanced(year) => years.push(year),
                Tick::Finished(year) => {
                    years.push(year);
                    break;
                }
                Tick::Idle => panic!("stopped before reaching the end"),
            }
        }
        assert_eq!(years, (YEAR_MIN..=YEAR_MAX).collect::<Vec<_>>());
    }

    #[test]
    fn test_seek_clamps_and_keeps_playback() {
        let mut timeline = Timeline::default();
        timeline.play();
        assert_eq!(timeline.seek(1200), YEAR_MIN);
        assert_eq!(timeline.seek(2500), YEAR_MAX);
        assert_eq!(timeline.seek(1750), 1750);
        assert!(timeline.is_playing());
    }

    #[test]
    fn test_new_clamps() {
        assert_eq!(Timeline::new(3000).year(), YEAR_MAX);
        assert_eq!(Timeline::new(0).year(), YEAR_MIN);
    }
}

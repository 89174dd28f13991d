//! Application state and the transitions UI events map onto.
//!
//! Event handlers dispatch an [`Action`] to [`AppState::apply`] and act on
//! the returned [`Update`]: recompute the visible set, start or cancel the
//! autoplay timer. Loaded data lives separately in [`Atlas`].

use crate::flags::FlagConfig;
use crate::models::{EmpireSet, TradingPost, Year};
use crate::posts;
use crate::timeline::{Playback, Tick, Timeline};
use crate::visibility;

pub const ZOOM_MIN: f64 = 1.0;
pub const ZOOM_MAX: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub timeline: Timeline,
    zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            timeline: Timeline::default(),
            zoom: ZOOM_MIN,
        }
    }
}

impl ViewState {
    pub fn year(&self) -> Year {
        self.timeline.year()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Year slider moved.
    Seek(Year),
    /// Play/pause button.
    TogglePlay,
    /// Autoplay timer fired.
    Tick,
    SetEmpire { empire: String, enabled: bool },
    ToggleEmpire(String),
    SetAllEmpires(bool),
    Zoom(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Keep,
    Start,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Update {
    pub year: Year,
    /// The visible set (or the resolved flags) may have changed.
    pub rerender: bool,
    pub timer: TimerCommand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    view: ViewState,
    active: EmpireSet,
    known: EmpireSet,
}

impl AppState {
    /// All `empires` start enabled.
    pub fn new<I>(empires: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let known: EmpireSet = empires.into_iter().map(Into::into).collect();
        Self {
            view: ViewState::default(),
            active: known.clone(),
            known,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn year(&self) -> Year {
        self.view.year()
    }

    pub fn is_playing(&self) -> bool {
        self.view.timeline.is_playing()
    }

    pub fn active_empires(&self) -> &EmpireSet {
        &self.active
    }

    pub fn is_active(&self, empire: &str) -> bool {
        self.active.contains(empire)
    }

    pub fn apply(&mut self, action: Action) -> Update {
        let before = self.view.year();
        let mut timer = TimerCommand::Keep;
        let mut rerender = false;

        match action {
            Action::Seek(year) => {
                self.view.timeline.seek(year);
                rerender = self.view.year() != before;
            }
            Action::TogglePlay => {
                timer = match self.view.timeline.toggle() {
                    Playback::Playing => TimerCommand::Start,
                    Playback::Stopped => TimerCommand::Cancel,
                };
                rerender = self.view.year() != before;
            }
            Action::Tick => match self.view.timeline.tick() {
                Tick::Idle => timer = TimerCommand::Cancel,
                Tick::Advanced(_) => rerender = true,
                Tick::Finished(_) => {
                    rerender = true;
                    timer = TimerCommand::Cancel;
                }
            },
            Action::SetEmpire { empire, enabled } => {
                rerender = self.set_empire(&empire, enabled);
            }
            Action::ToggleEmpire(empire) => {
                let enabled = !self.active.contains(&empire);
                rerender = self.set_empire(&empire, enabled);
            }
            Action::SetAllEmpires(enabled) => {
                let target = if enabled {
                    self.known.clone()
                } else {
                    EmpireSet::new()
                };
                rerender = target != self.active;
                self.active = target;
            }
            Action::Zoom(k) => {
                if k.is_finite() {
                    self.view.zoom = k.clamp(ZOOM_MIN, ZOOM_MAX);
                }
            }
        }

        Update {
            year: self.view.year(),
            rerender,
            timer,
        }
    }

    /// Returns whether the active set changed. Unknown empires are ignored.
    fn set_empire(&mut self, empire: &str, enabled: bool) -> bool {
        if !self.known.contains(empire) {
            return false;
        }
        if enabled {
            self.active.insert(empire.to_string())
        } else {
            self.active.remove(empire)
        }
    }
}

/// A trading post to draw, with the icon its empire flies that year.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec<'a> {
    pub post: &'a TradingPost,
    pub icon: Option<&'a str>,
}

/// One row of the filter panel.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpirePreview<'a> {
    pub empire: &'a str,
    pub active: bool,
    pub icon: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub year: Year,
    pub markers: Vec<MarkerSpec<'a>>,
    pub previews: Vec<EmpirePreview<'a>>,
}

/// Everything loaded at startup. Read-only for the rest of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Atlas {
    posts: Vec<TradingPost>,
    flags: FlagConfig,
    empires: Vec<String>,
}

impl Atlas {
    pub fn new(posts: Vec<TradingPost>, flags: FlagConfig) -> Self {
        let empires = posts::empires(&posts);
        Self {
            posts,
            flags,
            empires,
        }
    }

    pub fn posts(&self) -> &[TradingPost] {
        &self.posts
    }

    pub fn flags(&self) -> &FlagConfig {
        &self.flags
    }

    /// Empires present in the post table, in order of first appearance.
    pub fn empires(&self) -> &[String] {
        &self.empires
    }

    pub fn initial_state(&self) -> AppState {
        AppState::new(self.empires.iter().cloned())
    }

    pub fn visible(&self, state: &AppState) -> Vec<&TradingPost> {
        visibility::visible_posts(&self.posts, state.year(), state.active_empires())
    }

    pub fn icon_for(&self, empire: &str, year: Year) -> Option<&str> {
        self.flags.resolve_or_first(empire, year)
    }

    pub fn render(&self, state: &AppState) -> Frame<'_> {
        let year = state.year();
        let markers = self
            .visible(state)
            .into_iter()
            .map(|post| MarkerSpec {
                post,
                icon: self.icon_for(&post.empire, year),
            })
            .collect();
        let previews = self
            .empires
            .iter()
            .map(|empire| EmpirePreview {
                empire: empire.as_str(),
                active: state.is_active(empire),
                icon: self.icon_for(empire, year),
            })
            .collect();
        Frame {
            year,
            markers,
            previews,
        }
    }
}

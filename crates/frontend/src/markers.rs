//! Rendered marker set, kept in step with the visible posts by keyed diff.
//!
//! The keyed diff decides what happens to each marker: persisting markers
//! keep their projected position and only get a fresh icon, entering posts
//! are projected once, exiting markers are dropped.

use std::collections::{HashMap, HashSet};

use atlas_shared::flags;
use atlas_shared::models::{PostKey, TradingPost};
use atlas_shared::projection::NaturalEarth;
use atlas_shared::state::{Frame, MarkerSpec};
use atlas_shared::visibility::{self, Reconciliation};

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub key: PostKey,
    pub post: TradingPost,
    /// Native canvas position.
    pub x: f64,
    pub y: f64,
    /// Flag icon URL; `None` draws a plain dot.
    pub icon_url: Option<String>,
}

impl Marker {
    fn new(post: &TradingPost, icon: Option<&str>, projection: &NaturalEarth) -> Self {
        let (x, y) = projection.project(post.lon, post.lat);
        Self {
            key: post.key(),
            post: post.clone(),
            x,
            y,
            icon_url: icon.map(flags::icon_url),
        }
    }

    /// DOM key; unique because post keys are unique.
    pub fn dom_key(&self) -> String {
        self.key.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
}

impl MarkerLayer {
    /// Markers in visible-set order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn keys(&self) -> Vec<PostKey> {
        self.markers.iter().map(|m| m.key.clone()).collect()
    }

    pub fn get(&self, key: &PostKey) -> Option<&Marker> {
        self.markers.iter().find(|m| &m.key == key)
    }

    /// Bring the layer in line with `frame` and report what changed.
    pub fn reconcile(&mut self, frame: &Frame<'_>, projection: &NaturalEarth) -> Reconciliation {
        let posts: Vec<&TradingPost> = frame.markers.iter().map(|m| m.post).collect();
        let diff = visibility::diff_visible(&self.keys(), &posts);
        self.apply(&diff, frame, projection);
        diff
    }

    /// Act on `diff`: drop exiting markers, refresh the icon of persisting
    /// ones and project entering posts. Markers end up in `frame` order.
    pub fn apply(&mut self, diff: &Reconciliation, frame: &Frame<'_>, projection: &NaturalEarth) {
        let wanted: HashMap<PostKey, (usize, &MarkerSpec<'_>)> = frame
            .markers
            .iter()
            .enumerate()
            .map(|(i, m)| (m.post.key(), (i, m)))
            .collect();

        let exiting: HashSet<&PostKey> = diff.exiting.iter().collect();
        self.markers.retain(|m| !exiting.contains(&m.key));

        for key in &diff.persisting {
            let Some((_, spec)) = wanted.get(key) else {
                continue;
            };
            if let Some(marker) = self.markers.iter_mut().find(|m| &m.key == key) {
                marker.icon_url = spec.icon.map(flags::icon_url);
            }
        }

        for key in &diff.entering {
            if let Some((_, spec)) = wanted.get(key) {
                self.markers.push(Marker::new(spec.post, spec.icon, projection));
            }
        }

        self.markers
            .sort_by_key(|m| wanted.get(&m.key).map_or(usize::MAX, |(i, _)| *i));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use atlas_shared::flags::FlagConfig;
    use atlas_shared::models::FlagRule;
    use atlas_shared::state::{Action, Atlas};

    fn post(name: &str, empire: &str, lon: f64, start: i32, end: i32) -> TradingPost {
        TradingPost {
            name: name.to_string(),
            alt_names: None,
            lon,
            lat: 10.0,
            empire: empire.to_string(),
            start_year: start,
            end_year: end,
        }
    }

    fn atlas() -> Atlas {
        let mut rules = BTreeMap::new();
        rules.insert(
            "Dutch".to_string(),
            vec![
                FlagRule {
                    from: 1600,
                    to: 1650,
                    icon: "voc.png".to_string(),
                },
                FlagRule {
                    from: 1650,
                    to: 1800,
                    icon: "batavian.png".to_string(),
                },
            ],
        );
        Atlas::new(
            vec![
                post("Sofala", "Portugal", 34.8, 1510, 1600),
                post("Pulicat", "Dutch", 80.3, 1610, 1825),
                post("Batavia", "Dutch", 106.8, 1619, 1949),
            ],
            FlagConfig::new(rules),
        )
    }

    fn names(layer: &MarkerLayer) -> Vec<&str> {
        layer.markers().iter().map(|m| m.post.name.as_str()).collect()
    }

    #[test]
    fn test_first_reconcile_creates_all_markers() {
        let atlas = atlas();
        let mut state = atlas.initial_state();
        state.apply(Action::Seek(1620));

        let mut layer = MarkerLayer::default();
        let diff = layer.reconcile(&atlas.render(&state), &NaturalEarth::default());

        assert_eq!(diff.entering.len(), 2);
        assert_eq!(names(&layer), vec!["Pulicat", "Batavia"]);
        assert_eq!(
            layer.markers()[0].icon_url.as_deref(),
            Some("/static/flags/voc.png")
        );
    }

    #[test]
    fn test_persisting_markers_keep_position_and_refresh_icon() {
        let atlas = atlas();
        let projection = NaturalEarth::default();
        let mut state = atlas.initial_state();
        state.apply(Action::Seek(1620));
        let mut layer = MarkerLayer::default();
        layer.reconcile(&atlas.render(&state), &projection);
        let before = layer.markers()[1].clone();

        state.apply(Action::Seek(1700));
        let diff = layer.reconcile(&atlas.render(&state), &projection);

        assert!(diff.is_unchanged());
        assert_eq!(diff.persisting.len(), 2);
        let after = layer.get(&before.key).unwrap();
        assert_eq!((after.x, after.y), (before.x, before.y));
        assert_eq!(after.icon_url.as_deref(), Some("/static/flags/batavian.png"));
    }

    #[test]
    fn test_exiting_markers_are_removed() {
        let atlas = atlas();
        let projection = NaturalEarth::default();
        let mut state = atlas.initial_state();
        state.apply(Action::Seek(1615));
        let mut layer = MarkerLayer::default();
        layer.reconcile(&atlas.render(&state), &projection);
        assert_eq!(names(&layer), vec!["Pulicat"]);

        state.apply(Action::Seek(1599));
        let diff = layer.reconcile(&atlas.render(&state), &projection);
        assert_eq!(diff.exiting.len(), 1);
        assert_eq!(diff.entering.len(), 1);
        assert_eq!(names(&layer), vec!["Sofala"]);
        assert_eq!(layer.markers()[0].icon_url, None);
    }

    #[test]
    fn test_filter_toggle_removes_empire_markers() {
        let atlas = atlas();
        let projection = NaturalEarth::default();
        let mut state = atlas.initial_state();
        state.apply(Action::Seek(1700));
        let mut layer = MarkerLayer::default();
        layer.reconcile(&atlas.render(&state), &projection);

        state.apply(Action::ToggleEmpire("Dutch".to_string()));
        let diff = layer.reconcile(&atlas.render(&state), &projection);
        assert_eq!(diff.exiting.len(), 2);
        assert!(layer.markers().is_empty());
    }

    #[test]
    fn test_apply_acts_only_on_the_diff() {
        let atlas = atlas();
        let projection = NaturalEarth::default();
        let mut state = atlas.initial_state();
        state.apply(Action::Seek(1615));
        let mut layer = MarkerLayer::default();
        layer.reconcile(&atlas.render(&state), &projection);
        let pulicat = layer.markers()[0].key.clone();

        // Batavia enters at 1619, but this diff only lets Pulicat go
        state.apply(Action::Seek(1620));
        let diff = Reconciliation {
            entering: vec![],
            persisting: vec![],
            exiting: vec![pulicat],
        };
        layer.apply(&diff, &atlas.render(&state), &projection);
        assert!(layer.markers().is_empty());

        let diff = Reconciliation {
            entering: vec![atlas.posts()[2].key()],
            persisting: vec![],
            exiting: vec![],
        };
        layer.apply(&diff, &atlas.render(&state), &projection);
        assert_eq!(names(&layer), vec!["Batavia"]);
    }

    #[test]
    fn test_apply_refreshes_only_persisting_icons() {
        let atlas = atlas();
        let projection = NaturalEarth::default();
        let mut state = atlas.initial_state();
        state.apply(Action::Seek(1620));
        let mut layer = MarkerLayer::default();
        layer.reconcile(&atlas.render(&state), &projection);

        state.apply(Action::Seek(1700));
        let batavia = atlas.posts()[2].key();
        let diff = Reconciliation {
            entering: vec![],
            persisting: vec![batavia.clone()],
            exiting: vec![],
        };
        layer.apply(&diff, &atlas.render(&state), &projection);

        let icon = |key: &PostKey| layer.get(key).and_then(|m| m.icon_url.clone());
        assert_eq!(icon(&batavia).as_deref(), Some("/static/flags/batavian.png"));
        assert_eq!(
            icon(&atlas.posts()[1].key()).as_deref(),
            Some("/static/flags/voc.png")
        );
    }

    #[test]
    fn test_markers_follow_visible_order() {
        let atlas = atlas();
        let projection = NaturalEarth::default();
        let mut state = atlas.initial_state();
        state.apply(Action::Seek(1620));
        let mut layer = MarkerLayer::default();
        layer.reconcile(&atlas.render(&state), &projection);

        // East of the projection center lies right of the canvas middle
        let batavia = &layer.markers()[1];
        assert!(batavia.x > 640.0);
        assert_eq!(batavia.dom_key(), "Batavia (Dutch)");
    }
}

use atlas_shared::models::Year;
use atlas_shared::projection::NaturalEarth;
use atlas_shared::state::{Action, AppState, Atlas, TimerCommand};
use atlas_shared::timeline::{PLAY_INTERVAL_MS, YEAR_MAX, YEAR_MIN};
use atlas_shared::topology::WorldMap;
use dioxus::core::Task;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::api;
use crate::components::filter_panel::{EmpireRow, FilterPanel};
use crate::components::map_view::MapView;
use crate::components::timeline_controls::TimelineControls;
use crate::markers::MarkerLayer;

/// Initial state, optionally jumped to a deep-linked year.
fn initial_state(atlas: &Atlas, year: Option<Year>) -> AppState {
    let mut state = atlas.initial_state();
    if let Some(year) = year {
        state.apply(Action::Seek(year));
    }
    state
}

fn stop_autoplay(mut play_task: Signal<Option<Task>>) {
    if let Some(task) = play_task.write().take() {
        task.cancel();
    }
}

/// One tick every `PLAY_INTERVAL_MS` until the state machine asks to stop.
/// Any previous timer is cancelled first, so at most one is ever live.
fn start_autoplay(mut app: Signal<AppState>, mut play_task: Signal<Option<Task>>) {
    stop_autoplay(play_task);
    let task = spawn(async move {
        loop {
            TimeoutFuture::new(PLAY_INTERVAL_MS).await;
            let update = app.write().apply(Action::Tick);
            if update.timer == TimerCommand::Cancel {
                break;
            }
        }
        play_task.set(None);
    });
    play_task.set(Some(task));
}

#[component]
pub fn AtlasPage(initial_year: Option<Year>) -> Element {
    // Both loads start together
    let atlas_resource = use_resource(|| api::fetch_atlas());
    let world_resource = use_resource(|| api::fetch_world());

    let body = match (&*atlas_resource.read(), &*world_resource.read()) {
        (Some(Err(e)), _) | (_, Some(Err(e))) => rsx! {
            div { class: "error-banner", "Failed to load the map: {e}" }
        },
        (Some(Ok(atlas)), Some(Ok(world))) => rsx! {
            AtlasView { atlas: atlas.clone(), world: world.clone(), initial_year }
        },
        _ => rsx! {
            div { class: "loading", "Loading map\u{2026}" }
        },
    };

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Trading Posts {YEAR_MIN}\u{2013}{YEAR_MAX}" }
            }
            {body}
        }
    }
}

#[component]
fn AtlasView(atlas: Atlas, world: WorldMap, initial_year: Option<Year>) -> Element {
    let projection = NaturalEarth::default();

    let mut app = use_signal({
        let atlas = atlas.clone();
        move || initial_state(&atlas, initial_year)
    });
    let mut layer = use_signal(MarkerLayer::default);
    let play_task = use_signal(|| None::<Task>);

    // Keep the marker layer in step with the visible set
    let effect_atlas = atlas.clone();
    use_effect(move || {
        let state = app.read();
        let frame = effect_atlas.render(&state);
        layer.write().reconcile(&frame, &projection);
    });

    let mut dispatch = move |action: Action| {
        let update = app.write().apply(action);
        match update.timer {
            TimerCommand::Start => start_autoplay(app, play_task),
            TimerCommand::Cancel => stop_autoplay(play_task),
            TimerCommand::Keep => {}
        }
    };

    let (year, playing, zoom, rows, visible_count) = {
        let state = app.read();
        let frame = atlas.render(&state);
        let rows: Vec<EmpireRow> = frame.previews.iter().map(EmpireRow::from).collect();
        (
            state.year(),
            state.is_playing(),
            state.view().zoom(),
            rows,
            frame.markers.len(),
        )
    };
    let markers = layer.read().markers().to_vec();

    rsx! {
        div { class: "atlas",
            div { class: "controls",
                TimelineControls {
                    year,
                    playing,
                    on_action: move |action: Action| dispatch(action),
                }
                span { class: "post-count", "{visible_count} trading posts" }
                FilterPanel {
                    rows,
                    on_action: move |action: Action| dispatch(action),
                }
            }
            MapView {
                world,
                markers,
                marker_zoom: zoom,
                on_zoom: move |k: f64| dispatch(Action::Zoom(k)),
            }
        }
    }
}

use atlas_shared::models::TradingPost;
use atlas_shared::projection::{MAP_HEIGHT_PX, MAP_WIDTH_PX};
use atlas_shared::state::{ZOOM_MAX, ZOOM_MIN};
use atlas_shared::topology::WorldMap;
use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;

use crate::coords;
use crate::markers::Marker;

const MAP_CONTAINER_ID: &str = "atlas-map-container";

/// Minimum pixel movement before a mousedown becomes a drag instead of a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Touch drag threshold, larger than mouse because touch is less precise.
const TOUCH_DRAG_THRESHOLD: f64 = 8.0;

const ZOOM_STEP: f64 = 1.1;

const OCEAN_COLOR: &str = "#82C0C9";
const LAND_COLOR: &str = "#ce824b";

/// What the tooltip shows for a hovered marker.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipInfo {
    pub name: String,
    pub alt_names: Option<String>,
    pub empire: String,
    pub period: String,
}

impl From<&TradingPost> for TooltipInfo {
    fn from(post: &TradingPost) -> Self {
        TooltipInfo {
            name: post.name.clone(),
            alt_names: post.alt_names.clone(),
            empire: post.empire.clone(),
            period: post.period_label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hover {
    pub info: TooltipInfo,
    /// Viewport position of the tooltip box.
    pub left: f64,
    pub top: f64,
}

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

fn container_rect() -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(MAP_CONTAINER_ID)?;
    Some(element.get_bounding_client_rect())
}

// ---------------------------------------------------------------------------
// Viewport and gestures
// ---------------------------------------------------------------------------

/// Zoom factor and pan offset (container pixels) of the map wrapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: (f64, f64),
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            zoom: ZOOM_MIN,
            pan: (0.0, 0.0),
        }
    }
}

impl Viewport {
    /// Change zoom while keeping the content under `cursor` where it is.
    fn zoomed_at(self, cursor: (f64, f64), zoom: f64) -> Self {
        let content_x = (cursor.0 - self.pan.0) / self.zoom;
        let content_y = (cursor.1 - self.pan.1) / self.zoom;
        Viewport {
            zoom,
            pan: (cursor.0 - content_x * zoom, cursor.1 - content_y * zoom),
        }
    }

    fn panned(self, dx: f64, dy: f64) -> Self {
        Viewport {
            pan: (self.pan.0 + dx, self.pan.1 + dy),
            ..self
        }
    }

    /// Keep the map covering the container. The map is laid out at the
    /// container's width, so its height follows the canvas aspect ratio.
    fn clamped(self, container_w: f64, container_h: f64) -> Self {
        let overflow_x = (container_w * self.zoom - container_w).max(0.0);
        let overflow_y =
            (container_w * (MAP_HEIGHT_PX / MAP_WIDTH_PX) * self.zoom - container_h).max(0.0);
        Viewport {
            pan: (
                self.pan.0.clamp(-overflow_x, 0.0),
                self.pan.1.clamp(-overflow_y, 0.0),
            ),
            ..self
        }
    }

    fn clamped_to_container(self) -> Self {
        match container_rect() {
            Some(rect) => self.clamped(rect.width(), rect.height()),
            None => self,
        }
    }

    fn transform_css(&self) -> String {
        format!(
            "transform: translate({}px, {}px) scale({});",
            self.pan.0, self.pan.1, self.zoom
        )
    }
}

/// Pointer interaction in progress on the map.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Gesture {
    #[default]
    Idle,
    /// Mouse or one-finger pan; becomes a move once past `threshold`.
    Pan {
        origin: (f64, f64),
        start: Viewport,
        threshold: f64,
        moved: bool,
    },
    Pinch {
        distance: f64,
        midpoint: (f64, f64),
        start: Viewport,
    },
}

impl Gesture {
    fn pan_from(origin: (f64, f64), start: Viewport, threshold: f64) -> Self {
        Gesture::Pan {
            origin,
            start,
            threshold,
            moved: false,
        }
    }

    fn pinch_from(a: (f64, f64), b: (f64, f64), start: Viewport) -> Self {
        Gesture::Pinch {
            distance: point_distance(a, b),
            midpoint: ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0),
            start,
        }
    }

    fn is_moving(&self) -> bool {
        matches!(self, Gesture::Pan { moved: true, .. })
    }

    /// Viewport for a pointer now at `point`; `None` until the pan has
    /// passed its threshold or when no pan is in progress.
    fn pan_to(&mut self, point: (f64, f64)) -> Option<Viewport> {
        let Gesture::Pan {
            origin,
            start,
            threshold,
            moved,
        } = self
        else {
            return None;
        };
        if !*moved && point_distance(*origin, point) > *threshold {
            *moved = true;
        }
        if !*moved {
            return None;
        }
        Some(start.panned(point.0 - origin.0, point.1 - origin.1))
    }
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

fn point_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

fn touch_points(evt: &Event<TouchData>) -> Vec<(f64, f64)> {
    evt.data()
        .touches()
        .iter()
        .map(|t| {
            let p = t.client_coordinates();
            (p.x, p.y)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// SVG builder
// ---------------------------------------------------------------------------

/// Ocean, land and graticule, in that order. Built once per world load.
fn build_base_svg(world: &WorldMap) -> String {
    let mut svg = String::with_capacity(64 * 1024);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" style="display:block;width:100%;height:100%;">"#,
        w = world.width,
        h = world.height,
    ));
    svg.push_str(&format!(
        r#"<rect width="{}" height="{}" fill="{OCEAN_COLOR}"/>"#,
        world.width, world.height
    ));
    for d in &world.land_paths {
        svg.push_str(&format!(
            r##"<path d="{d}" fill="{LAND_COLOR}" fill-rule="evenodd" stroke="#fff" stroke-width="0.5"/>"##
        ));
    }
    if !world.graticule_path.is_empty() {
        svg.push_str(&format!(
            r##"<path d="{}" fill="none" stroke="#fff" stroke-width="0.4" stroke-opacity="0.4" stroke-dasharray="4 3"/>"##,
            world.graticule_path
        ));
    }
    svg.push_str("</svg>");
    svg
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[component]
fn MarkerPin(marker: Marker, zoom: f64, hover: Signal<Option<Hover>>) -> Element {
    let (left, top) = coords::canvas_to_percent(marker.x, marker.y);
    let scale = coords::marker_scale(zoom);
    let style = format!(
        "left: {left}%; top: {top}%; transform: translate(-50%, -50%) scale({scale});"
    );
    let class = if marker.icon_url.is_some() {
        "marker flag"
    } else {
        "marker dot"
    };
    let info = TooltipInfo::from(&marker.post);
    let tap_info = info.clone();

    rsx! {
        div {
            class: "{class}",
            style: "{style}",
            onmousemove: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                let (left, top) = coords::tooltip_position(client.x, client.y);
                hover.set(Some(Hover { info: info.clone(), left, top }));
            },
            onmouseleave: move |_| hover.set(None),
            onclick: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                let (left, top) = coords::tooltip_position(client.x, client.y);
                hover.set(Some(Hover { info: tap_info.clone(), left, top }));
            },
            if let Some(url) = marker.icon_url.as_deref() {
                img { src: "{url}", alt: "{marker.post.empire}", draggable: "false" }
            }
        }
    }
}

#[component]
fn Tooltip(hover: Hover) -> Element {
    let style = format!("left: {}px; top: {}px;", hover.left, hover.top);
    rsx! {
        div { class: "tooltip", style: "{style}",
            strong { "{hover.info.name}" }
            if let Some(alt) = hover.info.alt_names.as_deref() {
                br {}
                em { "{alt}" }
            }
            br {}
            "{hover.info.empire}"
            br {}
            "{hover.info.period}"
        }
    }
}

/// Zoomable world map with one marker per visible trading post.
///
/// Zoom and pan are CSS transforms on a wrapper holding the base SVG and
/// the marker layer. Markers are keyed by post, so a year or filter change
/// only creates and removes the markers whose posts entered or left.
/// `marker_zoom` is the zoom recorded in the app state, which markers are
/// counter-scaled by.
#[component]
pub fn MapView(
    world: WorldMap,
    markers: Vec<Marker>,
    marker_zoom: f64,
    on_zoom: EventHandler<f64>,
) -> Element {
    let mut view = use_signal(Viewport::default);
    let mut gesture = use_signal(Gesture::default);
    let mut hover = use_signal(|| None::<Hover>);

    let base_svg = use_hook(|| build_base_svg(&world));

    // Zoom changes are reported upwards; pans stay local
    let mut commit = move |next: Viewport| {
        if (next.zoom - view.peek().zoom).abs() > 1e-9 {
            on_zoom.call(next.zoom);
        }
        view.set(next);
    };

    let mut pan = move |point: (f64, f64)| {
        let Some(next) = gesture.write().pan_to(point) else {
            return;
        };
        if hover.peek().is_some() {
            hover.set(None);
        }
        view.set(next.clamped_to_container());
    };

    let current = *view.read();
    let transform_style = current.transform_css();
    let container_class = if gesture.read().is_moving() {
        "map-container dragging"
    } else {
        "map-container"
    };
    let current_hover = hover.read().clone();

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let from = *view.peek();
                let factor = if wheel_delta_y(evt.data().delta()) < 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
                let zoom = (from.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
                if (zoom - from.zoom).abs() < 1e-9 {
                    return;
                }
                let Some(rect) = container_rect() else { return };
                let client = evt.data().client_coordinates();
                let cursor = coords::client_to_container(client.x, client.y, rect.left(), rect.top());
                commit(from.zoomed_at(cursor, zoom).clamped(rect.width(), rect.height()));
            },

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                gesture.set(Gesture::pan_from((client.x, client.y), *view.peek(), DRAG_THRESHOLD));
            },
            onmousemove: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                pan((client.x, client.y));
            },
            onmouseup: move |_| gesture.set(Gesture::Idle),
            onmouseleave: move |_| {
                gesture.set(Gesture::Idle);
                hover.set(None);
            },
            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                commit(Viewport::default());
            },

            ontouchstart: move |evt: Event<TouchData>| {
                match touch_points(&evt).as_slice() {
                    [point] => {
                        gesture.set(Gesture::pan_from(*point, *view.peek(), TOUCH_DRAG_THRESHOLD));
                    }
                    [a, b, ..] => {
                        evt.prevent_default();
                        gesture.set(Gesture::pinch_from(*a, *b, *view.peek()));
                        hover.set(None);
                    }
                    [] => {}
                }
            },
            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let points = touch_points(&evt);
                let current_gesture = *gesture.peek();
                match (current_gesture, points.as_slice()) {
                    (Gesture::Pinch { distance, midpoint, start }, [a, b, ..]) if distance >= 1.0 => {
                        let Some(rect) = container_rect() else { return };
                        let zoom = (start.zoom * point_distance(*a, *b) / distance).clamp(ZOOM_MIN, ZOOM_MAX);
                        let cursor = coords::client_to_container(midpoint.0, midpoint.1, rect.left(), rect.top());
                        commit(start.zoomed_at(cursor, zoom).clamped(rect.width(), rect.height()));
                    }
                    (Gesture::Pan { .. }, [point]) => pan(*point),
                    _ => {}
                }
            },
            ontouchend: move |evt: Event<TouchData>| {
                if evt.data().touches().is_empty() {
                    gesture.set(Gesture::Idle);
                }
            },
            ontouchcancel: move |_| gesture.set(Gesture::Idle),

            div {
                class: "map-inner",
                style: "{transform_style}",

                div { class: "base-map", dangerous_inner_html: "{base_svg}" }

                div { class: "marker-layer",
                    for marker in markers.iter() {
                        MarkerPin {
                            key: "{marker.dom_key()}",
                            marker: marker.clone(),
                            zoom: marker_zoom,
                            hover: hover,
                        }
                    }
                }
            }

            if let Some(h) = current_hover {
                Tooltip { hover: h }
            }
        }
    }
}

use atlas_shared::projection::{MAP_HEIGHT_PX, MAP_WIDTH_PX};

/// Tooltip offset from the cursor, in screen pixels.
pub const TOOLTIP_OFFSET_X: f64 = 12.0;
pub const TOOLTIP_OFFSET_Y: f64 = -28.0;

/// Convert native canvas pixels to percentages of the rendered map.
///
/// Markers are absolutely positioned HTML inside the zoom/pan wrapper, so
/// percentages keep them glued to the base map at any container size.
pub fn canvas_to_percent(x: f64, y: f64) -> (f64, f64) {
    (x / MAP_WIDTH_PX * 100.0, y / MAP_HEIGHT_PX * 100.0)
}

/// Scale applied to markers so they keep their screen size while zoomed.
pub fn marker_scale(zoom: f64) -> f64 {
    if zoom > 0.0 {
        1.0 / zoom
    } else {
        1.0
    }
}

/// Viewport position of the tooltip for a cursor at `(client_x, client_y)`.
pub fn tooltip_position(client_x: f64, client_y: f64) -> (f64, f64) {
    (client_x + TOOLTIP_OFFSET_X, client_y + TOOLTIP_OFFSET_Y)
}

/// Container-relative coordinates of a viewport point.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

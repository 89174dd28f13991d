/// Natural Earth projection onto the native map canvas.
///
/// The map is drawn once into a fixed 1280x720 SVG viewBox; zoom and pan are
/// CSS transforms on top of it, so nothing is re-projected on resize.
// Native canvas dimensions in SVG user units
pub const MAP_WIDTH_PX: f64 = 1280.0;
pub const MAP_HEIGHT_PX: f64 = 720.0;

/// Longitude/latitude the canvas is centered on, in degrees.
pub const MAP_CENTER: (f64, f64) = (72.0, 0.0);

/// Spacing of graticule lines, in degrees.
pub const GRATICULE_STEP: f64 = 10.0;

// Sampling step along graticule lines, in degrees
const GRATICULE_PRECISION: f64 = 2.5;

/// Unscaled Natural Earth I projection of radians.
pub fn natural_earth_raw(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let x = lambda
        * (0.8707 - 0.131979 * phi2
            + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
    let y = phi
        * (1.007226
            + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
    (x, y)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaturalEarth {
    scale: f64,
    translate: (f64, f64),
    // Raw projection of the center point
    origin: (f64, f64),
}

impl NaturalEarth {
    pub fn new(scale: f64, center: (f64, f64), translate: (f64, f64)) -> Self {
        Self {
            scale,
            translate,
            origin: natural_earth_raw(center.0.to_radians(), center.1.to_radians()),
        }
    }

    /// Scale `width / 3`, centered on [`MAP_CENTER`] in the middle of the canvas.
    pub fn for_canvas(width: f64, height: f64) -> Self {
        Self::new(width / 3.0, MAP_CENTER, (width / 2.0, height / 2.0))
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Project `(lon, lat)` in degrees to canvas pixels (y grows downwards).
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = natural_earth_raw(lon.to_radians(), lat.to_radians());
        (
            self.translate.0 + self.scale * (x - self.origin.0),
            self.translate.1 - self.scale * (y - self.origin.1),
        )
    }

    /// SVG path data for closed rings of `(lon, lat)` points. Rings that
    /// cross the ±180° meridian are cut there and closed along the map edge.
    pub fn polygon_path(&self, rings: &[Vec<(f64, f64)>]) -> String {
        let mut out = String::new();
        for ring in rings {
            for piece in clip_ring(ring) {
                if self.push_points(&mut out, &piece) {
                    out.push('Z');
                }
            }
        }
        out
    }

    /// SVG path data for open lines of `(lon, lat)` points.
    pub fn line_path(&self, lines: &[Vec<(f64, f64)>]) -> String {
        let mut out = String::new();
        for line in lines {
            for segment in split_at_antimeridian(line) {
                self.push_points(&mut out, segment);
            }
        }
        out
    }

    /// Append one subpath; returns false when there is nothing to draw.
    fn push_points(&self, out: &mut String, points: &[(f64, f64)]) -> bool {
        if points.len() < 2 {
            return false;
        }
        for (i, &(lon, lat)) in points.iter().enumerate() {
            let (x, y) = self.project(lon, lat);
            let cmd = if i == 0 { 'M' } else { 'L' };
            out.push_str(&format!("{cmd}{x:.1},{y:.1}"));
        }
        true
    }
}

impl Default for NaturalEarth {
    fn default() -> Self {
        Self::for_canvas(MAP_WIDTH_PX, MAP_HEIGHT_PX)
    }
}

/// Split a line wherever consecutive points jump across the ±180° meridian,
/// so the projected path does not streak across the whole map.
fn split_at_antimeridian(line: &[(f64, f64)]) -> Vec<&[(f64, f64)]> {
    let mut segments = Vec::new();
    let mut start = 0;
    for i in 1..line.len() {
        if (line[i].0 - line[i - 1].0).abs() > 180.0 {
            segments.push(&line[start..i]);
            start = i;
        }
    }
    if start < line.len() {
        segments.push(&line[start..]);
    }
    segments
}

/// Latitude where the segment `a -> b` meets the ±180° meridian on `a`'s side.
fn crossing_latitude(a: (f64, f64), b: (f64, f64)) -> f64 {
    let edge = 180.0_f64.copysign(a.0);
    let b_lon = b.0 + 360.0_f64.copysign(a.0);
    let span = b_lon - a.0;
    if span.abs() < 1e-12 {
        return a.1;
    }
    a.1 + (edge - a.0) / span * (b.1 - a.1)
}

/// Cut a closed ring at every antimeridian crossing. Each piece starts and
/// ends on the map edge and is closed along it, so no fill spans the map.
/// Rings that never cross come back unchanged.
fn clip_ring(ring: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut pieces: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for &point in ring {
        if let Some(&prev) = current.last() {
            if (point.0 - prev.0).abs() > 180.0 {
                let edge = 180.0_f64.copysign(prev.0);
                let lat = crossing_latitude(prev, point);
                current.push((edge, lat));
                pieces.push(std::mem::replace(&mut current, vec![(-edge, lat)]));
            }
        }
        current.push(point);
    }
    if pieces.is_empty() {
        return vec![current];
    }

    // The ring is closed, so the last piece runs on into the first
    current.extend(pieces[0].iter().skip(1));
    pieces[0] = current;

    for piece in &mut pieces {
        close_along_edge(piece);
    }
    pieces
}

/// Walk from the piece's last point back to its first along the map edge.
/// Ends on opposite edges are joined around the nearer pole.
fn close_along_edge(piece: &mut Vec<(f64, f64)>) {
    let (Some(&start), Some(&end)) = (piece.first(), piece.last()) else {
        return;
    };
    if start.0.abs() < 180.0 || end.0.abs() < 180.0 {
        return;
    }
    if start.0 == end.0 {
        piece.extend(sample(end.1, start.1, |lat| (end.0, lat)));
    } else {
        let pole = if start.1 + end.1 < 0.0 { -90.0 } else { 90.0 };
        piece.extend(sample(end.1, pole, |lat| (end.0, lat)));
        piece.extend(sample(end.0, start.0, |lon| (lon, pole)));
        piece.extend(sample(pole, start.1, |lat| (start.0, lat)));
    }
}

/// Meridians and parallels every `step` degrees, as `(lon, lat)` lines.
///
/// Meridians stop at ±80° except on multiples of 90°, which run pole to pole.
pub fn graticule(step: f64) -> Vec<Vec<(f64, f64)>> {
    let mut lines = Vec::new();
    if step <= 0.0 {
        return lines;
    }

    let mut lon = -180.0;
    while lon <= 180.0 {
        let extent = if lon % 90.0 == 0.0 { 90.0 } else { 80.0 };
        lines.push(sample(-extent, extent, |lat| (lon, lat)));
        lon += step;
    }

    let mut lat = -80.0;
    while lat <= 80.0 {
        lines.push(sample(-180.0, 180.0, |lon| (lon, lat)));
        lat += step;
    }
    lines
}

/// Points every [`GRATICULE_PRECISION`] degrees from `from` to `to`, either way.
fn sample(from: f64, to: f64, point: impl Fn(f64) -> (f64, f64)) -> Vec<(f64, f64)> {
    let n = ((to - from).abs() / GRATICULE_PRECISION).ceil().max(1.0) as usize;
    (0..=n)
        .map(|i| {
            if i == n {
                point(to)
            } else {
                point(from + (to - from) * i as f64 / n as f64)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_maps_to_canvas_middle() {
        let projection = NaturalEarth::default();
        let (x, y) = projection.project(72.0, 0.0);
        assert!((x - MAP_WIDTH_PX / 2.0).abs() < 1e-9);
        assert!((y - MAP_HEIGHT_PX / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_is_a_third_of_width() {
        assert!((NaturalEarth::default().scale() - MAP_WIDTH_PX / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_north_is_up_and_east_is_right() {
        let projection = NaturalEarth::default();
        let (_, y_north) = projection.project(72.0, 40.0);
        let (_, y_south) = projection.project(72.0, -40.0);
        assert!(y_north < MAP_HEIGHT_PX / 2.0);
        assert!(y_south > MAP_HEIGHT_PX / 2.0);

        let (x_east, _) = projection.project(100.0, 0.0);
        assert!(x_east > MAP_WIDTH_PX / 2.0);
    }

    #[test]
    fn test_raw_projection_known_values() {
        let (x, y) = natural_earth_raw(0.0, 0.0);
        assert_eq!((x, y), (0.0, 0.0));

        // Equator: x = 0.8707 * lambda
        let (x, _) = natural_earth_raw(std::f64::consts::PI, 0.0);
        assert!((x - 0.8707 * std::f64::consts::PI).abs() < 1e-9);

        // Symmetric in latitude
        let (_, north) = natural_earth_raw(0.5, 0.7);
        let (_, south) = natural_earth_raw(0.5, -0.7);
        assert!((north + south).abs() < 1e-12);
    }

    #[test]
    fn test_polygon_path_closes_rings() {
        let projection = NaturalEarth::default();
        let ring = vec![(70.0, 10.0), (75.0, 10.0), (75.0, 15.0), (70.0, 10.0)];
        let d = projection.polygon_path(&[ring]);
        assert!(d.starts_with('M'));
        assert!(d.ends_with('Z'));
        assert_eq!(d.matches('L').count(), 3);
    }

    #[test]
    fn test_path_splits_at_antimeridian() {
        let projection = NaturalEarth::default();
        let line = vec![(170.0, 0.0), (179.0, 0.0), (-179.0, 0.0), (-170.0, 0.0)];
        let d = projection.line_path(&[line]);
        assert_eq!(d.matches('M').count(), 2);
        assert!(!d.contains('Z'));
    }

    /// Projected x range of each subpath in `d`.
    fn subpath_widths(d: &str) -> Vec<f64> {
        d.split('M')
            .filter(|sub| !sub.is_empty())
            .map(|sub| {
                let xs: Vec<f64> = sub
                    .trim_end_matches('Z')
                    .split('L')
                    .map(|pt| pt.split(',').next().unwrap().parse().unwrap())
                    .collect();
                let min = xs.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                max - min
            })
            .collect()
    }

    #[test]
    fn test_ring_across_antimeridian_is_clipped() {
        let projection = NaturalEarth::default();
        let ring = vec![
            (170.0, 60.0),
            (-170.0, 60.0),
            (-170.0, 70.0),
            (170.0, 70.0),
            (170.0, 60.0),
        ];
        let d = projection.polygon_path(&[ring]);
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('Z').count(), 2);
        // Neither piece spans the map
        assert!(subpath_widths(&d).iter().all(|w| *w < MAP_WIDTH_PX / 4.0));
    }

    #[test]
    fn test_clip_ring_meets_the_edge_at_the_crossing() {
        let ring = vec![(170.0, 60.0), (-170.0, 70.0), (-170.0, 50.0), (170.0, 60.0)];
        let pieces = clip_ring(&ring);
        assert_eq!(pieces.len(), 2);
        assert!(pieces[1].contains(&(-180.0, 65.0)));
        assert!(pieces[0].iter().all(|p| p.0 >= 170.0));
        assert!(pieces[1].iter().all(|p| p.0 <= -170.0));
    }

    #[test]
    fn test_polar_ring_closes_around_the_pole() {
        let ring = vec![(-180.0, -80.0), (0.0, -70.0), (180.0, -80.0), (-180.0, -80.0)];
        let pieces = clip_ring(&ring);
        assert_eq!(pieces.len(), 1);
        assert!(pieces[0].contains(&(0.0, -90.0)));
        assert!(pieces[0].iter().all(|p| p.1 < 0.0));
    }

    #[test]
    fn test_unsplit_ring_is_unchanged() {
        let ring = vec![(70.0, 10.0), (75.0, 10.0), (75.0, 15.0), (70.0, 10.0)];
        assert_eq!(clip_ring(&ring), vec![ring]);
    }

    #[test]
    fn test_graticule_line_counts() {
        let lines = graticule(GRATICULE_STEP);
        // 37 meridians (-180..=180) and 17 parallels (-80..=80)
        assert_eq!(lines.len(), 37 + 17);

        let greenwich = &lines[18];
        assert_eq!(greenwich.first(), Some(&(0.0, -90.0)));
        assert_eq!(greenwich.last(), Some(&(0.0, 90.0)));

        let ten_east = &lines[19];
        assert_eq!(ten_east.first(), Some(&(10.0, -80.0)));
    }

    #[test]
    fn test_graticule_rejects_non_positive_step() {
        assert!(graticule(0.0).is_empty());
    }
}

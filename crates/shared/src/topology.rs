//! TopoJSON decoding and the projected world base map.
//!
//! Only what the base map needs is decoded: polygon and multipolygon
//! geometries of one named object, with quantized (delta-encoded) or
//! absolute arcs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TopologyError;
use crate::projection::{self, NaturalEarth};

/// Object holding country outlines in world-atlas topologies.
pub const COUNTRIES_OBJECT: &str = "countries";

#[derive(Debug, Clone, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ArcRefs {
    Line(Vec<i64>),
    Polygon(Vec<Vec<i64>>),
    MultiPolygon(Vec<Vec<Vec<i64>>>),
}

#[derive(Debug, Clone, Deserialize)]
struct GeometryObject {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    arcs: Option<ArcRefs>,
    #[serde(default)]
    geometries: Vec<GeometryObject>,
    #[serde(default)]
    properties: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    objects: HashMap<String, GeometryObject>,
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    transform: Option<Transform>,
}

/// One decoded polygonal feature; holes are just further rings.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: Option<String>,
    pub rings: Vec<Vec<(f64, f64)>>,
}

impl Topology {
    pub fn from_json(text: &str) -> Result<Self, TopologyError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Polygonal shapes of a named object. Non-polygon geometries are skipped.
    pub fn shapes(&self, object: &str) -> Result<Vec<Shape>, TopologyError> {
        let root = self
            .objects
            .get(object)
            .ok_or_else(|| TopologyError::MissingObject(object.to_string()))?;
        let arcs = self.decode_arcs();

        let mut shapes = Vec::new();
        let mut pending = vec![root];
        while let Some(geometry) = pending.pop() {
            match (geometry.kind.as_deref(), &geometry.arcs) {
                (Some("GeometryCollection"), _) => {
                    pending.extend(geometry.geometries.iter().rev());
                }
                (Some("Polygon"), Some(ArcRefs::Polygon(rings))) => {
                    shapes.push(Shape {
                        name: geometry.name(),
                        rings: rings
                            .iter()
                            .map(|ring| stitch(&arcs, ring))
                            .collect::<Result<_, _>>()?,
                    });
                }
                (Some("MultiPolygon"), Some(ArcRefs::MultiPolygon(polygons))) => {
                    shapes.push(Shape {
                        name: geometry.name(),
                        rings: polygons
                            .iter()
                            .flatten()
                            .map(|ring| stitch(&arcs, ring))
                            .collect::<Result<_, _>>()?,
                    });
                }
                // An empty arc list deserializes as a line.
                (Some("Polygon" | "MultiPolygon"), Some(ArcRefs::Line(refs))) if refs.is_empty() => {}
                (kind, _) => {
                    tracing::debug!(object, kind = ?kind, "Skipping non-polygon geometry");
                }
            }
        }
        Ok(shapes)
    }

    /// Arcs in longitude/latitude, undoing quantization when present.
    fn decode_arcs(&self) -> Vec<Vec<(f64, f64)>> {
        self.arcs
            .iter()
            .map(|arc| {
                let points = arc
                    .iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| (p[0], p[1]));
                let decoded: Vec<(f64, f64)> = match &self.transform {
                    Some(t) => {
                        let (mut x, mut y) = (0.0, 0.0);
                        points
                            .map(|(dx, dy)| {
                                x += dx;
                                y += dy;
                                (
                                    x * t.scale[0] + t.translate[0],
                                    y * t.scale[1] + t.translate[1],
                                )
                            })
                            .collect()
                    }
                    None => points.collect(),
                };
                decoded
            })
            .collect()
    }
}

impl GeometryObject {
    fn name(&self) -> Option<String> {
        self.properties
            .as_ref()?
            .get("name")?
            .as_str()
            .map(str::to_string)
    }
}

/// Join arcs into one ring. A negative index `i` refers to arc `!i`
/// traversed backwards; each arc after the first drops its first point,
/// which repeats the previous arc's last one.
fn stitch(arcs: &[Vec<(f64, f64)>], refs: &[i64]) -> Result<Vec<(f64, f64)>, TopologyError> {
    let mut ring: Vec<(f64, f64)> = Vec::new();
    for &index in refs {
        let (position, reversed) = if index >= 0 {
            (index, false)
        } else {
            (!index, true)
        };
        let arc = usize::try_from(position)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or(TopologyError::ArcOutOfRange(index))?;

        let skip = usize::from(!ring.is_empty());
        if reversed {
            ring.extend(arc.iter().rev().skip(skip));
        } else {
            ring.extend(arc.iter().skip(skip));
        }
    }
    Ok(ring)
}

/// The projected base map: one path per land shape plus the graticule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldMap {
    pub width: f64,
    pub height: f64,
    pub land_paths: Vec<String>,
    pub graticule_path: String,
}

impl WorldMap {
    pub fn build(topology: &Topology, object: &str) -> Result<Self, TopologyError> {
        let projection = NaturalEarth::default();
        let land_paths = topology
            .shapes(object)?
            .iter()
            .map(|shape| projection.polygon_path(&shape.rings))
            .filter(|d| !d.is_empty())
            .collect();
        Ok(Self {
            width: projection::MAP_WIDTH_PX,
            height: projection::MAP_HEIGHT_PX,
            land_paths,
            graticule_path: projection
                .line_path(&projection::graticule(projection::GRATICULE_STEP)),
        })
    }
}

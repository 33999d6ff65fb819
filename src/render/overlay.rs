//! Natural Earth map features read from GeoJSON.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::clip::{clip_polygon, clip_polyline, Point};
use crate::dataset::Extent;

/// Overlay layers, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFeature {
    Land,
    Coastline,
    Borders,
    States,
}

impl MapFeature {
    pub const ALL: [MapFeature; 4] = [
        MapFeature::Land,
        MapFeature::Coastline,
        MapFeature::Borders,
        MapFeature::States,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            MapFeature::Land => "ne_50m_land.geojson",
            MapFeature::Coastline => "ne_50m_coastline.geojson",
            MapFeature::Borders => "ne_50m_admin_0_boundary_lines_land.geojson",
            MapFeature::States => "ne_50m_admin_1_states_provinces_lines.geojson",
        }
    }

    pub fn is_area(&self) -> bool {
        matches!(self, MapFeature::Land)
    }
}

/// A filled area: one exterior ring and any interior rings cut from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Area {
    pub exterior: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
}

/// Geometry of one feature layer, clipped to the map extent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    pub lines: Vec<Vec<Point>>,
    pub areas: Vec<Area>,
}

impl Layer {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.areas.is_empty()
    }

    fn push_polygon(&mut self, rings: &[Vec<Position>], extent: &Extent) {
        let mut rings = rings.iter().map(|ring| clip_polygon(&to_points(ring), extent));

        let exterior = match rings.next() {
            Some(exterior) if !exterior.is_empty() => exterior,
            _ => return,
        };
        self.areas.push(Area {
            exterior,
            holes: rings.filter(|hole| !hole.is_empty()).collect(),
        });
    }

    fn push_geometry(&mut self, geometry: &Geometry, extent: &Extent) {
        match geometry {
            Geometry::Point { .. } | Geometry::MultiPoint { .. } => {}
            Geometry::LineString { coordinates } => {
                self.lines.extend(clip_polyline(&to_points(coordinates), extent));
            }
            Geometry::MultiLineString { coordinates } => {
                for line in coordinates {
                    self.lines.extend(clip_polyline(&to_points(line), extent));
                }
            }
            Geometry::Polygon { coordinates } => self.push_polygon(coordinates, extent),
            Geometry::MultiPolygon { coordinates } => {
                for polygon in coordinates {
                    self.push_polygon(polygon, extent);
                }
            }
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    self.push_geometry(geometry, extent);
                }
            }
        }
    }
}

/// Loaded overlay layers.
#[derive(Debug, Clone, Default)]
pub struct Overlays {
    pub land: Option<Layer>,
    /// Line layers in drawing order.
    pub lines: Vec<Layer>,
}

impl Overlays {
    /// Loads every layer found in `dir`. Missing files are skipped with a
    /// warning; unreadable ones are errors.
    pub fn load(dir: &Path, extent: &Extent) -> Result<Self> {
        let mut overlays = Overlays::default();

        for feature in MapFeature::ALL {
            let path = dir.join(feature.file_name());
            if !path.is_file() {
                eprintln!(
                    "Warning: `{}` not found, skipping {:?} overlay",
                    path.display(),
                    feature
                );
                continue;
            }

            let layer = load_layer(&path, extent)?;
            if feature.is_area() {
                overlays.land = Some(layer);
            } else if !layer.is_empty() {
                overlays.lines.push(layer);
            }
        }

        Ok(overlays)
    }
}

/// Default location of the Natural Earth files.
pub fn default_features_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(crate::settings::FEATURES_SUBDIR))
}

/// A GeoJSON position. Altitudes are not supported.
type Position = [f64; 2];

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Point {
        #[allow(dead_code)]
        coordinates: Position,
    },
    MultiPoint {
        #[allow(dead_code)]
        coordinates: Vec<Position>,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
}

#[derive(Debug, Deserialize)]
enum FeatureTag {
    Feature,
}

#[derive(Debug, Deserialize)]
enum FeatureCollectionTag {
    FeatureCollection,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(rename = "type")]
    _type: FeatureTag,
    /// `null` for features without geometry.
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    _type: FeatureCollectionTag,
    features: Vec<Feature>,
}

/// Any GeoJSON document: a FeatureCollection, a Feature or a bare geometry.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeoJson {
    FeatureCollection(FeatureCollection),
    Feature(Feature),
    Geometry(Geometry),
}

fn to_points(positions: &[Position]) -> Vec<Point> {
    positions.iter().map(|&[lon, lat]| (lon, lat)).collect()
}

fn load_layer(path: &Path, extent: &Extent) -> Result<Layer> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;

    parse_geojson(&text, extent).with_context(|| format!("malformed GeoJSON in `{}`", path.display()))
}

/// Collects line and area geometry from a GeoJSON document, clipped to
/// `extent`.
pub fn parse_geojson(text: &str, extent: &Extent) -> Result<Layer> {
    let document: GeoJson = serde_json::from_str(text)?;

    let mut layer = Layer::default();
    match document {
        GeoJson::FeatureCollection(collection) => {
            for feature in &collection.features {
                if let Some(geometry) = &feature.geometry {
                    layer.push_geometry(geometry, extent);
                }
            }
        }
        GeoJson::Feature(feature) => {
            if let Some(geometry) = &feature.geometry {
                layer.push_geometry(geometry, extent);
            }
        }
        GeoJson::Geometry(geometry) => layer.push_geometry(&geometry, extent),
    }

    Ok(layer)
}

// -- Tests -------------------------------------------------------------------

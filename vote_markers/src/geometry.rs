use log::debug;
use std::collections::HashMap;

use crate::config::*;

/// Returns the placement point of a shape.
///
/// - For a polygon, it is the area centroid of the outer ring. Holes are ignored.
/// - For a multi-polygon, it is the middle of the bounding box of all the outer rings.
/// This is a cheap approximation that is good enough for shapes made of disjoint
/// parts. The point is not guaranteed to fall inside any of the parts.
///
/// `region_id` is only used for reporting errors.
pub fn centroid(region_id: &str, geometry: &Geometry) -> Result<Position, MarkerErrors> {
    match geometry {
        Geometry::Polygon(rings) => rings
            .first()
            .and_then(|outer| ring_centroid(outer))
            .ok_or_else(|| MarkerErrors::DegenerateGeometry(region_id.to_string())),
        Geometry::MultiPolygon(polygons) => {
            let outer_positions: Vec<&Position> = polygons
                .iter()
                .filter_map(|rings| rings.first())
                .flatten()
                .collect();
            let (x_min, x_max) = extent(outer_positions.iter().map(|p| p[0]))
                .ok_or_else(|| MarkerErrors::DegenerateGeometry(region_id.to_string()))?;
            let (y_min, y_max) = extent(outer_positions.iter().map(|p| p[1]))
                .ok_or_else(|| MarkerErrors::DegenerateGeometry(region_id.to_string()))?;
            Ok([(x_min + x_max) / 2.0, (y_min + y_max) / 2.0])
        }
        Geometry::Unsupported(tpe) => Err(MarkerErrors::UnsupportedGeometry(
            region_id.to_string(),
            tpe.clone(),
        )),
    }
}

// Works for both closed and open rings: a repeated closing position adds a
// zero-length edge that does not contribute.
fn ring_centroid(ring: &[Position]) -> Option<Position> {
    let mut b = *ring.last()?;
    let mut k = 0.0;
    let mut x = 0.0;
    let mut y = 0.0;
    for pos in ring.iter() {
        let a = b;
        b = *pos;
        let c = a[0] * b[1] - b[0] * a[1];
        k += c;
        x += (a[0] + b[0]) * c;
        y += (a[1] + b[1]) * c;
    }
    if k == 0.0 {
        return None;
    }
    k *= 3.0;
    Some([x / k, y / k])
}

fn extent<I: Iterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Combines the shapes of several regions into one shape.
///
/// The allocator calls it each time votes pooled from multiple regions
/// complete a marker; the marker is placed at the centroid of the result.
pub trait ShapeMerger {
    fn merge(&self, region_ids: &[String]) -> Result<Geometry, MarkerErrors>;
}

impl<F> ShapeMerger for F
where
    F: Fn(&[String]) -> Result<Geometry, MarkerErrors>,
{
    fn merge(&self, region_ids: &[String]) -> Result<Geometry, MarkerErrors> {
        self(region_ids)
    }
}

/// A shape merger that does not dissolve shared borders.
///
/// The parts of all the requested regions are collected, in order, into a single
/// multi-polygon. A single polygon stays a polygon.
pub struct RegionUnion<'a> {
    shapes: HashMap<&'a str, &'a Geometry>,
}

impl<'a> RegionUnion<'a> {
    pub fn new(regions: &'a [Region]) -> RegionUnion<'a> {
        RegionUnion {
            shapes: regions
                .iter()
                .map(|r| (r.id.as_str(), &r.geometry))
                .collect(),
        }
    }
}

impl<'a> ShapeMerger for RegionUnion<'a> {
    fn merge(&self, region_ids: &[String]) -> Result<Geometry, MarkerErrors> {
        let mut parts: Vec<Vec<Ring>> = Vec::new();
        for rid in region_ids.iter() {
            let geometry = self
                .shapes
                .get(rid.as_str())
                .ok_or_else(|| MarkerErrors::UnknownRegion(rid.clone()))?;
            match geometry {
                Geometry::Polygon(rings) => parts.push(rings.clone()),
                Geometry::MultiPolygon(polygons) => parts.extend(polygons.iter().cloned()),
                Geometry::Unsupported(tpe) => {
                    return Err(MarkerErrors::UnsupportedGeometry(rid.clone(), tpe.clone()));
                }
            }
        }
        debug!(
            "RegionUnion::merge: {:?} -> {} parts",
            region_ids,
            parts.len()
        );
        if parts.len() == 1 {
            Ok(Geometry::Polygon(parts.remove(0)))
        } else {
            Ok(Geometry::MultiPolygon(parts))
        }
    }
}

// Joins the geometry, vote and adjacency files into regions.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use vote_markers::{Geometry, Position, Region, Ring};

use crate::markers::{
    config_reader::read_js_int,
    io_common::{read_js_id, read_json_file},
    *,
};

#[derive(Debug, Clone, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
struct Feature {
    id: Option<JSValue>,
    geometry: Option<JSValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct NeighborRecord {
    neighbors: Vec<JSValue>,
}

/// Where to find the data, and how to read it.
pub struct RegionSources<'a> {
    pub geometry_path: &'a str,
    pub votes_path: &'a str,
    pub neighbors_path: &'a str,
    pub group_property: &'a str,
    pub candidates: &'a [String],
}

/// Reads all the regions, in the order of the geometry file.
///
/// Features that have no vote record are skipped.
pub fn read_regions(sources: &RegionSources) -> CliResult<Vec<Region>> {
    let geometry_js = read_json_file(sources.geometry_path)?;
    let collection: FeatureCollection =
        serde_json::from_value(geometry_js).context(ParsingJsonSnafu {
            path: sources.geometry_path,
        })?;

    let votes_js = read_json_file(sources.votes_path)?;
    let vote_records = votes_js.as_object().context(InvalidRecordSnafu {
        path: sources.votes_path,
        id: "",
        reason: "expected an object indexed by region id",
    })?;

    let neighbors_js = read_json_file(sources.neighbors_path)?;
    let neighbor_records: HashMap<String, NeighborRecord> = serde_json::from_value(neighbors_js)
        .context(ParsingJsonSnafu {
            path: sources.neighbors_path,
        })?;

    let mut regions: Vec<Region> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (idx, feature) in collection.features.iter().enumerate() {
        let id = feature
            .id
            .as_ref()
            .and_then(read_js_id)
            .context(InvalidRecordSnafu {
                path: sources.geometry_path,
                id: format!("#{}", idx),
                reason: "the feature has no id",
            })?;
        let record = match vote_records.get(&id) {
            Some(r) => r,
            None => {
                warn!("read_regions: no votes for region {}, skipping it", id);
                continue;
            }
        };
        seen.insert(id.clone());

        let group = read_js_id(&record[sources.group_property]).context(InvalidRecordSnafu {
            path: sources.votes_path,
            id: id.clone(),
            reason: format!("missing group property {:?}", sources.group_property),
        })?;

        // Candidates without a count are left out: the allocation reports them.
        let mut votes: HashMap<String, u64> = HashMap::new();
        for cand in sources.candidates.iter() {
            if let Some(js) = record.get(cand) {
                votes.insert(cand.clone(), read_js_int(js)?);
            }
        }

        let neighbors: Vec<String> = match neighbor_records.get(&id) {
            Some(nr) => nr.neighbors.iter().filter_map(read_js_id).collect(),
            None => {
                debug!("read_regions: no neighbors for region {}", id);
                vec![]
            }
        };

        let geometry = match &feature.geometry {
            Some(js) => parse_geometry(js, sources.geometry_path)?,
            None => Geometry::Unsupported("null".to_string()),
        };

        regions.push(Region {
            id,
            group,
            votes,
            neighbors,
            geometry,
        });
    }

    for id in vote_records.keys() {
        if !seen.contains(id) {
            warn!("read_regions: votes for region {} have no shape, ignoring them", id);
        }
    }
    info!(
        "read_regions: {} regions read from {}",
        regions.len(),
        sources.geometry_path
    );
    Ok(regions)
}

pub fn parse_geometry(js: &JSValue, path: &str) -> CliResult<Geometry> {
    let tpe = js["type"].as_str().unwrap_or("null");
    match tpe {
        "Polygon" => {
            let coords: Vec<Vec<Vec<f64>>> =
                serde_json::from_value(js["coordinates"].clone()).context(ParsingJsonSnafu { path })?;
            Ok(Geometry::Polygon(to_rings(&coords, path)?))
        }
        "MultiPolygon" => {
            let coords: Vec<Vec<Vec<Vec<f64>>>> =
                serde_json::from_value(js["coordinates"].clone()).context(ParsingJsonSnafu { path })?;
            let mut polygons: Vec<Vec<Ring>> = Vec::new();
            for p in coords.iter() {
                polygons.push(to_rings(p, path)?);
            }
            Ok(Geometry::MultiPolygon(polygons))
        }
        x => Ok(Geometry::Unsupported(x.to_string())),
    }
}

// Positions may carry an altitude, which is dropped.
fn to_rings(coords: &[Vec<Vec<f64>>], path: &str) -> CliResult<Vec<Ring>> {
    let mut rings: Vec<Ring> = Vec::new();
    for ring in coords.iter() {
        let mut r: Ring = Vec::new();
        for pos in ring.iter() {
            let p: Position = match pos.as_slice() {
                [x, y, ..] => [*x, *y],
                _ => {
                    return InvalidRecordSnafu {
                        path,
                        id: "",
                        reason: format!("invalid position {:?}", pos),
                    }
                    .fail();
                }
            };
            r.push(p);
        }
        rings.push(r);
    }
    Ok(rings)
}

pub use log::{debug, info, warn};

pub use snafu::{prelude::*, ErrorCompat};
use vote_markers::*;

pub use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;
pub use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::markers::config_reader::*;
use crate::markers::io_common::resolve_path;
use crate::markers::io_geojson::{read_regions, RegionSources};

pub mod config_reader;
mod io_common;
mod io_geojson;

const DEFAULT_GROUP_PROPERTY: &str = "state";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MarkerCliError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Could not understand number {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("Invalid record {id} in {path}: {reason}"))]
    InvalidRecord {
        path: String,
        id: String,
        reason: String,
    },
    #[snafu(display("Could not find the directory of {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Missing option {name}: it must be provided in the configuration file or on the command line"))]
    MissingOption { name: String },
    #[snafu(display("Marker allocation failed: {source}"))]
    Allocation { source: MarkerErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type CliResult<T> = Result<T, MarkerCliError>;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct OutputConfig {
    contest: String,
    #[serde(rename = "votesPerMarker")]
    votes_per_marker: String,
    candidates: Vec<ConfigCandidate>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
struct OutputMarker {
    #[serde(rename = "candidateId")]
    candidate: String,
    #[serde(rename = "regionIds")]
    region_ids: Vec<String>,
    x: f64,
    y: f64,
    kind: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct OutputTally {
    group: String,
    candidate: String,
    #[serde(rename = "totalVotes")]
    total_votes: String,
    #[serde(rename = "directMarkers")]
    direct_markers: String,
    #[serde(rename = "pooledMarkers")]
    pooled_markers: String,
    #[serde(rename = "droppedVotes")]
    dropped_votes: String,
}

/// The settings of one run, after merging the configuration file and the
/// command line.
#[derive(Eq, PartialEq, Debug, Clone)]
struct RunSettings {
    contest_name: String,
    geometry_path: String,
    votes_path: String,
    neighbors_path: String,
    group_property: String,
    candidates: Vec<ConfigCandidate>,
    votes_per_marker: u64,
    out: Option<String>,
}

fn require(x: Option<String>, name: &str) -> CliResult<String> {
    x.context(MissingOptionSnafu { name })
}

fn resolve_settings(args: &Args) -> CliResult<RunSettings> {
    let config: Option<MarkerConfig> = match &args.config {
        Some(p) => Some(read_config(p)?),
        None => None,
    };
    info!("config: {:?}", config);
    let root_p: Option<&Path> = match &args.config {
        Some(p) => Some(
            Path::new(p.as_str())
                .parent()
                .context(MissingParentDirSnafu { path: p })?,
        ),
        None => None,
    };
    let sources = config.as_ref().map(|c| &c.sources);

    let geometry_path = require(
        args.geometry
            .clone()
            .or_else(|| sources.map(|s| resolve_path(root_p, &s.geometry_file))),
        "geometry",
    )?;
    let votes_path = require(
        args.votes
            .clone()
            .or_else(|| sources.map(|s| resolve_path(root_p, &s.votes_file))),
        "votes",
    )?;
    let neighbors_path = require(
        args.neighbors
            .clone()
            .or_else(|| sources.map(|s| resolve_path(root_p, &s.neighbors_file))),
        "neighbors",
    )?;

    let group_property = args
        .group_property
        .clone()
        .or_else(|| sources.and_then(|s| s.group_property.clone()))
        .unwrap_or_else(|| DEFAULT_GROUP_PROPERTY.to_string());

    let candidates: Vec<ConfigCandidate> = match (&args.candidates, &config) {
        (Some(names), _) => names
            .iter()
            .map(|name| ConfigCandidate {
                name: name.clone(),
                label: None,
            })
            .collect(),
        (None, Some(c)) => c.candidates.clone(),
        (None, None) => {
            return MissingOptionSnafu { name: "candidates" }.fail();
        }
    };

    let votes_per_marker: u64 = match (args.votes_per_marker, &config) {
        (Some(x), _) => x,
        (None, Some(c)) => c.rules.votes_per_marker()?,
        (None, None) => {
            return MissingOptionSnafu {
                name: "votes-per-marker",
            }
            .fail();
        }
    };

    // 'stdout' or nothing prints the summary.
    let out = args
        .out
        .clone()
        .or_else(|| {
            config.as_ref().and_then(|c| {
                c.output_settings
                    .output_file
                    .as_ref()
                    .map(|p| resolve_path(root_p, p))
            })
        })
        .filter(|p| p != "stdout");

    let contest_name = config
        .as_ref()
        .map(|c| c.output_settings.contest_name.clone())
        .unwrap_or_default();

    Ok(RunSettings {
        contest_name,
        geometry_path,
        votes_path,
        neighbors_path,
        group_property,
        candidates,
        votes_per_marker,
        out,
    })
}

fn build_summary_js(settings: &RunSettings, res: &MarkerResult) -> JSValue {
    let c = OutputConfig {
        contest: settings.contest_name.clone(),
        votes_per_marker: res.votes_per_marker.to_string(),
        candidates: settings.candidates.clone(),
    };
    let markers: Vec<OutputMarker> = res
        .markers
        .iter()
        .map(|m| OutputMarker {
            candidate: m.candidate.clone(),
            region_ids: m.region_ids.clone(),
            x: m.x,
            y: m.y,
            kind: m.kind.as_str().to_string(),
        })
        .collect();
    let tallies: Vec<OutputTally> = res
        .tallies
        .iter()
        .map(|t| OutputTally {
            group: t.group.clone(),
            candidate: t.candidate.clone(),
            total_votes: t.total_votes.to_string(),
            direct_markers: t.direct_markers.to_string(),
            pooled_markers: t.pooled_markers.to_string(),
            dropped_votes: t.dropped_votes.to_string(),
        })
        .collect();
    json!({
        "config": c,
        "results": {
            "markers": markers,
            "tallies": tallies,
            "fingerprint": marker_fingerprint(&res.markers),
        }
    })
}

/// Runs the full pipeline: reads the inputs, allocates the markers, writes the
/// summary and optionally checks it against a reference summary.
pub fn run_markers(args: &Args) -> CliResult<()> {
    let settings = resolve_settings(args)?;
    info!("settings: {:?}", settings);

    let candidate_names: Vec<String> = settings.candidates.iter().map(|c| c.name.clone()).collect();
    let rules =
        MarkerRules::new(settings.votes_per_marker, &candidate_names).context(AllocationSnafu {})?;

    let regions = read_regions(&RegionSources {
        geometry_path: &settings.geometry_path,
        votes_path: &settings.votes_path,
        neighbors_path: &settings.neighbors_path,
        group_property: &settings.group_property,
        candidates: &candidate_names,
    })?;

    let merger = RegionUnion::new(&regions);
    let result =
        generate_markers_by_group(&regions, &rules, &merger).context(AllocationSnafu {})?;
    info!(
        "run_markers: {} markers for {} regions",
        result.markers.len(),
        regions.len()
    );

    let result_js = build_summary_js(&settings, &result);
    let pretty_js_stats =
        serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;

    match &settings.out {
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, &pretty_js_stats).context(WritingOutputSnafu { path })?;
        }
        None => {
            println!("{}", pretty_js_stats);
        }
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
        info!("The summary matches the reference {:?}", summary_p);
    }

    Ok(())
}

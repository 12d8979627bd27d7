// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// A position, as `[x, y]`.
pub type Position = [f64; 2];

/// A closed ring of positions. The first position may or may not be repeated at the end.
pub type Ring = Vec<Position>;

/// The shape of a region.
///
/// Only polygons and multi-polygons can be placed on a map. Any other shape
/// found in the input is kept as `Unsupported` and reported when a placement
/// point is requested for it.
#[derive(PartialEq, Debug, Clone)]
pub enum Geometry {
    /// A polygon: the outer ring, followed by the holes.
    Polygon(Vec<Ring>),
    /// A list of polygons.
    MultiPolygon(Vec<Vec<Ring>>),
    /// Any other shape, with the name of its type.
    Unsupported(String),
}

/// The smallest unit that carries votes (a county for example).
#[derive(PartialEq, Debug, Clone)]
pub struct Region {
    /// Unique across the whole input.
    pub id: String,
    /// The administrative area containing this region (a state for example).
    pub group: String,
    /// Number of votes, by candidate name.
    pub votes: HashMap<String, u64>,
    /// The ids of the adjacent regions. They may belong to another group.
    pub neighbors: Vec<String>,
    pub geometry: Geometry,
}

impl Region {
    /// The placement point of the region on its own.
    ///
    /// This is the point shared by all the direct markers of this region.
    pub fn centroid(&self) -> Result<Position, MarkerErrors> {
        crate::geometry::centroid(&self.id, &self.geometry)
    }
}

// ******** Output data structures *********

/// How a marker got its votes.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum MarkerKind {
    /// All the votes come from a single region that met the threshold on its own.
    Direct,
    /// The votes were pooled across adjacent regions.
    Pooled,
}

impl MarkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Direct => "direct",
            MarkerKind::Pooled => "pooled",
        }
    }
}

/// One marker, worth exactly `votes_per_marker` votes for one candidate.
#[derive(PartialEq, Debug, Clone)]
pub struct Marker {
    pub candidate: String,
    /// The regions the votes are drawn from, in the order they were visited.
    pub region_ids: Vec<String>,
    pub x: f64,
    pub y: f64,
    pub kind: MarkerKind,
}

/// Statistics for one candidate in one group.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GroupTally {
    pub group: String,
    pub candidate: String,
    pub total_votes: u64,
    pub direct_markers: u64,
    pub pooled_markers: u64,
    /// The votes that were not enough to complete one more marker.
    pub dropped_votes: u64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct MarkerResult {
    pub votes_per_marker: u64,
    pub markers: Vec<Marker>,
    pub tallies: Vec<GroupTally>,
}

/// Errors that prevent the allocation from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum MarkerErrors {
    /// The number of votes per marker must be strictly positive.
    InvalidThreshold,
    NoCandidates,
    DuplicateRegion(String),
    /// (region, candidate)
    MissingVotes(String, String),
    /// (region, geometry type)
    UnsupportedGeometry(String, String),
    /// A polygon without area.
    DegenerateGeometry(String),
    /// A region id unknown to the shape merger.
    UnknownRegion(String),
    /// The adjacency graph of a group is not connected.
    UnreachableRegions {
        group: String,
        candidate: String,
        unvisited: Vec<String>,
    },
    /// The votes of a group do not fit in a `u64`.
    VoteOverflow { group: String, candidate: String },
    /// More votes were taken from a region than it had left.
    LedgerOverdraw {
        region: String,
        candidate: String,
        requested: u64,
        remaining: u64,
    },
}

impl Error for MarkerErrors {}

impl Display for MarkerErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerErrors::InvalidThreshold => {
                write!(f, "the number of votes per marker must be positive")
            }
            MarkerErrors::NoCandidates => write!(f, "no candidates were provided"),
            MarkerErrors::DuplicateRegion(id) => write!(f, "region {} appears more than once", id),
            MarkerErrors::MissingVotes(id, cand) => {
                write!(f, "region {} has no vote count for candidate {}", id, cand)
            }
            MarkerErrors::UnsupportedGeometry(id, tpe) => {
                write!(f, "region {}: unsupported geometry type {}", id, tpe)
            }
            MarkerErrors::DegenerateGeometry(id) => {
                write!(f, "region {}: the polygon has no area", id)
            }
            MarkerErrors::UnknownRegion(id) => write!(f, "unknown region {}", id),
            MarkerErrors::UnreachableRegions {
                group,
                candidate,
                unvisited,
            } => write!(
                f,
                "group {} (candidate {}): reached the end of the stack, unreachable regions: {:?}",
                group, candidate, unvisited
            ),
            MarkerErrors::VoteOverflow { group, candidate } => write!(
                f,
                "group {} (candidate {}): the number of votes overflows",
                group, candidate
            ),
            MarkerErrors::LedgerOverdraw {
                region,
                candidate,
                requested,
                remaining,
            } => write!(
                f,
                "region {} (candidate {}): requested {} votes but only {} are left",
                region, candidate, requested, remaining
            ),
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MarkerRules {
    /// The number of votes that one marker represents.
    pub votes_per_marker: u64,
    /// The candidates, in the order in which they are processed.
    pub candidates: Vec<String>,
}

impl MarkerRules {
    pub fn new(votes_per_marker: u64, candidates: &[String]) -> Result<MarkerRules, MarkerErrors> {
        let rules = MarkerRules {
            votes_per_marker,
            candidates: candidates.to_vec(),
        };
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), MarkerErrors> {
        if self.votes_per_marker == 0 {
            return Err(MarkerErrors::InvalidThreshold);
        }
        if self.candidates.is_empty() {
            return Err(MarkerErrors::NoCandidates);
        }
        Ok(())
    }
}

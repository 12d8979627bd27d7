use std::collections::{HashMap, HashSet};

pub use crate::config::*;
use crate::geometry::RegionUnion;

/// A builder for adding regions.
///
/// The builder checks each region as it is added, so that a malformed input is
/// reported on the region that causes it.
///
/// ```
/// pub use vote_markers::builder::Builder;
/// pub use vote_markers::{Geometry, MarkerRules};
/// # use vote_markers::MarkerErrors;
///
/// let rules = MarkerRules::new(10, &["Anna".to_string(), "Bob".to_string()])?;
/// let mut builder = Builder::new(&rules)?;
///
/// let square = |x: f64| Geometry::Polygon(vec![vec![[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0]]]);
/// builder.add_region("a", "north", &[("Anna", 12), ("Bob", 4)], &["b"], square(0.0))?;
/// builder.add_region("b", "north", &[("Anna", 3), ("Bob", 9)], &["a"], square(1.0))?;
///
/// let res = builder.run()?;
/// assert_eq!(res.markers.len(), 2);
///
/// # Ok::<(), MarkerErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: MarkerRules,
    pub(crate) _regions: Vec<Region>,
    pub(crate) _ids: HashSet<String>,
}

impl Builder {
    pub fn new(rules: &MarkerRules) -> Result<Builder, MarkerErrors> {
        rules.validate()?;
        Ok(Builder {
            _rules: rules.clone(),
            _regions: Vec::new(),
            _ids: HashSet::new(),
        })
    }

    /// Adds a region.
    ///
    /// votes: the number of votes for each candidate. All the candidates of the rules
    /// must be present. Votes for other candidates are ignored.
    pub fn add_region(
        &mut self,
        id: &str,
        group: &str,
        votes: &[(&str, u64)],
        neighbors: &[&str],
        geometry: Geometry,
    ) -> Result<(), MarkerErrors> {
        let votes: HashMap<String, u64> = votes
            .iter()
            .map(|(cand, count)| (cand.to_string(), *count))
            .collect();
        self.add_region_2(Region {
            id: id.to_string(),
            group: group.to_string(),
            votes,
            neighbors: neighbors.iter().map(|s| s.to_string()).collect(),
            geometry,
        })
    }

    pub fn add_region_2(&mut self, region: Region) -> Result<(), MarkerErrors> {
        if self._ids.contains(&region.id) {
            return Err(MarkerErrors::DuplicateRegion(region.id));
        }
        for cand in self._rules.candidates.iter() {
            if !region.votes.contains_key(cand) {
                return Err(MarkerErrors::MissingVotes(region.id, cand.clone()));
            }
        }
        self._ids.insert(region.id.clone());
        self._regions.push(region);
        Ok(())
    }

    /// The regions added so far, in insertion order.
    pub fn regions(&self) -> &[Region] {
        &self._regions
    }

    /// Allocates the markers of all the regions added so far, by group.
    ///
    /// Pooled markers are placed using the shapes of the regions without
    /// dissolving their borders (see [`RegionUnion`]).
    pub fn run(&self) -> Result<MarkerResult, MarkerErrors> {
        let merger = RegionUnion::new(&self._regions);
        crate::generate_markers_by_group(&self._regions, &self._rules, &merger)
    }
}

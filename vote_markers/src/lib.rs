pub mod builder;
mod config;
mod geometry;
mod ledger;
pub mod manual;
mod traversal;

use log::{debug, info};
use std::collections::{HashMap, HashSet};

pub use crate::config::*;
pub use crate::geometry::{centroid, RegionUnion, ShapeMerger};

use crate::ledger::VoteLedger;
use crate::traversal::AdjacencyWalk;

/// Allocates the markers of every group.
///
/// The regions are partitioned by their `group` field and each group is processed
/// on its own: votes are never pooled across two groups. Groups are processed in
/// the order in which they first appear in the input, and the regions of a group
/// keep their input order. This order decides all the ties, hence the output only
/// depends on the content and the order of the input.
///
/// Arguments:
/// * `regions` all the regions
/// * `rules` the number of votes per marker and the candidates
/// * `merger` combines the shapes of the regions pooled into one marker
pub fn generate_markers_by_group<M: ShapeMerger + ?Sized>(
    regions: &[Region],
    rules: &MarkerRules,
    merger: &M,
) -> Result<MarkerResult, MarkerErrors> {
    rules.validate()?;
    check_unique_ids(regions)?;
    let centroids = region_centroids(regions)?;

    let mut group_order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, r) in regions.iter().enumerate() {
        let e = groups.entry(r.group.as_str()).or_insert_with(|| {
            group_order.push(r.group.as_str());
            Vec::new()
        });
        e.push(idx);
    }
    info!(
        "generate_markers_by_group: {} regions in {} groups, {} votes per marker",
        regions.len(),
        group_order.len(),
        rules.votes_per_marker
    );

    let mut res = MarkerResult {
        votes_per_marker: rules.votes_per_marker,
        markers: Vec::new(),
        tallies: Vec::new(),
    };
    for group in group_order {
        if let Some(members) = groups.get(group) {
            let group_regions: Vec<Region> =
                members.iter().map(|idx| regions[*idx].clone()).collect();
            let group_centroids: Vec<Position> = members.iter().map(|idx| centroids[*idx]).collect();
            let (mut markers, mut tallies) =
                allocate_group(group, &group_regions, &group_centroids, rules, merger)?;
            res.markers.append(&mut markers);
            res.tallies.append(&mut tallies);
        }
    }
    Ok(res)
}

/// Allocates the markers of a single group.
///
/// All the regions are treated as belonging to `group`, whatever their own
/// `group` field says.
pub fn generate_group_markers<M: ShapeMerger + ?Sized>(
    group: &str,
    regions: &[Region],
    rules: &MarkerRules,
    merger: &M,
) -> Result<MarkerResult, MarkerErrors> {
    rules.validate()?;
    check_unique_ids(regions)?;
    let centroids = region_centroids(regions)?;
    let (markers, tallies) = allocate_group(group, regions, &centroids, rules, merger)?;
    Ok(MarkerResult {
        votes_per_marker: rules.votes_per_marker,
        markers,
        tallies,
    })
}

/// A digest of the content of the markers, stable across runs and platforms.
///
/// Two runs over the same input produce the same fingerprint.
pub fn marker_fingerprint(markers: &[Marker]) -> String {
    let mut canonical = String::new();
    for m in markers.iter() {
        canonical.push_str(&format!(
            "{};{};{:?};{:?};{}\n",
            m.candidate,
            m.region_ids.join(","),
            m.x,
            m.y,
            m.kind.as_str()
        ));
    }
    sha256::digest(canonical.as_str())
}

fn check_unique_ids(regions: &[Region]) -> Result<(), MarkerErrors> {
    let mut seen: HashSet<&str> = HashSet::new();
    for r in regions.iter() {
        if !seen.insert(r.id.as_str()) {
            return Err(MarkerErrors::DuplicateRegion(r.id.clone()));
        }
    }
    Ok(())
}

// All the shapes are checked before the first marker is placed.
fn region_centroids(regions: &[Region]) -> Result<Vec<Position>, MarkerErrors> {
    regions.iter().map(|r| r.centroid()).collect()
}

fn vote_overflow(group: &str, candidate: &str) -> MarkerErrors {
    MarkerErrors::VoteOverflow {
        group: group.to_string(),
        candidate: candidate.to_string(),
    }
}

// The two passes over one group:
// 1. every region that has enough votes on its own gets its direct markers
// 2. for each candidate, the leftovers are pooled by walking the adjacency graph
fn allocate_group<M: ShapeMerger + ?Sized>(
    group: &str,
    regions: &[Region],
    centroids: &[Position],
    rules: &MarkerRules,
    merger: &M,
) -> Result<(Vec<Marker>, Vec<GroupTally>), MarkerErrors> {
    let threshold = rules.votes_per_marker;
    let candidates = rules.candidates.as_slice();
    let mut ledger = VoteLedger::new(regions, candidates)?;

    let mut tallies: Vec<GroupTally> = Vec::new();
    for (cidx, cand) in candidates.iter().enumerate() {
        let mut total_votes: u64 = 0;
        for ridx in 0..regions.len() {
            total_votes = total_votes
                .checked_add(ledger.remaining(cidx, ridx))
                .ok_or_else(|| vote_overflow(group, cand))?;
        }
        tallies.push(GroupTally {
            group: group.to_string(),
            candidate: cand.clone(),
            total_votes,
            direct_markers: 0,
            pooled_markers: 0,
            dropped_votes: 0,
        });
    }

    let mut markers: Vec<Marker> = Vec::new();
    if regions.is_empty() {
        return Ok((markers, tallies));
    }

    for (cidx, cand) in candidates.iter().enumerate() {
        for (ridx, region) in regions.iter().enumerate() {
            let votes = ledger.remaining(cidx, ridx);
            if votes < threshold {
                continue;
            }
            let num_markers = votes / threshold;
            let [x, y] = centroids[ridx];
            // All the copies share the same point. Spreading them apart is left
            // to the layout.
            let marker = Marker {
                candidate: cand.clone(),
                region_ids: vec![region.id.clone()],
                x,
                y,
                kind: MarkerKind::Direct,
            };
            for _ in 0..num_markers {
                markers.push(marker.clone());
            }
            ledger.consume(cidx, ridx, num_markers * threshold)?;
            tallies[cidx].direct_markers += num_markers;
        }
    }

    let index: HashMap<&str, usize> = regions
        .iter()
        .enumerate()
        .map(|(idx, r)| (r.id.as_str(), idx))
        .collect();

    for (cidx, cand) in candidates.iter().enumerate() {
        let mut walk = AdjacencyWalk::new(group, regions, &index);
        let seed = match walk.seed(&ledger, cidx) {
            Some(ridx) => ridx,
            None => continue,
        };
        let mut running = ledger.take(cidx, seed)?;
        let mut pool: Vec<usize> = vec![seed];
        debug!(
            "allocate_group: {}: {}: seeding with {} ({} votes)",
            group, cand, regions[seed].id, running
        );

        while let Some(ridx) = walk.next_region(&ledger, cidx, cand)? {
            running = running
                .checked_add(ledger.take(cidx, ridx)?)
                .ok_or_else(|| vote_overflow(group, cand))?;
            pool.push(ridx);
            // Each region brings strictly less than one marker after the direct
            // pass, so at most one marker can be completed per step.
            if running >= threshold {
                let region_ids: Vec<String> =
                    pool.iter().map(|idx| regions[*idx].id.clone()).collect();
                let merged = merger.merge(&region_ids)?;
                let [x, y] = centroid(&region_ids.join("+"), &merged)?;
                debug!(
                    "allocate_group: {}: {}: pooled marker from {:?}",
                    group, cand, region_ids
                );
                markers.push(Marker {
                    candidate: cand.clone(),
                    region_ids,
                    x,
                    y,
                    kind: MarkerKind::Pooled,
                });
                running -= threshold;
                tallies[cidx].pooled_markers += 1;
                // The last region may still have votes in the carry: it starts
                // the next pool.
                pool = vec![ridx];
            }
        }
        tallies[cidx].dropped_votes = running;
    }

    for t in tallies.iter() {
        info!(
            "Group {}: {}: {} votes -> {} direct, {} pooled, {} dropped",
            t.group, t.candidate, t.total_votes, t.direct_markers, t.pooled_markers, t.dropped_votes
        );
    }
    Ok((markers, tallies))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Unit squares laid out on a row: region i covers [i, i+1] x [0, 1].
    fn region(id: &str, group: &str, col: u32, votes: &[u64], neighbors: &[&str]) -> Region {
        let x0 = col as f64;
        Region {
            id: id.to_string(),
            group: group.to_string(),
            votes: ["x", "y"]
                .iter()
                .zip(votes.iter())
                .map(|(c, v)| (c.to_string(), *v))
                .collect(),
            neighbors: neighbors.iter().map(|s| s.to_string()).collect(),
            geometry: Geometry::Polygon(vec![vec![
                [x0, 0.0],
                [x0 + 1.0, 0.0],
                [x0 + 1.0, 1.0],
                [x0, 1.0],
                [x0, 0.0],
            ]]),
        }
    }

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn rules_x(threshold: u64) -> MarkerRules {
        MarkerRules::new(threshold, &["x".to_string()]).unwrap()
    }

    fn rules_xy(threshold: u64) -> MarkerRules {
        MarkerRules::new(threshold, &["x".to_string(), "y".to_string()]).unwrap()
    }

    fn run(regions: &[Region], rules: &MarkerRules) -> Result<MarkerResult, MarkerErrors> {
        generate_markers_by_group(regions, rules, &RegionUnion::new(regions))
    }

    fn ids(m: &Marker) -> Vec<&str> {
        m.region_ids.iter().map(|s| s.as_str()).collect()
    }

    fn assert_conservation(res: &MarkerResult, regions: &[Region]) {
        let group_of: HashMap<&str, &str> = regions
            .iter()
            .map(|r| (r.id.as_str(), r.group.as_str()))
            .collect();
        for t in res.tallies.iter() {
            assert_eq!(
                (t.direct_markers + t.pooled_markers) * res.votes_per_marker + t.dropped_votes,
                t.total_votes,
                "{:?}",
                t
            );
            assert!(t.dropped_votes < res.votes_per_marker);
            let count = res
                .markers
                .iter()
                .filter(|m| m.candidate == t.candidate)
                .filter(|m| group_of.get(m.region_ids[0].as_str()) == Some(&t.group.as_str()))
                .count() as u64;
            assert_eq!(count, t.direct_markers + t.pooled_markers);
        }
    }

    // Replays the pooling from the markers alone: the carry of the previous
    // marker plus the leftovers of the newly visited regions must reach the
    // threshold each time a pooled marker is placed.
    fn assert_pools_reach_threshold(res: &MarkerResult, regions: &[Region]) {
        let threshold = res.votes_per_marker;
        let by_id: HashMap<&str, &Region> = regions.iter().map(|r| (r.id.as_str(), r)).collect();
        // (group, candidate) -> (carry, last region of the previous pool)
        let mut state: HashMap<(String, String), (u64, String)> = HashMap::new();
        for m in res.markers.iter().filter(|m| m.kind == MarkerKind::Pooled) {
            let leftover = |id: &String| by_id[id.as_str()].votes[&m.candidate] % threshold;
            let group = by_id[m.region_ids[0].as_str()].group.clone();
            let key = (group, m.candidate.clone());
            let gathered = match state.get(&key) {
                None => m.region_ids.iter().map(leftover).sum::<u64>(),
                Some((carry, last)) => {
                    assert_eq!(&m.region_ids[0], last, "{:?}", m);
                    carry + m.region_ids[1..].iter().map(leftover).sum::<u64>()
                }
            };
            assert!(gathered >= threshold, "{:?} gathered {}", m, gathered);
            let last = m.region_ids[m.region_ids.len() - 1].clone();
            state.insert(key, (gathered - threshold, last));
        }
    }

    #[test]
    fn direct_marker_then_dropped_remainder() {
        let regions = vec![
            region("a", "g", 0, &[12], &["b"]),
            region("b", "g", 1, &[3], &["a"]),
        ];
        let res = run(&regions, &rules_x(10)).unwrap();
        assert_eq!(
            res.markers,
            vec![Marker {
                candidate: "x".to_string(),
                region_ids: vec!["a".to_string()],
                x: 0.5,
                y: 0.5,
                kind: MarkerKind::Direct,
            }]
        );
        assert_eq!(res.tallies[0].dropped_votes, 5);
    }

    #[test]
    fn pooled_marker_from_two_regions() {
        let regions = vec![
            region("a", "g", 0, &[8], &["b"]),
            region("b", "g", 1, &[7], &["a"]),
        ];
        let res = run(&regions, &rules_x(10)).unwrap();
        assert_eq!(
            res.markers,
            vec![Marker {
                candidate: "x".to_string(),
                region_ids: vec!["a".to_string(), "b".to_string()],
                x: 1.0,
                y: 0.5,
                kind: MarkerKind::Pooled,
            }]
        );
        assert_eq!(res.tallies[0].pooled_markers, 1);
        assert_eq!(res.tallies[0].dropped_votes, 5);
    }

    #[test]
    fn disconnected_regions_are_unreachable() {
        let regions = vec![
            region("a", "g", 0, &[2], &[]),
            region("b", "g", 1, &[6], &[]),
            region("c", "g", 2, &[4], &[]),
        ];
        assert_eq!(
            run(&regions, &rules_x(10)),
            Err(MarkerErrors::UnreachableRegions {
                group: "g".to_string(),
                candidate: "x".to_string(),
                unvisited: vec!["a".to_string(), "c".to_string()],
            })
        );
    }

    #[test]
    fn carry_is_kept_and_pool_restarts_at_last_region() {
        init();
        // A chain a - b - c - d, every region below the threshold.
        let regions = vec![
            region("a", "g", 0, &[9], &["b"]),
            region("b", "g", 1, &[6], &["a", "c"]),
            region("c", "g", 2, &[8], &["b", "d"]),
            region("d", "g", 3, &[7], &["c"]),
        ];
        let res = run(&regions, &rules_x(10)).unwrap();
        // a+b = 15 -> marker, carry 5
        // 5+c = 13 -> marker (b, c), carry 3
        // 3+d = 10 -> marker (c, d), carry 0
        let pools: Vec<Vec<&str>> = res.markers.iter().map(ids).collect();
        assert_eq!(pools, vec![vec!["a", "b"], vec!["b", "c"], vec!["c", "d"]]);
        assert!(res.markers.iter().all(|m| m.kind == MarkerKind::Pooled));
        assert_eq!(res.tallies[0].dropped_votes, 0);
        assert_conservation(&res, &regions);
        assert_pools_reach_threshold(&res, &regions);
    }

    #[test]
    fn empty_carry_still_starts_the_next_pool() {
        let regions = vec![
            region("a", "g", 0, &[9], &["b"]),
            region("b", "g", 1, &[1], &["a", "c"]),
            region("c", "g", 2, &[6], &["b", "d"]),
            region("d", "g", 3, &[5], &["c"]),
        ];
        let res = run(&regions, &rules_x(10)).unwrap();
        // a+b = 10 -> marker, carry 0. The next pool still lists b.
        let pools: Vec<Vec<&str>> = res.markers.iter().map(ids).collect();
        assert_eq!(pools, vec![vec!["a", "b"], vec!["b", "c", "d"]]);
        assert_eq!(res.tallies[0].dropped_votes, 1);
        assert_conservation(&res, &regions);
        assert_pools_reach_threshold(&res, &regions);
    }

    #[test]
    fn pool_follows_backtracking() {
        // Star centered on a. The walk goes a -> c, back to a, then b.
        let regions = vec![
            region("a", "g", 0, &[9], &["b", "c"]),
            region("b", "g", 1, &[7], &["a"]),
            region("c", "g", 2, &[8], &["a"]),
        ];
        let res = run(&regions, &rules_x(10)).unwrap();
        let pools: Vec<Vec<&str>> = res.markers.iter().map(ids).collect();
        // 9 + 8 = 17 -> marker, carry 7, then 7 + 7 = 14 -> marker.
        // The second pool keeps c even though b is only adjacent to a.
        assert_eq!(pools, vec![vec!["a", "c"], vec!["c", "b"]]);
        assert_eq!(res.tallies[0].dropped_votes, 4);
        assert_conservation(&res, &regions);
        assert_pools_reach_threshold(&res, &regions);
    }

    #[test]
    fn direct_markers_share_the_region_centroid() {
        let regions = vec![region("a", "g", 3, &[35, 0], &[])];
        let res = run(&regions, &rules_xy(10)).unwrap();
        assert_eq!(res.markers.len(), 3);
        for m in res.markers.iter() {
            assert_eq!((m.x, m.y), (3.5, 0.5));
            assert_eq!(m.kind, MarkerKind::Direct);
        }
        assert_eq!(res.tallies[0].dropped_votes, 5);
        assert_eq!(res.tallies[1].total_votes, 0);
        assert_eq!(res.tallies[1].dropped_votes, 0);
    }

    #[test]
    fn direct_markers_come_first_then_pooled_by_candidate() {
        let regions = vec![
            region("a", "g", 0, &[13, 4], &["b"]),
            region("b", "g", 1, &[8, 21], &["a"]),
        ];
        let res = run(&regions, &rules_xy(10)).unwrap();
        let summary: Vec<(&str, MarkerKind)> = res
            .markers
            .iter()
            .map(|m| (m.candidate.as_str(), m.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("x", MarkerKind::Direct),
                ("y", MarkerKind::Direct),
                ("y", MarkerKind::Direct),
                ("x", MarkerKind::Pooled),
            ]
        );
        // x: 3 + 8 = 11 -> one pooled marker. y: 4 + 1 = 5 -> dropped.
        assert_eq!(ids(&res.markers[3]), vec!["b", "a"]);
        assert_eq!(res.tallies[1].dropped_votes, 5);
        assert_conservation(&res, &regions);
    }

    #[test]
    fn votes_are_never_pooled_across_groups() {
        // The regions are adjacent across the group border, but each group is
        // handled on its own.
        let regions = vec![
            region("g1-a", "g1", 0, &[6], &["g1-b", "g2-a"]),
            region("g2-a", "g2", 2, &[6], &["g1-a"]),
            region("g1-b", "g1", 1, &[6], &["g1-a"]),
        ];
        let res = run(&regions, &rules_x(10)).unwrap();
        let pools: Vec<Vec<&str>> = res.markers.iter().map(ids).collect();
        assert_eq!(pools, vec![vec!["g1-a", "g1-b"]]);
        let groups: Vec<&str> = res.tallies.iter().map(|t| t.group.as_str()).collect();
        assert_eq!(groups, vec!["g1", "g2"]);
        assert_eq!(res.tallies[1].dropped_votes, 6);
        assert_conservation(&res, &regions);
    }

    #[test]
    fn unreachable_region_only_fails_its_own_group_check() {
        // g2 is disconnected, g1 is fine: the run fails and names g2.
        let regions = vec![
            region("g1-a", "g1", 0, &[6], &["g1-b"]),
            region("g1-b", "g1", 1, &[6], &["g1-a"]),
            region("g2-a", "g2", 2, &[1], &[]),
            region("g2-b", "g2", 3, &[2], &[]),
        ];
        match run(&regions, &rules_x(10)) {
            Err(MarkerErrors::UnreachableRegions {
                group, unvisited, ..
            }) => {
                assert_eq!(group, "g2");
                assert_eq!(unvisited, vec!["g2-a".to_string()]);
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn larger_grid_properties() {
        init();
        // A 4x3 grid, 4-connected.
        let mut regions: Vec<Region> = Vec::new();
        let votes_x: [u64; 12] = [3, 17, 42, 8, 0, 25, 9, 11, 6, 30, 2, 19];
        let votes_y: [u64; 12] = [14, 1, 7, 33, 28, 5, 16, 0, 21, 4, 12, 9];
        for row in 0..3u32 {
            for col in 0..4u32 {
                let i = (row * 4 + col) as usize;
                let mut neighbors: Vec<String> = Vec::new();
                if col > 0 {
                    neighbors.push(format!("g-{}", i - 1));
                }
                if col < 3 {
                    neighbors.push(format!("g-{}", i + 1));
                }
                if row > 0 {
                    neighbors.push(format!("g-{}", i - 4));
                }
                if row < 2 {
                    neighbors.push(format!("g-{}", i + 4));
                }
                let nrefs: Vec<&str> = neighbors.iter().map(|s| s.as_str()).collect();
                let mut r = region(&format!("g-{}", i), "g", col, &[votes_x[i], votes_y[i]], &nrefs);
                if let Geometry::Polygon(rings) = &mut r.geometry {
                    for p in rings[0].iter_mut() {
                        p[1] += row as f64;
                    }
                }
                regions.push(r);
            }
        }
        let rules = rules_xy(10);
        let res = run(&regions, &rules).unwrap();
        assert_conservation(&res, &regions);
        assert_pools_reach_threshold(&res, &regions);
        assert!(res.markers.iter().any(|m| m.kind == MarkerKind::Pooled));

        for m in res.markers.iter().filter(|m| m.kind == MarkerKind::Pooled) {
            // No region twice in the same pool.
            let unique: HashSet<&String> = m.region_ids.iter().collect();
            assert_eq!(unique.len(), m.region_ids.len());
            assert!(m.region_ids.len() >= 2);
        }
        for m in res.markers.iter().filter(|m| m.kind == MarkerKind::Direct) {
            assert_eq!(m.region_ids.len(), 1);
        }

        // Determinism
        let res2 = run(&regions, &rules).unwrap();
        assert_eq!(res, res2);
        assert_eq!(
            marker_fingerprint(&res.markers),
            marker_fingerprint(&res2.markers)
        );
    }

    #[test]
    fn configuration_errors() {
        let regions = vec![
            region("a", "g", 0, &[1], &["b"]),
            region("a", "g", 1, &[1], &["a"]),
        ];
        assert_eq!(
            run(&regions, &rules_x(10)),
            Err(MarkerErrors::DuplicateRegion("a".to_string()))
        );
        assert_eq!(
            MarkerRules::new(0, &["x".to_string()]),
            Err(MarkerErrors::InvalidThreshold)
        );
        assert_eq!(MarkerRules::new(10, &[]), Err(MarkerErrors::NoCandidates));
        let bad = MarkerRules {
            votes_per_marker: 0,
            candidates: vec!["x".to_string()],
        };
        assert_eq!(run(&regions[..1], &bad), Err(MarkerErrors::InvalidThreshold));
        // A region without votes for one of the candidates.
        assert_eq!(
            run(&regions[..1], &rules_xy(10)),
            Err(MarkerErrors::MissingVotes("a".to_string(), "y".to_string()))
        );
    }

    #[test]
    fn unsupported_geometry_aborts_the_run() {
        let mut r = region("a", "g", 0, &[25], &[]);
        r.geometry = Geometry::Unsupported("LineString".to_string());
        assert_eq!(
            run(&[r], &rules_x(10)),
            Err(MarkerErrors::UnsupportedGeometry(
                "a".to_string(),
                "LineString".to_string()
            ))
        );
    }

    #[test]
    fn unsupported_geometry_fails_even_without_markers() {
        // b never gets a marker of its own, its shape is rejected anyway.
        let a = region("a", "g", 0, &[25], &["b"]);
        let mut b = region("b", "g", 1, &[3], &["a"]);
        b.geometry = Geometry::Unsupported("LineString".to_string());
        let expected = Err(MarkerErrors::UnsupportedGeometry(
            "b".to_string(),
            "LineString".to_string(),
        ));
        let regions = vec![a, b];
        assert_eq!(run(&regions, &rules_x(10)), expected);
        assert_eq!(
            generate_group_markers("g", &regions, &rules_x(10), &RegionUnion::new(&regions)),
            expected
        );

        // Also when the shape is in another group than the markers.
        let mut c = region("c", "h", 2, &[0], &[]);
        c.geometry = Geometry::Polygon(vec![vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]]);
        let regions = vec![region("a", "g", 0, &[25], &[]), c];
        assert_eq!(
            run(&regions, &rules_x(10)),
            Err(MarkerErrors::DegenerateGeometry("c".to_string()))
        );
    }

    #[test]
    fn vote_counts_that_overflow_are_reported() {
        let regions = vec![
            region("a", "g", 0, &[u64::MAX - 1], &["b"]),
            region("b", "g", 1, &[u64::MAX - 1], &["a"]),
        ];
        assert_eq!(
            run(&regions, &rules_x(u64::MAX)),
            Err(MarkerErrors::VoteOverflow {
                group: "g".to_string(),
                candidate: "x".to_string(),
            })
        );
        // The largest counts that fit are fine.
        let res = run(&regions[..1], &rules_x(u64::MAX)).unwrap();
        assert!(res.markers.is_empty());
        assert_eq!(res.tallies[0].dropped_votes, u64::MAX - 1);
    }

    #[test]
    fn custom_merger_is_used_for_pooled_markers() {
        let regions = vec![
            region("a", "g", 0, &[5], &["b"]),
            region("b", "g", 1, &[5], &["a"]),
        ];
        let merger = |ids: &[String]| -> Result<Geometry, MarkerErrors> {
            assert_eq!(ids, &["a".to_string(), "b".to_string()]);
            Ok(Geometry::Polygon(vec![vec![
                [0.0, 0.0],
                [4.0, 0.0],
                [4.0, 2.0],
                [0.0, 2.0],
            ]]))
        };
        let res = generate_group_markers("g", &regions, &rules_x(10), &merger).unwrap();
        assert_eq!((res.markers[0].x, res.markers[0].y), (2.0, 1.0));
    }

    #[test]
    fn empty_input() {
        let res = run(&[], &rules_x(10)).unwrap();
        assert!(res.markers.is_empty());
        assert!(res.tallies.is_empty());
        let res = generate_group_markers("g", &[], &rules_x(10), &RegionUnion::new(&[])).unwrap();
        assert!(res.markers.is_empty());
        assert_eq!(res.tallies[0].total_votes, 0);
    }

    #[test]
    fn fingerprint_depends_on_content() {
        let regions = vec![
            region("a", "g", 0, &[12], &["b"]),
            region("b", "g", 1, &[3], &["a"]),
        ];
        let res = run(&regions, &rules_x(10)).unwrap();
        let f1 = marker_fingerprint(&res.markers);
        let res = run(&regions, &rules_x(5)).unwrap();
        let f2 = marker_fingerprint(&res.markers);
        assert_ne!(f1, f2);
        assert_eq!(f1.len(), 64);
    }
}

use log::debug;
use std::collections::HashMap;

use crate::config::*;
use crate::ledger::VoteLedger;

// The outcome of one move of the walk.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Step {
    // Moved forward to this unvisited neighbor of the top of the stack.
    Extend(usize),
    // The top of the stack had no unvisited neighbor and was removed.
    Backtrack,
    // All the regions have been visited.
    Complete,
    // The stack is empty but some regions were never visited.
    Exhausted,
}

/// Returns the region with the most votes left, among the given regions.
///
/// The regions must be provided in group order: on ties, the first one wins.
pub(crate) fn first_max<I: Iterator<Item = usize>>(
    ridxs: I,
    ledger: &VoteLedger,
    cidx: usize,
) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for ridx in ridxs {
        let votes = ledger.remaining(cidx, ridx);
        match best {
            Some((_, best_votes)) if best_votes >= votes => {}
            _ => best = Some((ridx, votes)),
        }
    }
    best.map(|(ridx, _)| ridx)
}

/// Depth-first walk over the adjacency graph of one group, for one candidate.
///
/// Each step moves from the region at the top of the stack to its unvisited
/// neighbor with the most votes left. When the top of the stack has no unvisited
/// neighbor left, the walk backtracks. Each region is visited at most once.
pub(crate) struct AdjacencyWalk<'a> {
    group: &'a str,
    regions: &'a [Region],
    // Region id -> position in the group. Ids outside the group are absent.
    index: &'a HashMap<&'a str, usize>,
    visited: Vec<bool>,
    num_visited: usize,
    stack: Vec<usize>,
}

impl<'a> AdjacencyWalk<'a> {
    pub(crate) fn new(
        group: &'a str,
        regions: &'a [Region],
        index: &'a HashMap<&'a str, usize>,
    ) -> AdjacencyWalk<'a> {
        AdjacencyWalk {
            group,
            regions,
            index,
            visited: vec![false; regions.len()],
            num_visited: 0,
            stack: Vec::new(),
        }
    }

    /// Starts the walk at the region with the most votes left.
    pub(crate) fn seed(&mut self, ledger: &VoteLedger, cidx: usize) -> Option<usize> {
        let ridx = first_max(0..self.regions.len(), ledger, cidx)?;
        self.visit(ridx);
        Some(ridx)
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.num_visited == self.regions.len()
    }

    /// Returns the next region to pool votes from, or None once every region
    /// has been visited.
    ///
    /// Fails if the stack runs out before all the regions are visited: the
    /// adjacency graph of the group is not connected.
    pub(crate) fn next_region(
        &mut self,
        ledger: &VoteLedger,
        cidx: usize,
        candidate: &str,
    ) -> Result<Option<usize>, MarkerErrors> {
        loop {
            match self.step(ledger, cidx) {
                Step::Extend(ridx) => return Ok(Some(ridx)),
                Step::Backtrack => {}
                Step::Complete => return Ok(None),
                Step::Exhausted => {
                    let unvisited: Vec<String> = self
                        .regions
                        .iter()
                        .zip(self.visited.iter())
                        .filter(|(_, v)| !**v)
                        .map(|(r, _)| r.id.clone())
                        .collect();
                    return Err(MarkerErrors::UnreachableRegions {
                        group: self.group.to_string(),
                        candidate: candidate.to_string(),
                        unvisited,
                    });
                }
            }
        }
    }

    fn step(&mut self, ledger: &VoteLedger, cidx: usize) -> Step {
        if self.is_complete() {
            return Step::Complete;
        }
        let top = match self.stack.last() {
            Some(top) => *top,
            None => return Step::Exhausted,
        };
        let mut open: Vec<usize> = self.regions[top]
            .neighbors
            .iter()
            .filter_map(|nid| self.index.get(nid.as_str()).cloned())
            .filter(|ridx| !self.visited[*ridx])
            .collect();
        open.sort_unstable();
        open.dedup();
        match first_max(open.into_iter(), ledger, cidx) {
            Some(ridx) => {
                self.visit(ridx);
                Step::Extend(ridx)
            }
            None => {
                self.stack.pop();
                debug!(
                    "AdjacencyWalk: {}: backtracking from {}",
                    self.group, self.regions[top].id
                );
                Step::Backtrack
            }
        }
    }

    fn visit(&mut self, ridx: usize) {
        self.visited[ridx] = true;
        self.num_visited += 1;
        self.stack.push(ridx);
    }
}

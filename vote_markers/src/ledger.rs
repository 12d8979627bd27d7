use log::debug;

use crate::config::*;

// The votes of every (candidate, region) pair of a group that are not yet
// represented by a marker.
//
// Candidates and regions are addressed by their position in the rules and in
// the group, respectively.
pub(crate) struct VoteLedger<'a> {
    regions: &'a [Region],
    candidates: &'a [String],
    // Indexed by [candidate][region]
    remaining: Vec<Vec<u64>>,
}

impl<'a> VoteLedger<'a> {
    pub(crate) fn new(
        regions: &'a [Region],
        candidates: &'a [String],
    ) -> Result<VoteLedger<'a>, MarkerErrors> {
        let mut ledger = VoteLedger {
            regions,
            candidates,
            remaining: vec![vec![0; regions.len()]; candidates.len()],
        };
        for cidx in 0..candidates.len() {
            for ridx in 0..regions.len() {
                ledger.initialize(cidx, ridx)?;
            }
        }
        Ok(ledger)
    }

    /// Resets the entry to all the votes of the region and returns them.
    pub(crate) fn initialize(&mut self, cidx: usize, ridx: usize) -> Result<u64, MarkerErrors> {
        let region = &self.regions[ridx];
        let candidate = &self.candidates[cidx];
        let votes = *region
            .votes
            .get(candidate)
            .ok_or_else(|| MarkerErrors::MissingVotes(region.id.clone(), candidate.clone()))?;
        self.remaining[cidx][ridx] = votes;
        Ok(votes)
    }

    pub(crate) fn remaining(&self, cidx: usize, ridx: usize) -> u64 {
        self.remaining[cidx][ridx]
    }

    pub(crate) fn consume(
        &mut self,
        cidx: usize,
        ridx: usize,
        amount: u64,
    ) -> Result<(), MarkerErrors> {
        let entry = &mut self.remaining[cidx][ridx];
        if amount > *entry {
            return Err(MarkerErrors::LedgerOverdraw {
                region: self.regions[ridx].id.clone(),
                candidate: self.candidates[cidx].clone(),
                requested: amount,
                remaining: *entry,
            });
        }
        *entry -= amount;
        Ok(())
    }

    /// Empties the entry and returns what was left in it.
    pub(crate) fn take(&mut self, cidx: usize, ridx: usize) -> Result<u64, MarkerErrors> {
        let votes = self.remaining(cidx, ridx);
        self.consume(cidx, ridx, votes)?;
        debug!(
            "ledger: took {} votes from {} for {}",
            votes, self.regions[ridx].id, self.candidates[cidx]
        );
        Ok(votes)
    }
}

// src/dataset/store.rs
//! Materialized window storage
//!
//! Windows are built once by a prepare call and then only read. The store is
//! `Send + Sync`, so concurrent readers need no locking.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use super::keys::FieldMap;

/// One fixed-length training sample
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub inputs: FieldMap,
    pub outputs: FieldMap,
    /// Position of the subject in discovery order
    pub subject_index: usize,
    pub trial_index: usize,
    /// First frame of the window within its trial
    pub start_frame: usize,
}

/// Counters from the most recent prepare call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrepareStats {
    pub subjects: usize,
    pub trials: usize,
    /// Window starts considered before missing-frame filtering
    pub candidate_windows: usize,
    pub windows: usize,
    /// Candidates dropped because a frame in range lacked force data
    pub skipped_windows: usize,
}

/// Ordered window collection
#[derive(Debug, Clone, Default)]
pub struct WindowStore {
    windows: Vec<Window>,
    stats: PrepareStats,
}

impl WindowStore {
    pub fn new(windows: Vec<Window>, stats: PrepareStats) -> Self {
        Self { windows, stats }
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Inputs, outputs and subject index of window `index`
    pub fn get(&self, index: usize) -> Option<(&FieldMap, &FieldMap, usize)> {
        self.windows
            .get(index)
            .map(|w| (&w.inputs, &w.outputs, w.subject_index))
    }

    pub fn window(&self, index: usize) -> Option<&Window> {
        self.windows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Window> {
        self.windows.iter()
    }

    pub fn stats(&self) -> &PrepareStats {
        &self.stats
    }

    /// Permutation of window indices, reproducible for a given seed
    pub fn shuffled_order(&self, seed: u64) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.windows.len()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
        order
    }
}

impl<'a> IntoIterator for &'a WindowStore {
    type Item = &'a Window;
    type IntoIter = std::slice::Iter<'a, Window>;

    fn into_iter(self) -> Self::IntoIter {
        self.windows.iter()
    }
}

/// Random stream owned by one subject, seeded from its discovery index
pub fn subject_rng(subject_index: usize) -> StdRng {
    StdRng::seed_from_u64(subject_index as u64)
}

//! Workload configuration: layered defaults, TOML file, environment and
//! command-line overrides.

use std::path::{Path, PathBuf};

use optigraph_core::config::layered;
use optigraph_core::{Error, GraphConfig, GraphVariant, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::workload::Operation;

/// Everything one `optigraph run` needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Worker threads per variant.
    pub threads: usize,
    /// Operations each worker performs.
    pub ops_per_thread: u64,
    /// Variants to run, in order.
    pub variants: Vec<GraphVariant>,
    /// Plain-text log appended to after each variant.
    pub log_path: Option<PathBuf>,
    /// Base seed for worker RNGs. Unseeded runs draw from the OS.
    pub seed: Option<u64>,
    /// Relative operation frequencies.
    pub mix: OperationMix,
    /// Settings for the graphs under test.
    pub graph: GraphConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            threads: 10,
            ops_per_thread: 100_000,
            variants: GraphVariant::ALL.to_vec(),
            log_path: None,
            seed: None,
            mix: OperationMix::default(),
            graph: GraphConfig::default(),
        }
    }
}

impl BenchConfig {
    /// Loads and validates the configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = layered(Self::default(), path)?.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations no run could execute.
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(Error::InvalidConfig("threads must be at least 1".into()));
        }
        if self.ops_per_thread == 0 {
            return Err(Error::InvalidConfig(
                "ops_per_thread must be at least 1".into(),
            ));
        }
        if self.variants.is_empty() {
            return Err(Error::InvalidConfig("no graph variant selected".into()));
        }
        self.mix.validate()
    }
}

/// Relative frequency of each operation. Values need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationMix {
    pub add_vertex: f64,
    pub add_edge: f64,
    pub remove_vertex: f64,
    pub remove_edge: f64,
    pub contains_vertex: f64,
    pub contains_edge: f64,
    pub bfs: f64,
}

impl Default for OperationMix {
    fn default() -> Self {
        Self {
            add_vertex: 0.249,
            add_edge: 0.15,
            remove_vertex: 0.20,
            remove_edge: 0.15,
            contains_vertex: 0.15,
            contains_edge: 0.10,
            bfs: 0.001,
        }
    }
}

impl OperationMix {
    fn weights(&self) -> [(Operation, f64); 7] {
        [
            (Operation::AddVertex, self.add_vertex),
            (Operation::AddEdge, self.add_edge),
            (Operation::RemoveVertex, self.remove_vertex),
            (Operation::RemoveEdge, self.remove_edge),
            (Operation::ContainsVertex, self.contains_vertex),
            (Operation::ContainsEdge, self.contains_edge),
            (Operation::Bfs, self.bfs),
        ]
    }

    fn total(&self) -> f64 {
        self.weights().iter().map(|(_, weight)| weight).sum()
    }

    /// Every weight is finite and non-negative, and at least one is positive.
    pub fn validate(&self) -> Result<()> {
        if let Some((op, weight)) = self
            .weights()
            .into_iter()
            .find(|(_, weight)| !weight.is_finite() || *weight < 0.0)
        {
            return Err(Error::InvalidConfig(format!(
                "mix weight for {op} must be a non-negative number, got {weight}"
            )));
        }
        if self.total() <= 0.0 {
            return Err(Error::InvalidConfig(
                "mix weights must not all be zero".into(),
            ));
        }
        Ok(())
    }

    /// Draws one operation with probability proportional to its weight.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Operation {
        let mut point = rng.gen::<f64>() * self.total();
        let weights = self.weights();
        for (op, weight) in weights {
            if point < weight {
                return op;
            }
            point -= weight;
        }
        // Rounding can leave `point` a hair above the last bucket.
        weights
            .into_iter()
            .rev()
            .find(|(_, weight)| *weight > 0.0)
            .map_or(Operation::AddVertex, |(op, _)| op)
    }
}

use serde::Serialize;
use tracing::{info, warn};

use crate::{InputPolicy, InputSource, MeasureProtocol, VariantRegistry, DEFAULT_WARMUP};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub iterations: usize,
    pub warmup: usize,
    pub input_policy: InputPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            warmup: DEFAULT_WARMUP,
            input_policy: InputPolicy::Shared,
        }
    }
}

impl RunConfig {
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    fn protocol(&self) -> MeasureProtocol {
        MeasureProtocol {
            iterations: self.iterations,
            warmup: self.warmup,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub avg_ms: f64,
    pub samples: usize,
    pub failures: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BenchmarkRunReport {
    pub iterations: usize,
    pub warmup: usize,
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkRunReport {
    pub fn get(&self, name: &str) -> Option<&BenchmarkResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Times every registered variant, one after another, in registration order.
/// Variants that produced no sample are left out of the report.
pub fn run_all(registry: &mut VariantRegistry, config: &RunConfig) -> BenchmarkRunReport {
    let protocol = config.protocol();
    let mut results = Vec::with_capacity(registry.len());

    for variant in registry.iter_mut() {
        let inputs = InputSource::new(config.input_policy);
        match variant.time(&inputs, protocol) {
            Some(summary) => {
                info!(
                    variant = variant.name(),
                    avg_ms = summary.avg_ms,
                    samples = summary.samples,
                    failures = summary.failures,
                    "variant measured"
                );
                results.push(BenchmarkResult {
                    name: variant.name().to_string(),
                    avg_ms: summary.avg_ms,
                    samples: summary.samples,
                    failures: summary.failures,
                });
            }
            None => warn!(
                variant = variant.name(),
                iterations = config.iterations,
                "variant produced no measurement"
            ),
        }
    }

    BenchmarkRunReport {
        iterations: config.iterations,
        warmup: config.warmup,
        results,
    }
}

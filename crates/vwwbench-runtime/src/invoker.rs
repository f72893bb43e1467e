use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, trace};

pub const DEFAULT_WARMUP: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasureProtocol {
    pub iterations: usize,
    pub warmup: usize,
}

impl MeasureProtocol {
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            warmup: DEFAULT_WARMUP,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LatencySummary {
    pub avg_ms: f64,
    pub samples: usize,
    pub failures: usize,
}

/// Times `call` over `protocol.iterations` measured calls after
/// `protocol.warmup` discarded ones.
///
/// `make_input` runs once per call and always before the clock starts, so a
/// timed interval covers exactly one `call` and nothing else. A failed call
/// records no sample and the loop carries on. Returns `None` when no sample
/// was recorded.
pub fn measure<I, O, E, C, F>(
    mut call: C,
    mut make_input: F,
    protocol: MeasureProtocol,
) -> Option<LatencySummary>
where
    C: FnMut(I) -> Result<O, E>,
    F: FnMut() -> I,
    E: std::fmt::Display,
{
    for i in 0..protocol.warmup {
        let input = make_input();
        match call(input) {
            Ok(_) => {}
            Err(err) => debug!(call = i, error = %err, "warmup call failed"),
        }
    }

    let mut total = Duration::ZERO;
    let mut samples = 0usize;
    let mut failures = 0usize;
    for i in 0..protocol.iterations {
        let input = make_input();
        let start = Instant::now();
        let outcome = call(input);
        let elapsed = start.elapsed();
        match outcome {
            Ok(output) => {
                drop(output);
                total += elapsed;
                samples += 1;
            }
            Err(err) => {
                failures += 1;
                trace!(call = i, error = %err, "measured call failed");
            }
        }
    }

    let avg_ms = mean_ms(total, samples)?;
    Some(LatencySummary {
        avg_ms,
        samples,
        failures,
    })
}

fn mean_ms(total: Duration, samples: usize) -> Option<f64> {
    if samples == 0 {
        return None;
    }
    Some(total.as_secs_f64() / samples as f64 * 1000.0)
}

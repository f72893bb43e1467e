#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, ensure, Result};
use vwwbench_core::{BackendModel, DType, IOName, ModelSpec, Tensor, TensorSpec};

/// What a scripted model does on its n-th call (warmup calls included).
pub type Script = Box<dyn Fn(usize) -> Outcome + Send>;

pub enum Outcome {
    Ok(Duration),
    Fail,
}

pub struct ScriptedModel {
    spec: ModelSpec,
    script: Script,
    calls: Arc<AtomicUsize>,
}

impl ScriptedModel {
    pub fn new(script: impl Fn(usize) -> Outcome + Send + 'static) -> Self {
        Self::with_input_dims(script, vec![None, Some(3), Some(96), Some(96)])
    }

    pub fn with_input_dims(
        script: impl Fn(usize) -> Outcome + Send + 'static,
        dims: Vec<Option<usize>>,
    ) -> Self {
        Self {
            spec: ModelSpec {
                inputs: vec![TensorSpec {
                    name: IOName("input".to_string()),
                    dtype: DType::F32,
                    rank: dims.len(),
                    dims,
                }],
                outputs: vec![TensorSpec {
                    name: IOName("logits".to_string()),
                    dtype: DType::F32,
                    rank: 2,
                    dims: vec![Some(1), Some(2)],
                }],
            },
            script: Box::new(script),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn instant() -> Self {
        Self::new(|_| Outcome::Ok(Duration::ZERO))
    }

    pub fn always_failing() -> Self {
        Self::new(|_| Outcome::Fail)
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl BackendModel for ScriptedModel {
    type Input = Tensor;
    type Output = Vec<TensorSpec>;

    fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    fn prepare(input: &Tensor) -> Result<Tensor> {
        ensure!(input.desc.dtype == DType::F32, "expected f32 input");
        Ok(input.clone())
    }

    fn infer(&mut self, input: Tensor) -> Result<Vec<TensorSpec>> {
        ensure!(
            input.byte_len() == input.expected_byte_len(),
            "input byte size mismatch"
        );
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        match (self.script)(n) {
            Outcome::Ok(d) => {
                if !d.is_zero() {
                    std::thread::sleep(d);
                }
                Ok(self.spec.outputs.clone())
            }
            Outcome::Fail => bail!("scripted failure on call {n}"),
        }
    }
}

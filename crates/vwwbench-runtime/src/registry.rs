use tracing::info;
use vwwbench_core::{Backend, BackendModel, DType, Device, ModelArtifact, ModelSpec, Shape};

use crate::{measure, InputSource, LatencySummary, LoadError, MeasureProtocol, INPUT_SHAPE};

/// Object-safe view of a loaded model, so the orchestrator can time any
/// backend through the same call.
pub trait VariantAdapter: Send {
    fn spec(&self) -> &ModelSpec;
    fn time(&mut self, inputs: &InputSource, protocol: MeasureProtocol) -> Option<LatencySummary>;
}

impl<T: BackendModel> VariantAdapter for T {
    fn spec(&self) -> &ModelSpec {
        BackendModel::spec(self)
    }

    fn time(&mut self, inputs: &InputSource, protocol: MeasureProtocol) -> Option<LatencySummary> {
        measure(
            |prepared: anyhow::Result<T::Input>| prepared.and_then(|input| self.infer(input)),
            || T::prepare(&inputs.next()),
            protocol,
        )
    }
}

pub struct ModelVariant {
    name: String,
    adapter: Box<dyn VariantAdapter>,
}

impl ModelVariant {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &ModelSpec {
        self.adapter.spec()
    }

    pub fn time(&mut self, inputs: &InputSource, protocol: MeasureProtocol) -> Option<LatencySummary> {
        self.adapter.time(inputs, protocol)
    }
}

impl std::fmt::Debug for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelVariant")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Variants in registration order. Each one is loaded once and reused for
/// every run of the session.
#[derive(Debug, Default)]
pub struct VariantRegistry {
    variants: Vec<ModelVariant>,
}

impl VariantRegistry {
    pub fn new() -> Self {
        Self {
            variants: Vec::new(),
        }
    }

    pub fn register<M: BackendModel>(&mut self, name: &str, model: M) -> Result<(), LoadError> {
        if self.variants.iter().any(|v| v.name == name) {
            return Err(LoadError::Duplicate(name.to_string()));
        }
        check_input(name, BackendModel::spec(&model))?;
        self.variants.push(ModelVariant {
            name: name.to_string(),
            adapter: Box::new(model),
        });
        Ok(())
    }

    pub fn load<B: Backend>(
        &mut self,
        name: &str,
        backend: &B,
        artifact: &ModelArtifact,
        device: Device,
    ) -> Result<(), LoadError> {
        if self.variants.iter().any(|v| v.name == name) {
            return Err(LoadError::Duplicate(name.to_string()));
        }
        let model = backend
            .load(artifact, device.clone())
            .map_err(|source| LoadError::Backend {
                variant: name.to_string(),
                backend: backend.name(),
                source,
            })?;
        self.register(name, model)?;
        info!(variant = name, backend = backend.name(), %device, %artifact, "variant loaded");
        Ok(())
    }

    pub fn names(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelVariant> {
        self.variants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ModelVariant> {
        self.variants.iter_mut()
    }
}

fn check_input(name: &str, spec: &ModelSpec) -> Result<(), LoadError> {
    let shape = Shape::from_slice(&INPUT_SHAPE);
    let expected = format!("F32[{shape}]");
    let Some(first) = spec.inputs.first() else {
        return Err(LoadError::InputMismatch {
            variant: name.to_string(),
            expected,
            found: "model has no inputs".to_string(),
        });
    };
    if !first.accepts(DType::F32, &shape) {
        return Err(LoadError::InputMismatch {
            variant: name.to_string(),
            expected,
            found: first.to_string(),
        });
    }
    Ok(())
}

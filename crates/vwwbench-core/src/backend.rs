use anyhow::Result;

use crate::{Device, ModelArtifact, ModelSpec, Tensor};

pub trait Backend: Send + Sync + 'static {
    type Model: BackendModel;

    fn name(&self) -> &'static str;
    fn load(&self, artifact: &ModelArtifact, device: Device) -> Result<Self::Model>;
}

/// One loaded inference capability.
///
/// Timing only ever wraps [`BackendModel::infer`]; everything needed to turn
/// the harness tensor into the backend's own input type happens in
/// [`BackendModel::prepare`], which callers run before the clock starts.
pub trait BackendModel: Send + 'static {
    type Input;
    type Output;

    fn spec(&self) -> &ModelSpec;

    fn prepare(input: &Tensor) -> Result<Self::Input>;

    /// Whatever the backend hands back is dropped by the caller after the
    /// clock stops. Backends keep it small; output data stays inside them.
    fn infer(&mut self, input: Self::Input) -> Result<Self::Output>;
}

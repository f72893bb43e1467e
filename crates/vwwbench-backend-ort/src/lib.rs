use anyhow::{bail, ensure, Context, Result};
use bytes::Bytes;
use ort::{
    session::{builder::SessionBuilder, Session, SessionInputValue},
    tensor::TensorElementType,
    value::{DynValue, ValueType},
};
use tracing::debug;
use vwwbench_core::{
    Backend, BackendModel, DType, Device, IOName, ModelArtifact, ModelSpec, Tensor, TensorSpec,
};

pub struct OrtBackend;

impl OrtBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OrtBackend {
    fn default() -> Self {
        Self::new()
    }
}

pub struct OrtModel {
    spec: ModelSpec,
    session: Session,
    input_name: String,
}

impl Backend for OrtBackend {
    type Model = OrtModel;

    fn name(&self) -> &'static str {
        "onnxruntime"
    }

    fn load(&self, artifact: &ModelArtifact, device: Device) -> Result<Self::Model> {
        let builder = Session::builder()
            .context("failed to create ORT session builder")?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            .context("failed to configure ORT session builder")?;

        let builder = configure_session_builder(builder, &device)?;

        let session = match artifact {
            ModelArtifact::OnnxPath(path) => builder
                .commit_from_file(path)
                .with_context(|| format!("failed to load ONNX model from {}", path.display()))?,
            ModelArtifact::OnnxBytes(bytes) => builder
                .commit_from_memory(bytes)
                .context("failed to load in-memory ONNX model")?,
        };

        ensure!(
            session.inputs.len() == 1,
            "expected a single-input model, found {} inputs",
            session.inputs.len()
        );
        let input_name = session.inputs[0].name.clone();

        let spec = build_model_spec(&session)?;
        debug!(%artifact, %device, input = %input_name, "ORT session ready");

        Ok(OrtModel {
            spec,
            session,
            input_name,
        })
    }
}

impl BackendModel for OrtModel {
    type Input = DynValue;
    /// Number of outputs the session produced.
    type Output = usize;

    fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    fn prepare(input: &Tensor) -> Result<DynValue> {
        tensor_to_ort_value(input)
    }

    fn infer(&mut self, input: DynValue) -> Result<usize> {
        let ort_inputs = vec![(self.input_name.as_str(), SessionInputValue::from(input))];
        // ORT frees its output buffers when `outputs` drops, inside the call.
        let outputs = self.session.run(ort_inputs)?;
        Ok(outputs.len())
    }
}

fn build_model_spec(session: &Session) -> Result<ModelSpec> {
    let inputs = session
        .inputs
        .iter()
        .map(|input| tensor_spec_from_value_type(&input.name, &input.input_type))
        .collect::<Result<Vec<_>>>()?;

    let outputs = session
        .outputs
        .iter()
        .map(|output| tensor_spec_from_value_type(&output.name, &output.output_type))
        .collect::<Result<Vec<_>>>()?;

    Ok(ModelSpec { inputs, outputs })
}

fn configure_session_builder(builder: SessionBuilder, device: &Device) -> Result<SessionBuilder> {
    match device {
        Device::Cpu => Ok(builder),
        Device::Cuda { device_id } => configure_cuda(builder, *device_id),
        Device::CoreMl => configure_coreml(builder),
    }
}

fn configure_cuda(builder: SessionBuilder, device_id: u32) -> Result<SessionBuilder> {
    #[cfg(feature = "cuda")]
    {
        use ort::execution_providers::cuda::CUDAExecutionProvider;
        let ep = CUDAExecutionProvider::default()
            .with_device_id(device_id as i32)
            .build();
        builder
            .with_execution_providers([ep])
            .context("failed to enable ORT CUDA execution provider")
    }
    #[cfg(not(feature = "cuda"))]
    {
        let _ = (builder, device_id);
        bail!("CUDA requested but vwwbench-backend-ort was built without the `cuda` feature")
    }
}

fn configure_coreml(builder: SessionBuilder) -> Result<SessionBuilder> {
    #[cfg(feature = "coreml")]
    {
        use ort::execution_providers::coreml::CoreMLExecutionProvider;
        let ep = CoreMLExecutionProvider::default().build();
        builder
            .with_execution_providers([ep])
            .context("failed to enable ORT CoreML execution provider")
    }
    #[cfg(not(feature = "coreml"))]
    {
        let _ = builder;
        bail!("CoreML requested but vwwbench-backend-ort was built without the `coreml` feature")
    }
}

fn tensor_spec_from_value_type(name: &str, value_type: &ValueType) -> Result<TensorSpec> {
    let ValueType::Tensor { ty, shape, .. } = value_type else {
        bail!("unsupported non-tensor IO value type");
    };

    let dtype = ort_tensor_element_to_dtype(*ty)?;
    let dims = shape
        .iter()
        .map(|d| if *d < 0 { None } else { Some(*d as usize) })
        .collect::<Vec<_>>();

    Ok(TensorSpec {
        name: IOName(name.to_string()),
        dtype,
        rank: shape.len(),
        dims,
    })
}

fn ort_tensor_element_to_dtype(ty: TensorElementType) -> Result<DType> {
    match ty {
        TensorElementType::Float32 => Ok(DType::F32),
        TensorElementType::Float16 => Ok(DType::F16),
        TensorElementType::Int64 => Ok(DType::I64),
        TensorElementType::Int32 => Ok(DType::I32),
        TensorElementType::Uint8 => Ok(DType::U8),
        _ => bail!("unsupported tensor element type: {ty}"),
    }
}

fn tensor_to_ort_value(tensor: &Tensor) -> Result<DynValue> {
    ensure!(
        tensor.desc.dtype == DType::F32,
        "only f32 inputs are supported, got {:?}",
        tensor.desc.dtype
    );
    let expected_bytes = tensor.expected_byte_len();
    ensure!(
        tensor.byte_len() == expected_bytes,
        "input byte size mismatch: got {}, expected {}",
        tensor.byte_len(),
        expected_bytes
    );

    let shape: Vec<usize> = tensor.desc.shape.0.iter().copied().collect();
    let data = bytes_to_f32(&tensor.bytes)?;
    Ok(ort::value::Tensor::from_array((shape, data))?.into_dyn())
}

#[allow(clippy::manual_is_multiple_of)]
fn bytes_to_f32(bytes: &Bytes) -> Result<Vec<f32>> {
    ensure!(bytes.len() % 4 == 0, "f32 input has invalid byte length");
    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

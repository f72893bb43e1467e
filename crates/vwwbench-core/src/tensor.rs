use bytes::Bytes;
use serde::Serialize;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda { device_id: u32 },
    CoreMl,
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Cpu => f.write_str("cpu"),
            Device::Cuda { device_id } => write!(f, "cuda:{device_id}"),
            Device::CoreMl => f.write_str("coreml"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DType {
    F32,
    F16,
    I64,
    I32,
    U8,
}

impl DType {
    pub fn byte_size(self) -> usize {
        match self {
            DType::F32 | DType::I32 => 4,
            DType::F16 => 2,
            DType::I64 => 8,
            DType::U8 => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape(pub SmallVec<[usize; 6]>);

impl Shape {
    pub fn from_slice(d: &[usize]) -> Self {
        Self(d.iter().copied().collect())
    }
    pub fn rank(&self) -> usize {
        self.0.len()
    }
    pub fn numel(&self) -> usize {
        self.0.iter().product::<usize>().max(1)
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dims = self.0.iter().map(ToString::to_string).collect::<Vec<_>>();
        f.write_str(&dims.join("x"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TensorDesc {
    pub dtype: DType,
    pub shape: Shape,
}

/// Immutable CPU tensor. Cloning shares the underlying buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tensor {
    pub desc: TensorDesc,
    pub bytes: Bytes,
}

impl Tensor {
    pub fn from_cpu_bytes(dtype: DType, shape: Shape, bytes: Bytes) -> Self {
        Self {
            desc: TensorDesc { dtype, shape },
            bytes,
        }
    }

    /// f32 tensor with every element set to `value`.
    pub fn full_f32(shape: Shape, value: f32) -> Self {
        let numel = shape.numel();
        let mut buf = Vec::with_capacity(numel * DType::F32.byte_size());
        for _ in 0..numel {
            buf.extend_from_slice(&value.to_le_bytes());
        }
        Self::from_cpu_bytes(DType::F32, shape, Bytes::from(buf))
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn expected_byte_len(&self) -> usize {
        self.desc.shape.numel() * self.desc.dtype.byte_size()
    }
}

use bytes::Bytes;

/// Where a model variant is loaded from.
#[derive(Clone, Debug)]
pub enum ModelArtifact {
    OnnxPath(std::path::PathBuf),
    OnnxBytes(Bytes),
}

impl std::fmt::Display for ModelArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelArtifact::OnnxPath(path) => write!(f, "{}", path.display()),
            ModelArtifact::OnnxBytes(bytes) => write!(f, "<in-memory onnx, {} bytes>", bytes.len()),
        }
    }
}

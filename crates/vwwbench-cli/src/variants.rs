use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::warn;
use vwwbench_backend_ort::OrtBackend;
use vwwbench_core::{Device, ModelArtifact};
use vwwbench_runtime::VariantRegistry;

/// Display name and file of each shipped variant, in report order.
pub const DEFAULT_VARIANTS: [(&str, &str); 4] = [
    ("Baseline", "baseline_fp32.onnx"),
    ("Student", "student_fp32.onnx"),
    ("Pruned", "pruned_fp32.onnx"),
    ("Pruned (int8)", "pruned_int8.onnx"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantSource {
    pub name: String,
    pub path: PathBuf,
}

pub fn default_sources(model_dir: &Path) -> Vec<VariantSource> {
    DEFAULT_VARIANTS
        .iter()
        .map(|(name, file)| VariantSource {
            name: name.to_string(),
            path: model_dir.join(file),
        })
        .collect()
}

pub fn parse_source(raw: &str) -> Result<VariantSource> {
    let (name, path) = raw
        .split_once('=')
        .with_context(|| format!("invalid variant `{raw}` (expected NAME=PATH)"))?;
    let (name, path) = (name.trim(), path.trim());
    if name.is_empty() || path.is_empty() {
        bail!("invalid variant `{raw}` (expected NAME=PATH)");
    }
    Ok(VariantSource {
        name: name.to_string(),
        path: PathBuf::from(path),
    })
}

pub fn resolve_sources(model_dir: &Path, overrides: &[String]) -> Result<Vec<VariantSource>> {
    if overrides.is_empty() {
        return Ok(default_sources(model_dir));
    }
    overrides.iter().map(|raw| parse_source(raw)).collect()
}

/// Loads each source once. A variant that fails to load is logged and left
/// out; the others are still benchmarked.
pub fn load_registry(sources: &[VariantSource], device: &Device) -> VariantRegistry {
    let backend = OrtBackend::new();
    let mut reg = VariantRegistry::new();
    for source in sources {
        let artifact = ModelArtifact::OnnxPath(source.path.clone());
        if let Err(err) = reg.load(&source.name, &backend, &artifact, device.clone()) {
            warn!(variant = %source.name, error = ?anyhow::Error::from(err), "variant excluded");
        }
    }
    reg
}

pub fn parse_device(raw: &str) -> Result<Device> {
    if raw.eq_ignore_ascii_case("cpu") {
        return Ok(Device::Cpu);
    }

    if raw.eq_ignore_ascii_case("coreml") {
        return Ok(Device::CoreMl);
    }

    if let Some(rest) = raw.strip_prefix("cuda:") {
        let device_id: u32 = rest.parse().context("invalid cuda device id")?;
        return Ok(Device::Cuda { device_id });
    }

    bail!("unsupported device: {raw} (expected cpu, cuda:N or coreml)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sources_keep_report_order() {
        let sources = default_sources(Path::new("models"));
        let names: Vec<_> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Baseline", "Student", "Pruned", "Pruned (int8)"]);
        assert_eq!(sources[3].path, PathBuf::from("models/pruned_int8.onnx"));
    }

    #[test]
    fn overrides_replace_defaults() {
        let sources = resolve_sources(
            Path::new("models"),
            &["Tiny = /tmp/tiny.onnx".to_string()],
        )
        .unwrap();
        assert_eq!(
            sources,
            vec![VariantSource {
                name: "Tiny".to_string(),
                path: PathBuf::from("/tmp/tiny.onnx"),
            }]
        );
    }

    #[test]
    fn malformed_variant_is_rejected() {
        assert!(parse_source("no-separator").is_err());
        assert!(parse_source("=path.onnx").is_err());
        assert!(parse_source("Name=").is_err());
    }

    #[test]
    fn devices() {
        assert_eq!(parse_device("CPU").unwrap(), Device::Cpu);
        assert_eq!(parse_device("coreml").unwrap(), Device::CoreMl);
        assert_eq!(
            parse_device("cuda:2").unwrap(),
            Device::Cuda { device_id: 2 }
        );
        assert!(parse_device("cuda:x").is_err());
        assert!(parse_device("tpu").is_err());
    }

    #[test]
    fn missing_files_are_excluded_not_fatal() {
        let sources = default_sources(Path::new("/nonexistent/model/dir"));
        let reg = load_registry(&sources, &Device::Cpu);
        assert!(reg.is_empty());
    }
}

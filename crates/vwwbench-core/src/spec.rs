use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct IOName(pub String);

#[derive(Clone, Debug, Serialize)]
pub struct TensorSpec {
    pub name: IOName,
    pub dtype: super::DType,
    pub rank: usize,
    pub dims: Vec<Option<usize>>, // None = dynamic
}

impl TensorSpec {
    /// True when every fixed dim equals the matching entry of `shape`.
    pub fn accepts(&self, dtype: super::DType, shape: &super::Shape) -> bool {
        self.dtype == dtype
            && self.rank == shape.rank()
            && self
                .dims
                .iter()
                .zip(shape.0.iter())
                .all(|(want, got)| want.map_or(true, |w| w == *got))
    }
}

impl std::fmt::Display for TensorSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dims = self
            .dims
            .iter()
            .map(|d| d.map_or_else(|| "?".to_string(), |d| d.to_string()))
            .collect::<Vec<_>>()
            .join("x");
        write!(f, "{}: {:?}[{}]", self.name.0, self.dtype, dims)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ModelSpec {
    pub inputs: Vec<TensorSpec>,
    pub outputs: Vec<TensorSpec>,
}

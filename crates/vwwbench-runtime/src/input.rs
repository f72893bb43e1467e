use vwwbench_core::{Shape, Tensor};

/// NCHW shape every variant is fed.
pub const INPUT_SHAPE: [usize; 4] = [1, 3, 96, 96];

const FILL_VALUE: f32 = 0.0;

/// Latency does not depend on pixel values for these models, so a constant
/// fill keeps runs byte-for-byte reproducible.
pub fn make_input() -> Tensor {
    Tensor::full_f32(Shape::from_slice(&INPUT_SHAPE), FILL_VALUE)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputPolicy {
    /// Build one tensor per variant and hand every call a handle to it.
    #[default]
    Shared,
    /// Build a new tensor for every call.
    FreshPerCall,
}

/// Per-variant input factory.
#[derive(Debug)]
pub struct InputSource {
    policy: InputPolicy,
    shared: Option<Tensor>,
}

impl InputSource {
    pub fn new(policy: InputPolicy) -> Self {
        let shared = match policy {
            InputPolicy::Shared => Some(make_input()),
            InputPolicy::FreshPerCall => None,
        };
        Self { policy, shared }
    }

    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    pub fn next(&self) -> Tensor {
        match &self.shared {
            Some(t) => t.clone(),
            None => make_input(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_input_is_deterministic() {
        let a = make_input();
        let b = make_input();
        assert_eq!(a.desc, b.desc);
        assert_eq!(a.bytes, b.bytes);
        assert_eq!(a.desc.shape.numel(), 3 * 96 * 96);
        assert_eq!(a.byte_len(), 3 * 96 * 96 * 4);
    }

    #[test]
    fn shared_policy_reuses_one_buffer() {
        let src = InputSource::new(InputPolicy::Shared);
        assert_eq!(src.next().bytes.as_ptr(), src.next().bytes.as_ptr());
    }

    #[test]
    fn fresh_policy_builds_new_buffers() {
        let src = InputSource::new(InputPolicy::FreshPerCall);
        let (a, b) = (src.next(), src.next());
        assert_ne!(a.bytes.as_ptr(), b.bytes.as_ptr());
        assert_eq!(a, b);
    }
}

pub mod artifact;
pub mod backend;
pub mod spec;
pub mod tensor;

pub use artifact::*;
pub use backend::*;
pub use spec::*;
pub use tensor::*;


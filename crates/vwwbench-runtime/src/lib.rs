pub mod error;
pub mod input;
pub mod invoker;
pub mod orchestrator;
pub mod registry;
pub mod worker;

pub use error::*;
pub use input::*;
pub use invoker::*;
pub use orchestrator::*;
pub use registry::*;
pub use worker::*;

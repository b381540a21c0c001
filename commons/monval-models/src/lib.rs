pub mod endpoint;
pub mod install;
pub mod readiness;

pub use endpoint::*;
pub use install::*;
pub use readiness::*;

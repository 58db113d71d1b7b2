//! Shim management: thin wrapper scripts that keep installed binaries on
//! one well-known PATH entry regardless of which backend installed them.

mod generator;
mod registry;

pub use generator::create_shim;
pub use generator::ensure_shim_dir;
pub use generator::path_instruction;
pub use generator::shim_dir;
pub use registry::ShimEntry;
pub use registry::ShimRegistry;

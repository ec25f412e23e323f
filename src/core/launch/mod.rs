pub mod classpath;
pub mod invocation;
pub mod natives;
pub mod task;

pub use classpath::{build_classpath, build_library_path};
pub use invocation::{
    build_invocation, build_invocation_from_cache, load_descriptor, LaunchInvocation,
};
pub use natives::{extract_natives, NativesOutcome};
pub use task::{build_command, launch};

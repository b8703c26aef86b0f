//! Shared plumbing for the command-line binaries.

use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;
use traction_calculator::export::timestamped_file_name;

/// Install a stderr `fmt` subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve an output argument: an existing directory receives a timestamped file name.
pub fn resolve_output(path: &Path, prefix: &str, extension: &str) -> PathBuf {
    if path.is_dir() {
        path.join(timestamped_file_name(prefix, extension))
    } else {
        path.to_path_buf()
    }
}

mod args;

pub use args::*;

use std::io::Read;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};

/// Reads a JSON document from `path`, or from stdin when `path` is `-`.
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let raw = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?
    };

    serde_json::from_str(&raw).wrap_err_with(|| format!("{} is not valid JSON", path.display()))
}

//! Utility helpers — data directory resolution.

use std::path::PathBuf;

/// Get the Promptlab data directory (e.g. `~/.promptlab/`).
pub fn get_data_path() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".promptlab")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_path_ends_with_promptlab() {
        let path = get_data_path();
        assert!(path.ends_with(".promptlab"));
    }
}

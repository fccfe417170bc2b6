//! Data directory layout.
//!
//! ```text
//! {data_dir}/
//!   config.toml
//!   hotel_data.db
//!   cleaned_hotel_bookings.csv      (default dataset location)
//!   models/                         (embedding model cache)
//!   index/
//!     booking_index.bin
//!     booking_embeddings.npy
//! ```

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "HOTELQA_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `HOTELQA_DATA_DIR` environment variable
/// 2. `~/.hotelqa`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".hotelqa");
    }

    PathBuf::from(".hotelqa")
}

/// Resolve a possibly relative path against the data directory.
pub fn resolve_in(data_dir: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        data_dir.join(candidate)
    }
}

/// Directory holding the persisted index files.
pub fn index_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("index")
}

/// Cache directory for downloaded embedding models.
pub fn model_cache_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("models")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_in_relative_and_absolute() {
        let data_dir = Path::new("/srv/hotelqa");
        assert_eq!(
            resolve_in(data_dir, "bookings.csv"),
            PathBuf::from("/srv/hotelqa/bookings.csv")
        );
        assert_eq!(
            resolve_in(data_dir, "/data/bookings.csv"),
            PathBuf::from("/data/bookings.csv")
        );
    }

    #[test]
    fn test_layout() {
        let data_dir = Path::new("/srv/hotelqa");
        assert_eq!(index_dir(data_dir), PathBuf::from("/srv/hotelqa/index"));
        assert_eq!(model_cache_dir(data_dir), PathBuf::from("/srv/hotelqa/models"));
    }
}

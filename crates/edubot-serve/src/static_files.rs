use std::path::Path;
use tower_http::services::ServeDir;

/// Read-only front-end assets. `ServeDir` normalizes paths, so requests can
/// never escape the asset root.
pub fn service(dir: &Path) -> ServeDir {
    ServeDir::new(dir)
}

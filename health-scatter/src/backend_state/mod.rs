mod data;

use std::path::{Path, PathBuf};

use app_core::backend::BackendState;

pub use data::{coerce_number, Dataset, Record};

/// State owned by the backend event loop.
pub struct BackendAppState {
    data_path: PathBuf,
}

impl BackendState for BackendAppState {}

impl BackendAppState {
    pub fn new(data_path: PathBuf) -> Self {
        Self { data_path }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }
}

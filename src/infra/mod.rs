//! Infrastructure adapters and runtime bootstrap.

pub mod error;
pub mod fs;
pub mod http;
pub mod telemetry;

use std::sync::Arc;

use crate::application::source::ResourceSource;
use crate::config::SourceSettings;

use self::{error::InfraError, fs::DirectorySource, http::HttpSource};

/// Build the resource source selected by configuration.
pub fn resource_source(settings: &SourceSettings) -> Result<Arc<dyn ResourceSource>, InfraError> {
    match settings {
        SourceSettings::Http { base_url } => Ok(Arc::new(HttpSource::new(base_url.clone())?)),
        SourceSettings::Directory { root } => Ok(Arc::new(DirectorySource::new(root.clone()))),
    }
}

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::application::source::{FetchError, ResourceSource};

use super::error::InfraError;

/// Fetches resources relative to a base URL.
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: Url) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(|err| InfraError::configuration(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base: directory_url(base),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("vitae/", env!("CARGO_PKG_VERSION"))
    }

    pub fn url(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|err| FetchError::invalid_path(path, err.to_string()))
    }
}

#[async_trait]
impl ResourceSource for HttpSource {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url(path)?;
        debug!(url = %url, "fetching resource");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::transport(path, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|err| FetchError::transport(path, err))
    }

    fn location(&self) -> String {
        self.base.to_string()
    }
}

/// Joining `blog_index.json` onto `https://host/site` would drop `site`; treat the base as a directory.
fn directory_url(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

//! Opening mapping and CSV sources.
//!
//! A location is either a URL (`http`, `https` or `file`) or a local path.
//! Both are read fully into memory.

use std::path::Path;

use reqwest::{Client, Url};

use crate::config::LoaderConfig;
use crate::error::{SourceError, SourceResult};

/// Whether `location` is a URL rather than a file path.
///
/// Single-letter schemes are Windows drive letters (`C:\data.csv`).
pub fn is_url(location: &str) -> bool {
    parse_url(location).is_some()
}

fn parse_url(location: &str) -> Option<Url> {
    Url::parse(location).ok().filter(|url| url.scheme().len() > 1)
}

/// Reads sources from disk or over HTTP.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    client: Client,
}

impl SourceLoader {
    pub fn new(config: &LoaderConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    /// Read the whole source.
    pub async fn load(&self, location: &str) -> SourceResult<Vec<u8>> {
        match parse_url(location) {
            Some(url) => self.load_url(url).await,
            None => read_file(Path::new(location)).await,
        }
    }

    async fn load_url(&self, url: Url) -> SourceResult<Vec<u8>> {
        match url.scheme() {
            "http" | "https" => {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(SourceError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.bytes().await?.to_vec())
            }
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| SourceError::UnsupportedScheme(url.to_string()))?;
                read_file(&path).await
            }
            other => Err(SourceError::UnsupportedScheme(other.to_string())),
        }
    }
}

async fn read_file(path: &Path) -> SourceResult<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })
}

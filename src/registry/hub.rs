//! Blocking client for the hub's dataset listing endpoint.
//! The listing is paginated; each response may carry a `Link: <url>; rel="next"` header.

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, LINK};
use reqwest::Url;

use super::{parse_listing, RegistryEntry, RegistrySource};
use crate::config::ExportConfig;
use crate::error::CatalogError;

pub struct HubClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
    page_size: usize,
}

/// Iterator over listing pages; stops after the page without a next link,
/// or when a next link points at a page already fetched.
pub struct Pages<'a> {
    hub: &'a HubClient,
    next: Option<String>,
    visited: HashSet<String>,
}

impl HubClient {
    pub fn new(
        endpoint: impl Into<String>,
        token: Option<String>,
        page_size: usize,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let endpoint = endpoint.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| CatalogError::Http {
                url: endpoint.clone(),
                source,
            })?;
        Ok(Self {
            client,
            endpoint,
            token,
            page_size,
        })
    }

    pub fn from_config(config: &ExportConfig) -> Result<Self, CatalogError> {
        Self::new(
            config.endpoint.clone(),
            config.token.clone(),
            config.page_size,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn first_page_url(&self) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}full=true&limit={}",
            self.endpoint, self.page_size
        )
    }

    pub fn pages(&self) -> Pages<'_> {
        Pages {
            hub: self,
            next: Some(self.first_page_url()),
            visited: HashSet::new(),
        }
    }

    fn fetch_page(&self, url: &str) -> Result<(Vec<RegistryEntry>, Option<String>), CatalogError> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = request.send().map_err(|source| CatalogError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let next = next_page_url(&response, url);
        let text = response.text().map_err(|source| CatalogError::Http {
            url: url.to_string(),
            source,
        })?;
        Ok((parse_listing(&text, url)?, next))
    }
}

impl Iterator for Pages<'_> {
    type Item = Result<Vec<RegistryEntry>, CatalogError>;

    fn next(&mut self) -> Option<Self::Item> {
        let url = self.next.take()?;
        let result = self.hub.fetch_page(&url);
        self.visited.insert(url.clone());
        match result {
            Ok((entries, next)) => {
                debug!("registry page {url}: {} entries", entries.len());
                self.next = match next {
                    Some(next) if self.visited.contains(&next) => {
                        warn!("registry next link from {url} revisits {next}; stopping pagination");
                        None
                    }
                    other => other,
                };
                Some(Ok(entries))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

impl RegistrySource for HubClient {
    fn list_datasets(&self) -> Result<Vec<RegistryEntry>, CatalogError> {
        let mut all = Vec::new();
        for page in self.pages() {
            all.extend(page?);
        }
        info!("fetched {} registry entries from {}", all.len(), self.endpoint);
        Ok(all)
    }
}

fn next_page_url(response: &Response, current: &str) -> Option<String> {
    let header = response.headers().get(LINK)?.to_str().ok()?;
    let link = parse_next_link(header)?;
    match Url::parse(current).and_then(|base| base.join(&link)) {
        Ok(url) => Some(url.to_string()),
        Err(err) => {
            warn!("ignoring unusable next link '{link}': {err}");
            None
        }
    }
}

/// Target of the `rel="next"` link in an RFC 8288 `Link` header value.
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim();
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        let is_next = parts.any(|param| {
            let param = param.trim();
            param
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"').split_whitespace().any(|r| r == "next"))
                .unwrap_or(false)
        });
        is_next.then(|| target.to_string())
    })
}

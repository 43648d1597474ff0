use crate::error::MetricError;
use core::fmt::{Display, Formatter};
use std::sync::Arc;
use url::Url;

/// Identity of a hosted repository, derived from its URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    url: Arc<Url>,
    host: Arc<str>,
    owner: Arc<str>,
    name: Arc<str>,
}

impl RepoRef {
    /// Resolve a URL of the form `https://<host>/<owner>/<repo>` into a repository identity.
    ///
    /// Trailing path segments (`/tree/main/...`) and a `.git` suffix are ignored, so every
    /// URL pointing into the same repository resolves to the same identity.
    pub fn parse(text: &str) -> Result<Self, MetricError> {
        let text = text.trim();
        let url = Url::parse(text).map_err(|e| MetricError::invalid_url(text, e.to_string()))?;

        if !matches!(url.scheme(), "https" | "http") {
            return Err(MetricError::invalid_url(text, format!("unsupported scheme '{}'", url.scheme())));
        }

        let Some(host) = url.host_str() else {
            return Err(MetricError::invalid_url(text, "missing host"));
        };

        let mut segments = url.path_segments().into_iter().flatten();
        let owner = segments.next().unwrap_or_default();
        let name = segments.next().unwrap_or_default().trim_end_matches(".git");

        if owner.is_empty() || name.is_empty() {
            return Err(MetricError::invalid_url(text, "expected '<host>/<owner>/<repo>'"));
        }

        let clean_url = Url::parse(&format!("https://{host}/{owner}/{name}"))
            .map_err(|e| MetricError::invalid_url(text, e.to_string()))?;

        Ok(Self {
            host: Arc::from(host),
            owner: Arc::from(owner),
            name: Arc::from(name),
            url: Arc::new(clean_url),
        })
    }

    /// Canonical `https://<host>/<owner>/<repo>` URL, suitable for cloning
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for RepoRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

use super::metric::{LOG_TARGET, Metric};
use crate::Result;
use crate::error::MetricError;
use crate::facts::{RepoRef, shallow_clone};
use ohno::IntoAppError;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// License identifiers considered compatible
pub const ALLOWED_LICENSES: &[&str] = &[
    "MIT",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "Apache-2.0",
    "GPL-2.0",
    "GPL-2.0-only",
    "GPL-2.0-or-later",
    "LGPL-2.1",
    "LGPL-2.1-only",
    "LGPL-2.1-or-later",
    "MPL-1.1",
];

/// `# License` style headings, or a `License` line underlined with `=`, `-`, `~`, or `^`
static LICENSE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^(?:[ \t]*#{1,6}[ \t]*(?:license|licence|legal)|[ \t]*(?:license|licence|legal)\b[^\n]*\n[ \t]*[=\-~^]{3,}[ \t]*\r?$)",
    )
    .expect("invalid license heading regex")
});

static ALLOWED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = ALLOWED_LICENSES.iter().map(|id| regex::escape(id)).collect::<Vec<_>>().join("|");
    Regex::new(&format!(r"(?i)(?:{alternation})")).expect("invalid license allow-list regex")
});

/// Checks whether a repository's declared license is on the allow-list
#[derive(Debug, Clone, Copy, Default)]
pub struct License;

impl License {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Metric for License {
    fn name(&self) -> &'static str {
        "license"
    }

    async fn score(&self, repo: &RepoRef) -> Result<f64, MetricError> {
        let checkout = shallow_clone(repo.url()).await.map_err(MetricError::CloneFailure)?;
        let root = checkout.path().to_path_buf();

        let text = tokio::task::spawn_blocking(move || extract_license_text(&root))
            .await
            .into_app_err("license scan task failed")
            .map_err(MetricError::CloneFailure)?
            .map_err(MetricError::CloneFailure)?;

        // scratch directory goes away here, before scoring
        drop(checkout);

        let Some(text) = text else {
            return Err(MetricError::NoData("no license text found"));
        };

        let allowed = is_allowed(&text);
        log::debug!(target: LOG_TARGET, "License text for '{repo}' is {}allow-listed", if allowed { "" } else { "not " });

        Ok(if allowed { 1.0 } else { 0.0 })
    }
}

/// Whether `text` contains any allow-listed license identifier, ignoring case.
#[must_use]
pub fn is_allowed(text: &str) -> bool {
    ALLOWED_PATTERN.is_match(text)
}

/// Collect license-relevant text from the top level of a working tree.
///
/// README files contribute everything from their first license or legal heading onward;
/// LICENSE files contribute their whole content. Returns `None` when nothing was found.
pub fn extract_license_text(root: &Path) -> Result<Option<String>> {
    let (readmes, licenses) = find_candidates(root)?;
    let mut text = String::new();

    for path in readmes {
        let content = read_lossy(&path)?;
        if let Some(section) = LICENSE_HEADING.find(&content).and_then(|found| content.get(found.start()..)) {
            text.push_str(section);
            text.push('\n');
        }
    }

    for path in licenses {
        text.push_str(&read_lossy(&path)?);
        text.push('\n');
    }

    Ok(if text.trim().is_empty() { None } else { Some(text) })
}

fn find_candidates(root: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut readmes = Vec::new();
    let mut licenses = Vec::new();

    let entries = fs::read_dir(root).into_app_err_with(|| format!("could not list '{}'", root.display()))?;
    for entry in entries {
        let entry = entry.into_app_err_with(|| format!("could not list '{}'", root.display()))?;
        if !entry.file_type().is_ok_and(|t| t.is_file()) {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name == "readme" || name.starts_with("readme.") {
            readmes.push(entry.path());
        } else if name.starts_with("license") || name.starts_with("licence") {
            licenses.push(entry.path());
        }
    }

    // directory order is platform-dependent
    readmes.sort();
    licenses.sort();

    Ok((readmes, licenses))
}

fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).into_app_err_with(|| format!("could not read file '{}'", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

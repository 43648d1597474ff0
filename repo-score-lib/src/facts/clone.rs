use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Instant;
use tempfile::TempDir;
use tokio::process::Command;
use url::Url;

const LOG_TARGET: &str = "     clone";
const GIT_TIMEOUT: Duration = Duration::from_mins(5);

/// A shallow clone living in a private scratch directory.
///
/// The directory is removed when the checkout is dropped, whichever way the
/// owning task finishes.
#[derive(Debug)]
pub struct Checkout {
    root: PathBuf,
    _scratch: TempDir,
}

impl Checkout {
    /// Root of the cloned working tree
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }
}

/// Make a depth-1, single-branch clone of `repo_url`.
pub async fn shallow_clone(repo_url: &Url) -> Result<Checkout> {
    let start_time = Instant::now();

    let scratch = tempfile::Builder::new()
        .prefix("repo-score-")
        .tempdir()
        .into_app_err("could not create scratch directory for clone")?;

    let root = scratch.path().join("checkout");
    let root_str = root.to_str().into_app_err("invalid UTF-8 in scratch directory path")?;

    log::debug!(target: LOG_TARGET, "Cloning '{repo_url}' into '{root_str}'");

    let output = run_git_with_timeout(&[
        "clone",
        "--depth",
        "1",
        "--single-branch",
        "--no-tags",
        repo_url.as_str(),
        root_str,
    ])
    .await?;
    check_git_output(&output, "git clone")?;

    log::debug!(target: LOG_TARGET, "Cloned '{repo_url}' in {:.3}s", start_time.elapsed().as_secs_f64());

    Ok(Checkout { root, _scratch: scratch })
}

fn check_git_output(output: &Output, operation: &str) -> Result<()> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{operation} failed: {}", stderr.trim());
    }
    Ok(())
}

async fn run_git_with_timeout(args: &[&str]) -> Result<Output> {
    let child = Command::new("git")
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .into_app_err("could not spawn git command")?;

    match tokio::time::timeout(GIT_TIMEOUT, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(e).into_app_err_with(|| format!("'git {}' failed to run", args.join(" "))),
        Err(_) => {
            bail!("'git {}' timed out after {} seconds", args.join(" "), GIT_TIMEOUT.as_secs());
        }
    }
}

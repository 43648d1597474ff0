use super::Host;
use super::config::Config;
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file (default is `repo-score.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    let config_path = args.config.as_deref();

    match Config::load(Utf8Path::new("."), config_path).and_then(|config| config.net_score().map(|_| ())) {
        Ok(()) => {
            let _ = writeln!(host.output(), "Configuration file is valid");
            if let Some(path) = config_path {
                let _ = writeln!(host.output(), "Config file: {path}");
            }
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "Configuration validation failed: {e:#}");
            host.exit(1);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::TestHost;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, text: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("repo-score.toml")).unwrap();
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "max_concurrent_repos = 8\n");

        let mut host = TestHost::new();
        validate_config(&mut host, &ValidateArgs { config: Some(path) }).unwrap();

        assert!(host.output_text().contains("Configuration file is valid"));
        assert_eq!(host.exit_code, None);
    }

    #[test]
    fn test_invalid_config_exits_with_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[weights]\nlicense = -2.0\n");

        let mut host = TestHost::new();
        let _ = validate_config(&mut host, &ValidateArgs { config: Some(path) }).unwrap_err();

        assert!(host.error_text().contains("Configuration validation failed"));
        assert_eq!(host.exit_code, Some(1));
    }
}

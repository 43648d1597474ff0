use super::Host;
use super::common::{ColorMode, LogLevel, OutputFormat, init_logging};
use super::config::Config;
use crate::Result;
use crate::facts::hosting::Client;
use crate::metrics::Scorer;
use crate::reports::{generate_console, generate_console_header, generate_ndjson};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{CommandFactory, Parser};
use futures_util::{StreamExt, stream};
use ohno::{IntoAppError, app_err};
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "     score";

#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// File listing one repository URL per line
    #[arg(value_name = "URL_FILE")]
    pub url_file: Utf8PathBuf,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Path to configuration file (default is `repo-score.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,

    /// Shape of the results written to standard output
    #[arg(long, value_name = "FORMAT", default_value = "ndjson")]
    pub format: OutputFormat,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,
}

/// Score every repository listed in the URL file, writing results in input order.
pub async fn score_repositories<H: Host>(host: &mut H, args: &ScoreArgs) -> Result<()> {
    init_logging(args.log_level);

    if !args.url_file.is_file() {
        let usage = ScoreArgs::command().name("score").bin_name("repo-score score").render_usage();
        let _ = writeln!(host.error(), "error: URL file '{}' does not exist\n\n{usage}", args.url_file);
        host.exit(1);
        return Err(app_err!("URL file '{}' does not exist", args.url_file));
    }

    let Some(token) = args.github_token.as_deref().filter(|token| !token.trim().is_empty()) else {
        let _ = writeln!(host.error(), "error: no GitHub token, set GITHUB_TOKEN or pass --github-token");
        host.exit(1);
        return Err(app_err!("no GitHub token provided"));
    };

    let config = Config::load(Utf8Path::new("."), args.config.as_deref())?;
    let urls = read_url_file(&args.url_file)?;
    log::info!(target: LOG_TARGET, "Scoring {} repositor(ies) from '{}'", urls.len(), args.url_file);

    let client = Client::new(token, config.api_url.as_str())?;
    let scorer = Scorer::new(&client, config.net_score()?, config.limits());
    let use_colors = args.color.use_colors();

    if args.format == OutputFormat::Console {
        let mut header = String::new();
        generate_console_header(use_colors, &mut header)?;
        let _ = write!(host.output(), "{header}");
    }

    let scorer = &scorer;
    let mut results = stream::iter(urls)
        .map(|url| async move { scorer.score_url(&url).await })
        .buffered(config.max_concurrent_repos);

    while let Some(result) = results.next().await {
        let mut text = String::new();
        match args.format {
            OutputFormat::Ndjson => generate_ndjson(&result, &mut text)?,
            OutputFormat::Console => generate_console(&result, use_colors, &mut text)?,
        }

        let mut output = host.output();
        output.write_all(text.as_bytes()).into_app_err("could not write results")?;
        output.flush().into_app_err("could not write results")?;
    }

    Ok(())
}

/// Read repository URLs, one per line, skipping blank lines and `#` comments.
pub fn read_url_file(path: &Utf8Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).into_app_err_with(|| format!("reading URL file '{path}'"))?;
    Ok(parse_url_list(&text))
}

fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

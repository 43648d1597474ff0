use crate::Result;
use crate::metrics::NetScoreResult;
use core::fmt::Write;
use owo_colors::OwoColorize;

const SCORE_WIDTH: usize = 11;

const COLUMNS: [&str; 5] = ["NET", "RAMP-UP", "CORRECTNESS", "BUS FACTOR", "LICENSE"];

/// Write the column headings.
pub fn generate_header<W: Write>(use_colors: bool, writer: &mut W) -> Result<()> {
    let mut line = String::new();
    for column in COLUMNS {
        write!(line, "{column:>SCORE_WIDTH$}  ")?;
    }
    line.push_str("REPOSITORY");

    if use_colors {
        writeln!(writer, "{}", line.bold())?;
    } else {
        writeln!(writer, "{line}")?;
    }

    Ok(())
}

/// Write one repository as a table row.
pub fn generate<W: Write>(result: &NetScoreResult, use_colors: bool, writer: &mut W) -> Result<()> {
    write_score(writer, result.net_score, use_colors)?;
    for metric in [&result.ramp_up, &result.correctness, &result.bus_factor, &result.license] {
        write_score(writer, metric.score, use_colors)?;
    }

    writeln!(writer, "{}", result.url)?;
    Ok(())
}

fn write_score<W: Write>(writer: &mut W, score: f64, use_colors: bool) -> Result<()> {
    let text = if score < 0.0 { "n/a".to_string() } else { format!("{score:.3}") };
    let padded = format!("{text:>SCORE_WIDTH$}");

    if !use_colors {
        write!(writer, "{padded}  ")?;
    } else if score < 0.0 {
        write!(writer, "{}  ", padded.dimmed())?;
    } else if score >= 0.7 {
        write!(writer, "{}  ", padded.green())?;
    } else if score >= 0.4 {
        write!(writer, "{}  ", padded.yellow())?;
    } else {
        write!(writer, "{}  ", padded.red())?;
    }

    Ok(())
}

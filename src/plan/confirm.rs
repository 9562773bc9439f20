//! The interactive gate in front of the installation phase.

use anyhow::{Result, bail};
use std::io::{BufRead, Write};

use super::{SizeSummary, SizedSet};
use crate::format::disk_usage_readable;

pub const PROMPT: &str = "==> Do you want to proceed with the installation? [y/yes/n/no]";
pub const INVALID_INPUT: &str = "Invalid input. Please enter 'y', 'yes', 'n', or 'no'.";

/// Write the sized packages and their totals.
pub fn render_estimate<W: Write>(
    summary: &SizeSummary,
    sized: &SizedSet,
    output: &mut W,
) -> Result<()> {
    let noun = if sized.len() == 1 { "Formula" } else { "Formulae" };

    writeln!(output, "==> Looking for bottles...")?;
    writeln!(output, "{} ({}): {}", noun, sized.len(), sized.names().join(", "))?;
    writeln!(output)?;
    writeln!(output, "Download Size: {}", disk_usage_readable(to_signed(summary.download)))?;
    writeln!(output, "Install Size:  {}", disk_usage_readable(to_signed(summary.installed)))?;
    if summary.net != 0 {
        writeln!(output, "Net Install Size: {}", disk_usage_readable(summary.net))?;
    }
    Ok(())
}

/// Map a line of input to a decision; `None` for anything outside y/yes/n/no.
pub fn parse_response(line: &str) -> Option<bool> {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Prompt until a recognised answer arrives. There is no retry limit.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool> {
    loop {
        writeln!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("No answer received before end of input");
        }

        match parse_response(&line) {
            Some(answer) => return Ok(answer),
            None => writeln!(output, "{}", INVALID_INPUT)?,
        }
    }
}

/// Show the estimate, then ask whether to go ahead.
pub fn confirm<R: BufRead, W: Write>(
    summary: &SizeSummary,
    sized: &SizedSet,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    render_estimate(summary, sized, output)?;
    ask(input, output)
}

fn to_signed(bytes: u64) -> i64 {
    i64::try_from(bytes).unwrap_or(i64::MAX)
}

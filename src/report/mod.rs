//! Final test report and exit code.

use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{
    cli::Profile,
    driver::INDENT,
    plugin::{PluginResult, RunState},
    printer::{Color, TextPrinter},
};

/// Plugin results in the order the plugins were run.
#[derive(Debug, Default, Serialize)]
pub struct Results {
    plugins: Vec<PluginEntry>,
}

#[derive(Debug, Serialize)]
struct PluginEntry {
    name: String,
    #[serde(flatten)]
    result: PluginResult,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, result: PluginResult) {
        self.plugins.push(PluginEntry { name: name.into(), result });
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &PluginResult)> {
        self.plugins
            .iter()
            .filter(|e| e.result.is_failed())
            .map(|e| (e.name.as_str(), &e.result))
    }

    /// Print the summary; returns the process exit code.
    pub fn print<W: Write>(&self, p: &mut TextPrinter<W>) -> Result<u8> {
        self.print_statuses(p)?;

        let failed: Vec<_> = self.failed().collect();
        if !failed.is_empty() {
            p.colored_line(Color::Red, "============= FAILED TEST =============")?;
            for (name, result) in failed {
                p.line(&format!(
                    "{}FAILED: {} DETAILS: {}",
                    INDENT,
                    name,
                    result.details_display()
                ))?;
            }
            return Ok(1);
        }

        if self.is_empty() {
            p.colored_line(Color::Yellow, "No tests are run.")?;
        } else {
            p.colored_line(Color::Green, "All tests passed.")?;
        }
        Ok(0)
    }

    /// Status lines of the plugins finished before the run stopped on an error.
    pub fn print_aborted<W: Write>(&self, p: &mut TextPrinter<W>) -> Result<()> {
        self.print_statuses(p)?;
        p.colored_line(Color::Red, "============= RUN ABORTED =============")?;
        Ok(())
    }

    fn print_statuses<W: Write>(&self, p: &mut TextPrinter<W>) -> Result<()> {
        p.line("============= TEST RESULT =============")?;
        for entry in &self.plugins {
            let color = match entry.result.state {
                RunState::Succeeded => Color::Green,
                RunState::Skipped => Color::Yellow,
                RunState::Failed => Color::Red,
            };
            p.colored_line(
                color,
                &format!(
                    "{}{}: {}",
                    INDENT,
                    entry.result.state.to_string().to_uppercase(),
                    entry.name
                ),
            )?;
            if entry.result.state != RunState::Succeeded {
                p.line(&format!(
                    "{}{} DETAILS: {}",
                    INDENT,
                    INDENT,
                    entry.result.details_display()
                ))?;
            }
        }
        Ok(())
    }

    pub fn write_json(&self, profile: Profile, path: &Path) -> Result<()> {
        let doc = serde_json::json!({
            "profile": profile,
            "plugins": self.plugins,
        });
        fs::write(path, serde_json::to_string_pretty(&doc)?)
            .with_context(|| format!("writing report to {}", path.display()))
    }
}

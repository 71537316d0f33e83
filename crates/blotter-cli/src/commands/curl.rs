//! `blotter curl`: replayable command lines for captured tasks.

use anyhow::{Result, bail};
use blotter_core::curl::curl_description;
use std::fmt::Write as _;
use std::path::Path;

use crate::archive::Archive;
use crate::output;

/// Execute the curl command.
pub fn execute(input: &Path, task: Option<&str>) -> Result<()> {
    let archive = Archive::load(input)?;

    let selected: Vec<_> = archive
        .tasks
        .iter()
        .filter(|archived| task.is_none_or(|id| archived.id.as_deref() == Some(id)))
        .collect();

    if let Some(id) = task {
        if selected.is_empty() {
            bail!("No task with id '{id}' in {}", input.display());
        }
    }

    let mut text = String::new();
    for archived in selected {
        let _ = writeln!(text, "{}", curl_description(&archived.task));
    }
    output::write_output(None, text.as_bytes())
}

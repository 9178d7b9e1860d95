//! Graft CLI binary
//!
//! This is the main entry point for the graft command-line interface.
//! The CLI is a thin adapter over the library APIs - NO edit logic is
//! implemented here.

use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = graft::cli::parse_args();

    // Initialize logger if verbose
    if cli.verbose {
        env_logger::init();
    }

    // Execute command
    let result = match cli.command {
        graft::cli::Commands::Locate {
            file,
            snippet,
            snippet_file,
        } => execute_locate(&file, snippet, snippet_file.as_deref()),

        graft::cli::Commands::Apply {
            file,
            proposals,
            dry_run,
            allow_partial,
            checkpoint,
            json,
        } => execute_apply(&file, &proposals, dry_run, allow_partial, checkpoint, json),

        graft::cli::Commands::Restore { manifest, root } => execute_restore(&manifest, &root),
    };

    // Handle result
    match result {
        Ok(msg) => {
            println!("{}", msg);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Execute the locate command.
///
/// Reads the file and the snippet, resolves the snippet with the full
/// three-strategy algorithm, and reports the span or the reason nothing
/// unique was found.
fn execute_locate(
    file_path: &Path,
    snippet: Option<String>,
    snippet_file: Option<&Path>,
) -> Result<String, graft::GraftError> {
    use graft::locate::{locate, LocateOutcome};
    use graft::workspace::read_source;

    // Step 1: Read the haystack
    let source = read_source(file_path)?;

    // Step 2: Read the needle (inline or from a file)
    let needle = match (snippet, snippet_file) {
        (Some(inline), None) => inline,
        (None, Some(path)) => read_source(path)?.as_str().to_string(),
        _ => {
            return Err(graft::GraftError::Other(
                "Provide exactly one of --snippet or --snippet-file".to_string(),
            ));
        }
    };

    // Step 3: Resolve and report
    match locate(source.as_str(), &needle) {
        LocateOutcome::Unique(span) => Ok(format!(
            "Unique match at bytes {}..{} (line {})",
            span.start,
            span.end,
            source.line_of(span.start)
        )),
        LocateOutcome::NotFound => Err(graft::GraftError::Other(format!(
            "Snippet not found in {}",
            file_path.display()
        ))),
        LocateOutcome::Ambiguous(count) => Err(graft::GraftError::Other(format!(
            "Snippet matches {} locations in {}; provide more context",
            count,
            file_path.display()
        ))),
    }
}

/// Execute the apply command.
///
/// This function is a thin adapter that:
/// 1. Reads the target file
/// 2. Loads the proposal set
/// 3. Plans and materializes the edits in memory
/// 4. Decides whether the result may be written (partial-success policy)
/// 5. Optionally checkpoints, then writes atomically
fn execute_apply(
    file_path: &Path,
    proposals_path: &Path,
    dry_run: bool,
    allow_partial: bool,
    checkpoint: bool,
    json: bool,
) -> Result<String, graft::GraftError> {
    use graft::cli::ApplyPayload;
    use graft::plan::{load_proposals_from_file, plan};
    use graft::report::{change_stats, summarize};
    use graft::workspace::{content_hash, read_source, write_atomic};

    // Step 1: Read the target file
    let source = read_source(file_path)?;

    // Step 2: Load the proposal set
    let proposals = load_proposals_from_file(proposals_path)?;

    // Step 3: Plan and materialize in memory
    let outcome = plan(&source, &proposals)?;
    let summary = summarize(&source, &outcome);

    // Step 4: Partial-success policy. Zero applied means there is nothing
    // worth writing; partial results need an explicit opt-in.
    if outcome.applied_count() == 0 {
        if json {
            let payload = ApplyPayload {
                status: "failed",
                applied: 0,
                failed: outcome.failures.len(),
                written: false,
                changes: Vec::new(),
                failures: failure_lines(&outcome),
                content_hash: None,
                checkpoint_manifest: None,
            };
            println!("{}", render_json(&payload)?);
        }
        return Err(graft::GraftError::Other(format!(
            "No proposal could be applied:\n{}",
            summary
        )));
    }

    if !outcome.success && !allow_partial {
        return Err(graft::GraftError::Other(format!(
            "{} of {} proposals failed (use --allow-partial to write anyway):\n{}",
            outcome.failures.len(),
            outcome.proposal_count(),
            summary
        )));
    }

    let new_text = match &outcome.new_text {
        Some(text) => text,
        None => {
            return Err(graft::GraftError::Other(
                "Planner returned no text for a non-empty apply".to_string(),
            ));
        }
    };

    // Step 5: Checkpoint and write
    let mut checkpoint_manifest = None;
    let written = !dry_run;
    if written {
        if checkpoint {
            let root = file_path.parent().ok_or_else(|| {
                graft::GraftError::Other("Cannot determine workspace root".to_string())
            })?;
            let mut writer = graft::workspace::checkpoint::CheckpointWriter::new(root, None)?;
            writer.snapshot(file_path)?;
            let manifest_path = writer.finalize()?;
            log::info!("Checkpoint manifest at {}", manifest_path.display());
            checkpoint_manifest = Some(manifest_path.display().to_string());
        }
        write_atomic(file_path, new_text)?;
    }

    if json {
        let payload = ApplyPayload {
            status: if outcome.success { "ok" } else { "partial" },
            applied: outcome.applied_count(),
            failed: outcome.failures.len(),
            written,
            changes: change_stats(&source, &outcome),
            failures: failure_lines(&outcome),
            content_hash: written.then(|| content_hash(new_text.as_str().as_bytes())),
            checkpoint_manifest,
        };
        return render_json(&payload);
    }

    let action = if dry_run { "Planned" } else { "Patched" };
    Ok(format!("{} {}:\n{}", action, file_path.display(), summary))
}

/// Execute the restore command.
fn execute_restore(manifest_path: &Path, root: &Path) -> Result<String, graft::GraftError> {
    use graft::workspace::checkpoint::restore_checkpoint;

    let restored = restore_checkpoint(manifest_path, root)?;
    Ok(format!("Restored {} file(s)", restored))
}

fn failure_lines(outcome: &graft::ApplyOutcome) -> Vec<String> {
    outcome
        .failures
        .iter()
        .map(|failure| failure.reason.to_string())
        .collect()
}

fn render_json(payload: &graft::cli::ApplyPayload) -> Result<String, graft::GraftError> {
    serde_json::to_string_pretty(payload)
        .map_err(|err| graft::GraftError::Other(format!("Failed to render JSON: {}", err)))
}

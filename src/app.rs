//! Application pipeline: configure, walk, classify, report, resolve.

use std::cell::RefCell;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::{
    confirm, delete_batch, link_batch, ActionError, ActionOutcome, BatchCallback, BatchResult,
    DeleteConfig, LinkKind,
};
use crate::cli::{Cli, Commands, FindArgs, OutputFormat};
use crate::config::Config;
use crate::duplicates::{ClassificationResult, Classifier, ClassifierConfig};
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};
use crate::progress::{Progress, ProgressCallback, PHASE_WALK};
use crate::scanner::{FileEntry, ScanError, Walker};

/// Run the parsed command line on the process's stdin and stdout.
///
/// # Errors
///
/// Fatal errors only: bad configuration, a missing or unreadable root,
/// a fingerprint failure in strict mode, or a broken stdout.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    match cli.command {
        Commands::Find(ref args) => run_find(
            args,
            cli.quiet,
            cli.no_color,
            &mut stdin.lock(),
            &mut stdout.lock(),
        ),
    }
}

/// Writes a status line per action as the batch runs.
struct StatusPrinter<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> StatusPrinter<W> {
    fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }
}

impl<W: Write> BatchCallback for StatusPrinter<W> {
    fn on_success(&self, outcome: &ActionOutcome) {
        if let Err(e) = writeln!(self.out.borrow_mut(), "{}", outcome.status_line()) {
            log::warn!("Failed to write status line: {}", e);
        }
    }

    fn on_failure(&self, error: &ActionError) {
        eprintln!("{}", error);
    }
}

fn run_find<R: BufRead, W: Write>(
    args: &FindArgs,
    quiet: bool,
    no_color: bool,
    input: &mut R,
    out: &mut W,
) -> Result<ExitCode> {
    let config = Config::load(args.config.as_deref(), &args.overrides(no_color))
        .context("Failed to load configuration")?;
    let json = args.output == OutputFormat::Json;

    log::info!("Scanning {}", args.path.display());
    log::debug!("Config: {:?}", config);

    let hide_progress = quiet || json || !io::stderr().is_terminal();
    let progress = Arc::new(Progress::new(hide_progress));

    let (files, walk_errors) = walk(args, &config, progress.as_ref())?;

    let classifier = Classifier::new(
        ClassifierConfig::default()
            .with_algorithm(config.algorithm)
            .with_strategy(config.mode)
            .with_jobs(config.jobs)
            .with_strict(args.strict)
            .with_progress_callback(progress),
    );
    let result = classifier
        .classify(&files)
        .context("Fingerprinting failed")?;

    let batch = if json {
        report_json(&files, &result, &config, out)?;
        if args.delete || args.link.is_some() {
            act(args.link, &config, &result, None)
        } else {
            None
        }
    } else {
        let color = config.color && io::stdout().is_terminal();
        let text = TextOutput::new(color);
        resolve_interactive(args, &config, &files, &result, text, input, out)?
    };

    let action_errors = batch.as_ref().map_or(0, BatchResult::failure_count);
    let had_errors = walk_errors > 0 || result.failure_count() > 0 || action_errors > 0;
    Ok(ExitCode::from_outcome(had_errors, result.has_duplicates()))
}

/// Walk the tree. Errors at the root are fatal; deeper ones are counted.
fn walk(args: &FindArgs, config: &Config, progress: &Progress) -> Result<(Vec<FileEntry>, usize)> {
    let walker = Walker::new(&args.path, config.walker_config());
    let mut files = Vec::new();
    let mut errors = 0;

    progress.on_phase_start(PHASE_WALK, 0);
    for item in walker.walk() {
        match item {
            Ok(file) => {
                files.push(file);
                progress.on_progress(files.len(), "");
            }
            Err(e) if is_root_error(&e, &walker) => {
                progress.on_phase_end(PHASE_WALK);
                return Err(e).with_context(|| format!("Cannot scan {}", args.path.display()));
            }
            Err(e) => {
                log::warn!("{}", e);
                errors += 1;
            }
        }
    }
    progress.on_phase_end(PHASE_WALK);

    log::info!("Found {} file(s) ({} walk error(s))", files.len(), errors);
    Ok((files, errors))
}

fn is_root_error(error: &ScanError, walker: &Walker) -> bool {
    matches!(error, ScanError::PathNotFound(_)) || error.path() == walker.root()
}

fn report_json<W: Write>(
    files: &[FileEntry],
    result: &ClassificationResult,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    JsonOutput::new(files, result, config.mode, config.algorithm)
        .write_to(out, true)
        .context("Failed to write JSON report")
}

/// Listing, summary, then the view and resolve prompts.
fn resolve_interactive<R: BufRead, W: Write>(
    args: &FindArgs,
    config: &Config,
    files: &[FileEntry],
    result: &ClassificationResult,
    text: TextOutput,
    input: &mut R,
    out: &mut W,
) -> Result<Option<BatchResult>> {
    text.write_listing(&mut *out, files)
        .and_then(|()| writeln!(out))
        .and_then(|()| text.write_summary(&mut *out, result))
        .context("Failed to write report")?;

    if !result.has_duplicates() {
        return Ok(None);
    }

    if !args.delete {
        if args.yes || confirm("View duplicate files?", &mut *input, &mut *out) {
            text.write_duplicates(&mut *out, result)
                .context("Failed to write duplicates")?;
        }

        let prompt = match args.link {
            Some(kind) => format!(
                "Replace {} duplicate(s) with {} links?",
                result.duplicate_count(),
                kind
            ),
            None => format!("Delete {} duplicate(s)?", result.duplicate_count()),
        };
        if !(args.yes || confirm(&prompt, &mut *input, &mut *out)) {
            log::info!("Left duplicates in place");
            return Ok(None);
        }
    }

    let batch = {
        let printer = StatusPrinter::new(&mut *out);
        act(args.link, config, result, Some(&printer))
    };
    if let Some(ref batch) = batch {
        writeln!(out, "{}", batch.summary()).context("Failed to write report")?;
    }
    Ok(batch)
}

/// Delete or link every duplicate. `None` when there is nothing to do.
fn act(
    link: Option<LinkKind>,
    config: &Config,
    result: &ClassificationResult,
    callback: Option<&dyn BatchCallback>,
) -> Option<BatchResult> {
    if !result.has_duplicates() {
        return None;
    }
    let batch = match link {
        Some(kind) => link_batch(&result.duplicates, kind, callback),
        None => {
            let delete = if config.trash {
                DeleteConfig::trash()
            } else {
                DeleteConfig::permanent()
            };
            delete_batch(&result.duplicate_paths(), &delete, callback)
        }
    };
    Some(batch)
}

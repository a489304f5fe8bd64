//! Plain-text report.
//!
//! The file listing alternates cyan and blue lines so neighbouring paths are
//! easy to tell apart. Color is off when the writer is not a terminal or the
//! operator disabled it.

use std::io::{self, Write};
use std::path::Path;

use bytesize::ByteSize;
use yansi::Paint;

use crate::duplicates::ClassificationResult;

/// Text report writer.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput {
    color: bool,
}

impl TextOutput {
    /// Create a writer; `color` enables ANSI styling.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint_path(&self, index: usize, path: &Path) -> String {
        let text = path.display().to_string();
        if !self.color {
            return text;
        }
        if index % 2 == 0 {
            text.cyan().to_string()
        } else {
            text.blue().to_string()
        }
    }

    /// Write one line per path, alternating colors.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_listing<W, P>(&self, writer: &mut W, paths: &[P]) -> io::Result<()>
    where
        W: Write,
        P: AsRef<Path>,
    {
        for (index, path) in paths.iter().enumerate() {
            writeln!(writer, " {}", self.paint_path(index, path.as_ref()))?;
        }
        Ok(())
    }

    /// Write the count summary and the reclaimable space.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_summary<W: Write>(
        &self,
        writer: &mut W,
        result: &ClassificationResult,
    ) -> io::Result<()> {
        writeln!(writer, "{}", result.summary_line())?;
        if result.has_duplicates() {
            let reclaim = format!(
                "Reclaimable space: {}",
                ByteSize::b(result.reclaimable_bytes())
            );
            if self.color {
                writeln!(writer, "{}", reclaim.bold())?;
            } else {
                writeln!(writer, "{}", reclaim)?;
            }
        }
        if result.failure_count() > 0 {
            writeln!(writer, "Skipped file(s): {}", result.failure_count())?;
        }
        Ok(())
    }

    /// Write each duplicate group: the original, then its copies indented.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_duplicates<W: Write>(
        &self,
        writer: &mut W,
        result: &ClassificationResult,
    ) -> io::Result<()> {
        for group in result.groups() {
            let header = format!("{} [{}]", group.original.display(), group.fingerprint.short());
            if self.color {
                writeln!(writer, "{}", header.green())?;
            } else {
                writeln!(writer, "{}", header)?;
            }
            for (index, copy) in group.copies.iter().enumerate() {
                writeln!(writer, "   {}", self.paint_path(index, copy))?;
            }
        }
        Ok(())
    }
}

//! Human-readable rendering of a [`RunSummary`].
//!
//! ```text
//! Found 2 duplicate file(s)!
//! Duplicate files moved to: /photos/duplicates/
//! ```
//!
//! With `detailed` output every group is listed with its kept and resolved
//! members.

use std::io::{self, Write};
use std::path::Path;

use yansi::Paint;

use crate::actions::Action;
use crate::duplicates::RunSummary;

/// Text formatter for run summaries.
pub struct TextOutput<'a> {
    summary: &'a RunSummary,
    detailed: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a formatter; `detailed` adds one block per duplicate group.
    #[must_use]
    pub fn new(summary: &'a RunSummary, detailed: bool) -> Self {
        Self { summary, detailed }
    }

    /// Render the summary to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let s = self.summary;
        let mut out = String::new();

        if !s.has_duplicates() {
            out.push_str("No duplicate files found\n");
            self.render_errors(&mut out);
            return out;
        }

        out.push_str(&format!(
            "{}\n",
            format!("Found {} duplicate file(s)!", s.duplicate_groups).bold()
        ));

        if self.detailed {
            for group in &s.groups {
                out.push_str(&format!("{}\n", group.fingerprint.dim()));
                out.push_str(&format!("  keep   {}\n", group.kept.green()));
                for removal in &group.removed {
                    match removal.destination {
                        Some(ref to) => out.push_str(&format!(
                            "  move   {} -> {}\n",
                            removal.name.yellow(),
                            display_relative(to, &s.directory)
                        )),
                        None => {
                            out.push_str(&format!("  delete {}\n", removal.name.red()));
                        }
                    }
                }
            }
        }

        if s.dry_run {
            out.push_str(&format!(
                "Dry run: {} file(s) would be {}, nothing was changed\n",
                s.files_removed,
                match s.action {
                    Action::Delete => "removed",
                    Action::MoveAside => "moved",
                }
            ));
        } else if s.action == Action::Delete {
            out.push_str("Duplicate files removed!\n");
        } else if let Some(ref dir) = s.duplicates_dir {
            out.push_str(&format!(
                "Duplicate files moved to: {}{}\n",
                dir.display(),
                std::path::MAIN_SEPARATOR
            ));
        }

        if self.detailed && s.files_removed > 0 {
            out.push_str(&format!(
                "{} file(s), {} reclaimed\n",
                s.files_removed,
                s.reclaimed_display()
            ));
        }

        if s.interrupted {
            out.push_str(&format!(
                "{}\n",
                format!(
                    "Interrupted: {} of {} group(s) resolved",
                    s.groups.len(),
                    s.duplicate_groups
                )
                .yellow()
            ));
        }

        self.render_errors(&mut out);
        out
    }

    fn render_errors(&self, out: &mut String) {
        let errors = &self.summary.errors;
        if errors.is_empty() {
            return;
        }
        out.push_str(&format!(
            "{}\n",
            format!("{} file(s) could not be processed:", errors.len()).red()
        ));
        for error in errors {
            out.push_str(&format!("  {}\n", error.message));
        }
    }

    /// Write the rendered summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())
    }
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

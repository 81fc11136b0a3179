//! File body rendering.
//!
//! Changed files are shown as their LCS diff against the pre-patch baseline,
//! one marker-prefixed line per tagged line. Unchanged files get a neutral
//! margin so both kinds line up.

use navpatch_diff::{split_lines, LineDiff, LineTag};
use navpatch_tree::{ContentResult, File};

use crate::config::RenderConfig;

#[derive(Clone, Debug, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Prefix every line with the unchanged margin.
    pub fn pad(&self, body: &str) -> String {
        let mut out = String::with_capacity(body.len());
        for line in split_lines(body) {
            out.push_str(&self.config.unchanged_margin);
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Render `current` as a diff against `baseline`.
    pub fn annotate(&self, baseline: &str, current: &str) -> String {
        let diff = LineDiff::from_texts(baseline, current);
        let mut out = String::with_capacity(current.len() + baseline.len() / 2);
        for line in diff.iter() {
            let marker = match line.tag {
                LineTag::Common => &self.config.context_marker,
                LineTag::OnlyOld => &self.config.removed_marker,
                LineTag::OnlyNew => &self.config.added_marker,
            };
            out.push_str(marker);
            out.push_str(line.text);
            out.push('\n');
        }
        out
    }

    /// Render a file's current content, annotated if `changed`.
    pub fn render_file(&self, file: &File, changed: bool) -> ContentResult<String> {
        let current = file.content()?;
        if changed {
            Ok(self.annotate(file.baseline()?, current))
        } else {
            Ok(self.pad(current))
        }
    }
}

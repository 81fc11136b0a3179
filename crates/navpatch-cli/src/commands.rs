use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use navpatch_diff::parse_patch;
use navpatch_nav::{
    Entry, Level, LevelView, Navigation, Navigator, NavigatorConfig, RenderConfig,
};
use navpatch_overlay::path::join;
use navpatch_overlay::{ChangeIndex, DiffStats};
use navpatch_tree::{Folder, FsRepository, FsRepositoryConfig, TreeNode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::*;

/// Contents of the `--config` file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub repository: FsRepositoryConfig,
    pub render: RenderConfig,
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Show(args) => cmd_show(args, config, cli.format),
        Command::Tree(args) => cmd_tree(args, config, cli.format),
        Command::Stats(args) => cmd_stats(args, config, cli.format),
    }
}

fn read_patch(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading patch from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading patch {source}"))
    }
}

fn open(source: &SourceArgs, config: CliConfig) -> anyhow::Result<Navigator> {
    let text = read_patch(&source.patch)?;
    let patch = parse_patch(&text).with_context(|| format!("parsing patch {}", source.patch))?;
    debug!(changes = patch.len(), base = %source.base.display(), "patch parsed");

    let repo = FsRepository::with_config(&source.base, config.repository);
    let nav = Navigator::new(&repo, &patch, NavigatorConfig { render: config.render })?;
    report_problems(&nav);
    Ok(nav)
}

fn report_problems(nav: &Navigator) {
    for rejected in nav.rejected() {
        eprintln!("{} {}", "rejected:".yellow().bold(), rejected);
    }
    for skipped in nav.skipped() {
        eprintln!(
            "{} {} ({})",
            "skipped:".yellow(),
            skipped.path.display(),
            skipped.reason
        );
    }
}

// show

#[derive(Serialize)]
struct ShowReport<'a> {
    levels: &'a [Level],
    error: Option<String>,
}

fn cmd_show(args: ShowArgs, config: CliConfig, format: OutputFormat) -> anyhow::Result<()> {
    let nav = open(&args.source, config)?;
    let navigation = nav.navigate_to(&args.path);
    match format {
        OutputFormat::Text => print!("{}", show_text(&navigation, nav.renderer().config())),
        OutputFormat::Json => {
            let report = ShowReport {
                levels: &navigation.levels,
                error: navigation.error.as_ref().map(ToString::to_string),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    if let Some(err) = navigation.error {
        bail!(err);
    }
    Ok(())
}

fn show_text(navigation: &Navigation, render: &RenderConfig) -> String {
    let mut out = String::new();
    for level in &navigation.levels {
        let _ = writeln!(out, "{}", format!("/{}", level.path).bold().underline());
        match &level.view {
            LevelView::Listing { entries } => {
                for entry in entries {
                    let _ = writeln!(out, "{}", listing_line(entry));
                }
            }
            LevelView::Body { text, changed } => {
                for line in text.lines() {
                    let _ = writeln!(out, "{}", body_line(line, *changed, render));
                }
            }
            LevelView::Failed { error } => {
                let _ = writeln!(out, "{} {}", "error:".red().bold(), error);
            }
        }
        out.push('\n');
    }
    out
}

fn listing_line(entry: &Entry) -> String {
    let cursor = if entry.is_open { ">" } else { " " };
    let name = if entry.is_folder {
        format!("{}/", entry.name).blue().bold().to_string()
    } else {
        entry.name.clone()
    };
    format!("{cursor} {name}{}", stats_suffix(&entry.stats))
}

fn body_line(line: &str, changed: bool, render: &RenderConfig) -> String {
    if !changed {
        return line.to_string();
    }
    let starts = |marker: &str| !marker.is_empty() && line.starts_with(marker);
    if starts(&render.added_marker) {
        line.green().to_string()
    } else if starts(&render.removed_marker) {
        line.red().to_string()
    } else {
        line.to_string()
    }
}

fn stats_suffix(stats: &DiffStats) -> String {
    if stats.is_zero() {
        return String::new();
    }
    let mut out = format!(
        "  {} {}",
        format!("+{}", stats.additions).green(),
        format!("-{}", stats.deletions).red()
    );
    if stats.added {
        let _ = write!(out, " {}", "[added]".green());
    }
    if stats.removed {
        let _ = write!(out, " {}", "[removed]".red());
    }
    out
}

// tree

fn cmd_tree(args: SourceArgs, config: CliConfig, format: OutputFormat) -> anyhow::Result<()> {
    let nav = open(&args, config)?;
    match format {
        OutputFormat::Text => print!("{}", nav.root().outline()),
        OutputFormat::Json => {
            let tree = tree_json(nav.root(), "", nav.index());
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct TreeJson {
    name: String,
    folder: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<DiffStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeJson>,
}

fn tree_json(folder: &Folder, path: &str, index: &ChangeIndex) -> TreeJson {
    let children = folder
        .children()
        .iter()
        .map(|child| {
            let child_path = join(path, child.name());
            match child {
                TreeNode::Folder(sub) => tree_json(sub, &child_path, index),
                TreeNode::File(file) => TreeJson {
                    name: file.name().to_string(),
                    folder: false,
                    stats: index.get(&child_path).cloned(),
                    children: Vec::new(),
                },
            }
        })
        .collect();
    TreeJson {
        name: folder.name().to_string(),
        folder: true,
        stats: index.get(path).cloned(),
        children,
    }
}

// stats

fn cmd_stats(args: SourceArgs, config: CliConfig, format: OutputFormat) -> anyhow::Result<()> {
    let nav = open(&args, config)?;
    match format {
        OutputFormat::Text => print!("{}", stats_text(nav.index())),
        OutputFormat::Json => {
            let map: BTreeMap<&str, &DiffStats> = nav.index().iter().collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
    }
    Ok(())
}

fn stats_text(index: &ChangeIndex) -> String {
    let mut out = String::new();
    for (path, stats) in index.iter() {
        let marker = if index.is_changed_file(path) { " " } else { "/" };
        let _ = writeln!(
            out,
            "{:>6} {:>6}  {path}{marker}",
            format!("+{}", stats.additions).green(),
            format!("-{}", stats.deletions).red()
        );
    }
    let (additions, deletions) = index.totals();
    let _ = writeln!(
        out,
        "{} files changed, {} insertions(+), {} deletions(-)",
        index.files().count(),
        additions,
        deletions
    );
    out
}

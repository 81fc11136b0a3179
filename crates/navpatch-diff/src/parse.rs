//! Unified-diff text to [`PatchSet`].
//!
//! Understands plain `diff -u` output and `git diff` output. Everything
//! outside `---`/`+++` headers and hunk bodies is treated as preamble and
//! skipped, which covers `diff --git`, `index` and mode lines.
//!
//! Hunk body lines are kept byte for byte, including a trailing `'\r'` from
//! a CRLF file. Header and marker lines tolerate one.

use crate::error::{ParseError, ParseResult};
use crate::hunk::{ChangeVerb, FileChange, Hunk, HunkLine, PatchSet};
use crate::line_diff::split_lines;

const DEV_NULL: &str = "/dev/null";

/// Parse unified-diff text into a patch set.
pub fn parse_patch(text: &str) -> ParseResult<PatchSet> {
    let lines: Vec<&str> = split_lines(text).collect();
    let mut set = PatchSet::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(src) = header(lines[i]).strip_prefix("--- ") else {
            i += 1;
            continue;
        };
        let Some(dst) = lines.get(i + 1).and_then(|l| header(l).strip_prefix("+++ ")) else {
            i += 1;
            continue;
        };
        let src = header_path(src, "a/");
        let dst = header_path(dst, "b/");
        i += 2;

        let (verb, path) = match (src == DEV_NULL, dst == DEV_NULL) {
            (true, true) => return Err(ParseError::new(i - 1, "both sides are /dev/null")),
            (true, false) => (ChangeVerb::Add, dst),
            (false, true) => (ChangeVerb::Delete, src),
            (false, false) => (ChangeVerb::Edit, dst),
        };

        let mut hunks = Vec::new();
        while let Some(hunk_header) = lines
            .get(i)
            .map(|l| header(l))
            .filter(|l| l.starts_with("@@"))
        {
            let (old_start, old_count, new_start, new_count) = parse_hunk_header(hunk_header)
                .ok_or_else(|| {
                    ParseError::new(i + 1, format!("malformed hunk header {hunk_header:?}"))
                })?;
            i += 1;

            let mut body = Vec::new();
            let mut no_newline_at_end = false;
            let (mut old_seen, mut new_seen) = (0, 0);
            while old_seen < old_count || new_seen < new_count {
                let Some(line) = lines.get(i) else {
                    return Err(ParseError::new(i, "hunk body ends early"));
                };
                let parsed = match line.chars().next() {
                    Some(' ') => HunkLine::Context(line[1..].to_string()),
                    // Some tools strip the single space from empty context lines.
                    None => HunkLine::Context(String::new()),
                    Some('-') => HunkLine::Removed(line[1..].to_string()),
                    Some('+') => HunkLine::Added(line[1..].to_string()),
                    Some('\\') => {
                        no_newline_at_end |= ends_new_side(&body);
                        i += 1;
                        continue;
                    }
                    Some(_) => {
                        return Err(ParseError::new(i + 1, format!("unexpected hunk line {line:?}")))
                    }
                };
                match parsed {
                    HunkLine::Context(_) => {
                        old_seen += 1;
                        new_seen += 1;
                    }
                    HunkLine::Removed(_) => old_seen += 1,
                    HunkLine::Added(_) => new_seen += 1,
                }
                if old_seen > old_count || new_seen > new_count {
                    return Err(ParseError::new(i + 1, "hunk body longer than its header"));
                }
                body.push(parsed);
                i += 1;
            }
            while lines.get(i).is_some_and(|l| l.starts_with('\\')) {
                no_newline_at_end |= ends_new_side(&body);
                i += 1;
            }

            hunks.push(Hunk {
                old_start,
                old_count,
                new_start,
                new_count,
                lines: body,
                no_newline_at_end,
            });
        }

        set.push(FileChange::new(verb, path, hunks));
    }

    Ok(set)
}

/// A header or marker line without the `'\r'` a CRLF patch file leaves on it.
fn header(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// A `\ No newline` marker applies to the line before it. Only a context or
/// added line can be the last line of the new text.
fn ends_new_side(body: &[HunkLine]) -> bool {
    matches!(body.last(), Some(HunkLine::Context(_) | HunkLine::Added(_)))
}

/// Strip trailing tab metadata (timestamps) and the `a/`/`b/` prefix.
fn header_path(raw: &str, prefix: &str) -> String {
    let path = raw.split('\t').next().unwrap_or(raw).trim_end();
    if path == DEV_NULL {
        return path.to_string();
    }
    path.strip_prefix(prefix).unwrap_or(path).to_string()
}

/// `@@ -a[,b] +c[,d] @@ optional section`
fn parse_hunk_header(line: &str) -> Option<(usize, usize, usize, usize)> {
    let rest = line.strip_prefix("@@ ")?;
    let end = rest.find(" @@")?;
    let mut ranges = rest[..end].split(' ');
    let old = ranges.next()?.strip_prefix('-')?;
    let new = ranges.next()?.strip_prefix('+')?;
    if ranges.next().is_some() {
        return None;
    }
    let (old_start, old_count) = parse_range(old)?;
    let (new_start, new_count) = parse_range(new)?;
    Some((old_start, old_count, new_start, new_count))
}

fn parse_range(range: &str) -> Option<(usize, usize)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

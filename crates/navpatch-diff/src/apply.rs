//! Hunk application.
//!
//! Hunks carry positions in the unmodified base text. As earlier hunks grow
//! or shrink the buffer, a running drift shifts every later acceptance point.

use tracing::debug;

use crate::error::PatchConflict;
use crate::hunk::Hunk;
use crate::line_diff::split_lines;

/// Apply `hunks` in order to `base` and return the patched text.
///
/// Each hunk's old segment (context and removed lines) must match the buffer
/// literally at `anchor + drift`. The first mismatch aborts the whole file
/// with a [`PatchConflict`]; no partially patched text is returned.
///
/// Lines are split on `'\n'` only, so a `'\r'` must match too. The final
/// newline follows the base unless a hunk reaches the end of the text, in
/// which case [`Hunk::no_newline_at_end`] decides.
pub fn apply_hunks(base: &str, hunks: &[Hunk]) -> Result<String, PatchConflict> {
    let mut buffer: Vec<&str> = split_lines(base).collect();
    let mut final_newline = base.is_empty() || base.ends_with('\n');
    let mut drift: isize = 0;
    // End of the previous hunk's new segment; the next hunk may not start before it.
    let mut floor = 0usize;

    for (hunk_index, hunk) in hunks.iter().enumerate() {
        let old: Vec<&str> = hunk.old_lines().collect();
        let at = hunk.anchor() as isize + drift;

        let in_bounds = at >= 0 && (at as usize) >= floor && at as usize + old.len() <= buffer.len();
        let matches = in_bounds && {
            let at = at as usize;
            buffer[at..at + old.len()] == old[..]
        };

        if !matches {
            let start = at.clamp(0, buffer.len() as isize) as usize;
            let end = (start + old.len()).min(buffer.len());
            let conflict = PatchConflict {
                hunk_index,
                line: start + 1,
                expected: old.iter().map(|s| s.to_string()).collect(),
                actual: buffer[start..end].iter().map(|s| s.to_string()).collect(),
            };
            debug!(hunk = hunk_index, line = conflict.line, "hunk does not apply");
            return Err(conflict);
        }

        let at = at as usize;
        if at + old.len() == buffer.len() {
            final_newline = !hunk.no_newline_at_end;
        }
        let new: Vec<&str> = hunk.new_lines().collect();
        let new_len = new.len();
        buffer.splice(at..at + old.len(), new);
        drift += new_len as isize - old.len() as isize;
        floor = at + new_len;
    }

    let mut out = buffer.join("\n");
    if final_newline && !buffer.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hunk::HunkLine;

    fn ctx(s: &str) -> HunkLine {
        HunkLine::Context(s.into())
    }
    fn del(s: &str) -> HunkLine {
        HunkLine::Removed(s.into())
    }
    fn add(s: &str) -> HunkLine {
        HunkLine::Added(s.into())
    }

    #[test]
    fn replaces_a_middle_line() {
        let hunk = Hunk::new(1, 1, vec![ctx("1"), del("2"), add("two"), ctx("3")]);
        let out = apply_hunks("1\n2\n3\n", &[hunk]).unwrap();
        assert_eq!(out, "1\ntwo\n3\n");
    }

    #[test]
    fn add_against_empty_base() {
        let hunk = Hunk::new(0, 1, vec![add("hello")]);
        assert_eq!(apply_hunks("", &[hunk]).unwrap(), "hello\n");
    }

    #[test]
    fn delete_everything() {
        let hunk = Hunk::new(1, 0, vec![del("a"), del("b")]);
        assert_eq!(apply_hunks("a\nb\n", &[hunk]).unwrap(), "");
    }

    #[test]
    fn drift_shifts_later_hunks() {
        let base = "a\nb\nc\nd\ne\nf\ng\n";
        // First hunk grows the file by two lines; the second still names
        // its position in the unmodified base.
        let first = Hunk::new(1, 1, vec![ctx("a"), add("a1"), add("a2"), ctx("b")]);
        let second = Hunk::new(6, 8, vec![ctx("f"), del("g"), add("G")]);
        let out = apply_hunks(base, &[first, second]).unwrap();
        assert_eq!(out, "a\na1\na2\nb\nc\nd\ne\nf\nG\n");
    }

    #[test]
    fn negative_drift() {
        let base = "a\nb\nc\nd\ne\n";
        let first = Hunk::new(1, 1, vec![del("a"), del("b"), ctx("c")]);
        let second = Hunk::new(4, 2, vec![ctx("d"), add("d2"), ctx("e")]);
        let out = apply_hunks(base, &[first, second]).unwrap();
        assert_eq!(out, "c\nd\nd2\ne\n");
    }

    #[test]
    fn insertion_after_line() {
        let hunk = Hunk::new(2, 3, vec![add("inserted")]);
        let out = apply_hunks("one\ntwo\nthree\n", &[hunk]).unwrap();
        assert_eq!(out, "one\ntwo\ninserted\nthree\n");
    }

    #[test]
    fn context_mismatch_is_a_conflict() {
        let hunk = Hunk::new(1, 1, vec![ctx("1"), del("2"), add("two"), ctx("3")]);
        let err = apply_hunks("1\nX\n3\n", &[hunk]).unwrap_err();
        assert_eq!(err.hunk_index, 0);
        assert_eq!(err.line, 1);
        assert_eq!(err.expected, vec!["1", "2", "3"]);
        assert_eq!(err.actual, vec!["1", "X", "3"]);
    }

    #[test]
    fn conflict_in_later_hunk_discards_earlier_work() {
        let first = Hunk::new(1, 1, vec![del("a"), add("A")]);
        let second = Hunk::new(3, 3, vec![del("zzz"), add("Z")]);
        let err = apply_hunks("a\nb\nc\n", &[first, second]).unwrap_err();
        assert_eq!(err.hunk_index, 1);
        assert_eq!(err.actual, vec!["c"]);
    }

    #[test]
    fn hunk_past_end_is_a_conflict() {
        let hunk = Hunk::new(10, 10, vec![ctx("x"), add("y")]);
        let err = apply_hunks("a\n", &[hunk]).unwrap_err();
        assert!(err.actual.is_empty());
    }

    #[test]
    fn overlapping_hunks_are_rejected() {
        let first = Hunk::new(1, 1, vec![ctx("a"), del("b"), add("B")]);
        let second = Hunk::new(1, 1, vec![ctx("a"), add("x")]);
        assert!(apply_hunks("a\nb\n", &[first, second]).is_err());
    }

    #[test]
    fn crlf_base_needs_crlf_hunk() {
        let base = "1\r\n2\r\n3\r\n";
        let lf = Hunk::new(1, 1, vec![ctx("1"), del("2"), add("two"), ctx("3")]);
        let err = apply_hunks(base, &[lf]).unwrap_err();
        assert_eq!(err.actual, vec!["1\r", "2\r", "3\r"]);

        let crlf = Hunk::new(1, 1, vec![ctx("1\r"), del("2\r"), add("two\r"), ctx("3\r")]);
        assert_eq!(apply_hunks(base, &[crlf]).unwrap(), "1\r\ntwo\r\n3\r\n");
    }

    #[test]
    fn untouched_unterminated_tail_is_kept() {
        let hunk = Hunk::new(1, 1, vec![del("1"), add("one")]);
        assert_eq!(apply_hunks("1\n2\n3", &[hunk]).unwrap(), "one\n2\n3");
    }

    #[test]
    fn hunk_at_end_decides_final_newline() {
        let trimmed = Hunk::new(3, 3, vec![del("3"), add("three")]).without_final_newline();
        assert_eq!(apply_hunks("1\n2\n3\n", &[trimmed]).unwrap(), "1\n2\nthree");

        let restore = Hunk::new(3, 3, vec![del("3"), add("three")]);
        assert_eq!(apply_hunks("1\n2\n3", &[restore]).unwrap(), "1\n2\nthree\n");

        let append = Hunk::new(1, 2, vec![add("b")]);
        assert_eq!(apply_hunks("a", &[append]).unwrap(), "a\nb\n");
    }

    #[test]
    fn deterministic_output() {
        let hunk = Hunk::new(2, 2, vec![del("b"), add("B")]);
        let base = "a\nb\nc\n";
        let hunks = [hunk];
        assert_eq!(apply_hunks(base, &hunks), apply_hunks(base, &hunks));
    }
}

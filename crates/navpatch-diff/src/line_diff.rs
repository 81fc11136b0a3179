//! Line-level diff: LCS alignment of two line sequences.
//!
//! Uses the `similar` crate with its LCS algorithm. Line identity is exact
//! string equality, carriage returns included. The alignment is computed once in [`LineDiff::new`]; each
//! call to [`LineDiff::iter`] walks it again from the start.

use similar::{capture_diff_slices, Algorithm, DiffOp, DiffTag};

/// Split `text` on `'\n'` only.
///
/// A `'\r'` before the newline stays part of the line, so CRLF and LF text
/// never compare equal. A final unterminated line is still yielded.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
}

/// Which side(s) of the diff a line belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineTag {
    /// Present in both sequences.
    Common,
    /// Present only in the old sequence (a deletion).
    OnlyOld,
    /// Present only in the new sequence (an addition).
    OnlyNew,
}

/// A line together with its tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaggedLine<'a> {
    pub tag: LineTag,
    pub text: &'a str,
}

/// The alignment of an old and a new line sequence.
#[derive(Clone, Debug)]
pub struct LineDiff<'a> {
    old: Vec<&'a str>,
    new: Vec<&'a str>,
    ops: Vec<DiffOp>,
}

impl<'a> LineDiff<'a> {
    pub fn new(old: Vec<&'a str>, new: Vec<&'a str>) -> Self {
        let ops = capture_diff_slices(Algorithm::Lcs, &old, &new);
        Self { old, new, ops }
    }

    /// Diff two texts line by line. The `'\n'` terminator is not part of a line.
    pub fn from_texts(old: &'a str, new: &'a str) -> Self {
        Self::new(split_lines(old).collect(), split_lines(new).collect())
    }

    /// Walk the tagged lines in order. Removals precede additions within a
    /// replaced region.
    pub fn iter(&self) -> impl Iterator<Item = TaggedLine<'a>> + '_ {
        let old = &self.old;
        let new = &self.new;
        self.ops.iter().flat_map(move |op| {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            let common = tag == DiffTag::Equal;
            // Equal ops cover the same lines on both sides; emit them once.
            let new_range = if common {
                new_range.start..new_range.start
            } else {
                new_range
            };
            let old_side = old_range.map(move |i| TaggedLine {
                tag: if common { LineTag::Common } else { LineTag::OnlyOld },
                text: old[i],
            });
            let new_side = new_range.map(move |i| TaggedLine {
                tag: LineTag::OnlyNew,
                text: new[i],
            });
            old_side.chain(new_side)
        })
    }

    pub fn additions(&self) -> usize {
        self.iter().filter(|l| l.tag == LineTag::OnlyNew).count()
    }

    pub fn deletions(&self) -> usize {
        self.iter().filter(|l| l.tag == LineTag::OnlyOld).count()
    }

    /// Returns `true` if both sequences are identical.
    pub fn is_unchanged(&self) -> bool {
        self.iter().all(|l| l.tag == LineTag::Common)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tags(diff: &LineDiff<'_>) -> Vec<(LineTag, String)> {
        diff.iter().map(|l| (l.tag, l.text.to_string())).collect()
    }

    #[test]
    fn identical_sequences_are_all_common() {
        let diff = LineDiff::from_texts("a\nb\n", "a\nb\n");
        assert!(diff.is_unchanged());
        assert_eq!(diff.additions(), 0);
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn single_replacement() {
        let diff = LineDiff::from_texts("1\n2\n3\n", "1\ntwo\n3\n");
        assert_eq!(
            tags(&diff),
            vec![
                (LineTag::Common, "1".to_string()),
                (LineTag::OnlyOld, "2".to_string()),
                (LineTag::OnlyNew, "two".to_string()),
                (LineTag::Common, "3".to_string()),
            ]
        );
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 1);
    }

    #[test]
    fn empty_to_content_is_all_additions() {
        let diff = LineDiff::from_texts("", "hello\nworld\n");
        assert_eq!(diff.additions(), 2);
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn content_to_empty_is_all_deletions() {
        let diff = LineDiff::from_texts("bye\n", "");
        assert_eq!(diff.additions(), 0);
        assert_eq!(diff.deletions(), 1);
    }

    #[test]
    fn iteration_is_restartable() {
        let diff = LineDiff::from_texts("a\nb\nc\n", "a\nc\nd\n");
        let first = tags(&diff);
        let second = tags(&diff);
        assert_eq!(first, second);
    }

    #[test]
    fn whitespace_differences_are_not_equal() {
        let diff = LineDiff::from_texts("x \n", "x\n");
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 1);
    }

    #[test]
    fn split_keeps_carriage_returns() {
        assert_eq!(split_lines("a\r\nb\n").collect::<Vec<_>>(), vec!["a\r", "b"]);
        assert_eq!(split_lines("a\nb").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(split_lines("").count(), 0);
        assert_eq!(split_lines("\n").collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn crlf_and_lf_lines_differ() {
        let diff = LineDiff::from_texts("x\r\ny\r\n", "x\ny\r\n");
        assert_eq!(
            tags(&diff),
            vec![
                (LineTag::OnlyOld, "x\r".to_string()),
                (LineTag::OnlyNew, "x".to_string()),
                (LineTag::Common, "y\r".to_string()),
            ]
        );
    }

    proptest! {
        #[test]
        fn counts_balance_line_totals(
            old in proptest::collection::vec("[abc]", 0..12),
            new in proptest::collection::vec("[abc]", 0..12),
        ) {
            let old_refs: Vec<&str> = old.iter().map(String::as_str).collect();
            let new_refs: Vec<&str> = new.iter().map(String::as_str).collect();
            let diff = LineDiff::new(old_refs, new_refs);

            let common = diff.iter().filter(|l| l.tag == LineTag::Common).count();
            prop_assert_eq!(common + diff.deletions(), old.len());
            prop_assert_eq!(common + diff.additions(), new.len());

            let rebuilt_old: Vec<&str> = diff
                .iter()
                .filter(|l| l.tag != LineTag::OnlyNew)
                .map(|l| l.text)
                .collect();
            prop_assert_eq!(rebuilt_old, old.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}

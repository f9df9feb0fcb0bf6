//! Run-length encoding of move sequences for compact reporting.

use itertools::Itertools;

use crate::Direction;

/// Collapse consecutive equal moves into `(move, count)` runs.
pub fn compress<M: PartialEq + Copy>(moves: &[M]) -> Vec<(M, usize)> {
    moves
        .iter()
        .copied()
        .dedup_with_count()
        .map(|(count, m)| (m, count))
        .collect()
}

pub fn expand<M: Copy>(runs: &[(M, usize)]) -> Vec<M> {
    runs.iter()
        .flat_map(|&(m, count)| std::iter::repeat(m).take(count))
        .collect()
}

/// `{count}{letter}` tokens separated by spaces, e.g. `3L 1U 2R`.
pub fn format_runs(runs: &[(Direction, usize)]) -> String {
    runs.iter()
        .map(|(d, count)| format!("{}{}", count, d.letter()))
        .join(" ")
}

/// Inverse of [`format_runs`]. `None` on a malformed token.
pub fn parse_runs(s: &str) -> Option<Vec<(Direction, usize)>> {
    s.split_whitespace()
        .map(|token| {
            let letter = token.chars().last()?;
            let count = token[..token.len() - letter.len_utf8()].parse().ok()?;
            let direction = Direction::ALL.into_iter().find(|d| d.letter() == letter)?;
            Some((direction, count))
        })
        .collect()
}

pub fn compress_path(actions: &[Direction]) -> String {
    format_runs(&compress(actions))
}

#[cfg(test)]
mod test {
    use super::*;
    use Direction::*;

    #[test]
    fn runs_keep_order() {
        let path = [Left, Left, Left, Up, Right, Right, Left];
        assert_eq!(
            compress(&path),
            vec![(Left, 3), (Up, 1), (Right, 2), (Left, 1)]
        );
        assert_eq!(compress_path(&path), "3L 1U 2R 1L");
    }

    #[test]
    fn expansion_restores_sequence() {
        let paths: [&[Direction]; 4] = [
            &[Up],
            &[Down, Down, Down, Down],
            &[Left, Right, Left, Right],
            &[Up, Up, Left, Down, Down, Down, Right, Up],
        ];
        for path in paths {
            assert_eq!(expand(&compress(path)), path);
            assert_eq!(parse_runs(&compress_path(path)), Some(compress(path)));
        }
    }

    #[test]
    fn empty_path_has_no_runs() {
        assert!(compress::<Direction>(&[]).is_empty());
        assert_eq!(compress_path(&[]), "");
        assert_eq!(parse_runs(""), Some(vec![]));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert_eq!(parse_runs("3X"), None);
        assert_eq!(parse_runs("L"), None);
        assert_eq!(parse_runs("2L x"), None);
    }
}

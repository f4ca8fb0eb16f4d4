//! Letter re-bucketing
//!
//! A letter's raw position is wherever the user clicked. On export each
//! letter is shown centered in the interval between the two adjacent
//! boundaries (lines, or the inner rectangle's edges) that contains it.

use super::annotation::{Letter, Line};

/// Sorted boundary set: every line plus both range edges.
///
/// Duplicates are kept; they form zero-width buckets that only ever
/// match a position sitting exactly on them.
pub fn boundaries(lines: &[Line], range_start: f32, range_end: f32) -> Vec<f32> {
    let mut bounds: Vec<f32> = Vec::with_capacity(lines.len() + 2);
    bounds.extend(lines.iter().map(|line| line.position));
    bounds.push(range_start);
    bounds.push(range_end);
    bounds.sort_by(f32::total_cmp);
    bounds
}

/// Midpoint of the first bucket (ascending) containing `pos`, inclusive
/// on both ends.
///
/// Positions below the lowest boundary snap to the first bucket and
/// positions above the highest one snap to the last. Returns `None` for
/// NaN or when there is no bucket at all.
pub fn bucket_midpoint(bounds: &[f32], pos: f32) -> Option<f32> {
    if bounds.len() < 2 || pos.is_nan() {
        return None;
    }

    let pair = bounds
        .windows(2)
        .find(|pair| pair[0] <= pos && pos <= pair[1])
        .or_else(|| {
            if pos < bounds[0] {
                bounds.windows(2).next()
            } else {
                bounds.windows(2).last()
            }
        })?;

    Some((pair[0] + pair[1]) / 2.0)
}

/// Recompute the displayed position of every letter against the current
/// lines.
///
/// The result has the same length, order and labels as `letters`. Input
/// is never modified, so this can be re-run after any number of line
/// edits.
pub fn recalculate_letter_positions(
    lines: &[Line],
    letters: &[Letter],
    range_start: f32,
    range_end: f32,
) -> Vec<Letter> {
    let bounds = boundaries(lines, range_start, range_end);

    letters
        .iter()
        .map(|letter| match bucket_midpoint(&bounds, letter.position) {
            Some(mid) => Letter::new(letter.label.clone(), mid),
            None => {
                log::debug!(
                    "Letter {:?} at {} fits no bucket, keeping raw position",
                    letter.label,
                    letter.position
                );
                letter.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(xs: &[f32]) -> Vec<Line> {
        xs.iter().copied().map(Line::new).collect()
    }

    fn positions(letters: &[Letter]) -> Vec<f32> {
        letters.iter().map(|l| l.position).collect()
    }

    #[test]
    fn test_letter_between_two_lines() {
        let out = recalculate_letter_positions(
            &lines(&[100.0, 300.0]),
            &[Letter::new("a", 210.0)],
            50.0,
            400.0,
        );
        assert_eq!(positions(&out), vec![200.0]);
    }

    #[test]
    fn test_no_lines_uses_whole_range() {
        let out = recalculate_letter_positions(&[], &[Letter::new("a", 180.0)], 0.0, 500.0);
        assert_eq!(positions(&out), vec![250.0]);
    }

    #[test]
    fn test_single_line_splits_range() {
        let out = recalculate_letter_positions(
            &lines(&[50.0]),
            &[Letter::new("a", 20.0), Letter::new("b", 70.0)],
            0.0,
            100.0,
        );
        assert_eq!(positions(&out), vec![25.0, 75.0]);
    }

    #[test]
    fn test_unsorted_lines_are_sorted() {
        let out = recalculate_letter_positions(
            &lines(&[300.0, 100.0, 200.0]),
            &[Letter::new("x", 150.0), Letter::new("y", 250.0)],
            0.0,
            400.0,
        );
        assert_eq!(positions(&out), vec![150.0, 250.0]);
    }

    #[test]
    fn test_position_on_line_takes_first_bucket() {
        let out = recalculate_letter_positions(
            &lines(&[100.0]),
            &[Letter::new("a", 100.0)],
            0.0,
            400.0,
        );
        assert_eq!(positions(&out), vec![50.0]);
    }

    #[test]
    fn test_position_on_range_edges() {
        let out = recalculate_letter_positions(
            &lines(&[100.0]),
            &[Letter::new("a", 0.0), Letter::new("b", 400.0)],
            0.0,
            400.0,
        );
        assert_eq!(positions(&out), vec![50.0, 250.0]);
    }

    #[test]
    fn test_duplicate_lines_are_harmless() {
        let out = recalculate_letter_positions(
            &lines(&[100.0, 100.0]),
            &[Letter::new("a", 100.0), Letter::new("b", 120.0)],
            0.0,
            200.0,
        );
        // 100.0 matches [0, 100] before the zero-width [100, 100]
        assert_eq!(positions(&out), vec![50.0, 150.0]);
    }

    #[test]
    fn test_out_of_range_clamps_to_nearest_bucket() {
        let out = recalculate_letter_positions(
            &lines(&[100.0]),
            &[Letter::new("low", -30.0), Letter::new("high", 900.0)],
            0.0,
            400.0,
        );
        assert_eq!(positions(&out), vec![50.0, 250.0]);
    }

    #[test]
    fn test_nan_position_is_left_alone() {
        let out = recalculate_letter_positions(&[], &[Letter::new("a", f32::NAN)], 0.0, 10.0);
        assert!(out[0].position.is_nan());
        assert_eq!(out[0].label, "a");
    }

    #[test]
    fn test_order_length_and_labels_preserved() {
        let letters = vec![
            Letter::new("c", 390.0),
            Letter::new("a", 10.0),
            Letter::new("b", 210.0),
            Letter::new("a", 15.0),
        ];
        let out = recalculate_letter_positions(&lines(&[100.0, 300.0]), &letters, 0.0, 400.0);
        assert_eq!(out.len(), letters.len());
        let labels: Vec<&str> = out.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["c", "a", "b", "a"]);
        assert_eq!(positions(&out), vec![350.0, 50.0, 200.0, 50.0]);
    }

    #[test]
    fn test_recalculation_is_idempotent_and_non_destructive() {
        let ls = lines(&[120.0, 240.0]);
        let letters = vec![Letter::new("a", 130.0), Letter::new("b", 5.0)];
        let first = recalculate_letter_positions(&ls, &letters, 0.0, 360.0);
        let second = recalculate_letter_positions(&ls, &letters, 0.0, 360.0);
        assert_eq!(first, second);
        assert_eq!(positions(&letters), vec![130.0, 5.0]);
    }

    #[test]
    fn test_lines_added_after_letters_are_reflected() {
        let letters = vec![Letter::new("a", 130.0)];
        let mut ls = lines(&[]);
        let before = recalculate_letter_positions(&ls, &letters, 0.0, 400.0);
        assert_eq!(positions(&before), vec![200.0]);

        ls.push(Line::new(100.0));
        let after = recalculate_letter_positions(&ls, &letters, 0.0, 400.0);
        assert_eq!(positions(&after), vec![250.0]);
    }

    #[test]
    fn test_every_in_range_position_lands_in_its_bucket() {
        let ls = lines(&[37.0, 180.0, 90.5, 260.0]);
        let bounds = boundaries(&ls, 0.0, 300.0);
        let mut pos = 0.0;
        while pos <= 300.0 {
            let mid = bucket_midpoint(&bounds, pos).unwrap();
            let pair = bounds
                .windows(2)
                .find(|p| p[0] <= pos && pos <= p[1])
                .unwrap();
            assert!(pair[0] <= mid && mid <= pair[1]);
            assert_eq!(mid, (pair[0] + pair[1]) / 2.0);
            pos += 0.75;
        }
    }
}

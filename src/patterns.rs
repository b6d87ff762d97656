//! Five-cell window scoring for the static evaluator.
//!
//! Every horizontal, vertical and diagonal run of five cells on the board is a
//! "window". A window is encoded in base 3 (one digit per cell, `0` = empty,
//! `1` = mine, `2` = opponent's, first cell least significant), which yields
//! 243 possible windows. Their scores are precomputed once into a lookup table.
//!
//! ## Scoring rules
//! - A window holding stones of both players can never become a line: 0.
//! - A window holding only my stones scores [`STONE_WEIGHTS`] by stone count,
//!   plus [`RUN_BONUS`] for the longest unbroken run.
//! - A window holding only opponent stones scores the exact negation.

use std::sync::OnceLock;

use crate::constants::{RUN_BONUS, STONE_WEIGHTS, WINDOW, WINDOW_PATTERNS};

/// Static storage for the window score table.
static WINDOW_SCORES: OnceLock<[i64; WINDOW_PATTERNS]> = OnceLock::new();

/// Look up the score of an encoded window.
#[inline]
pub fn window_score(index: usize) -> i64 {
    WINDOW_SCORES.get_or_init(make_window_scores)[index]
}

/// Encode five cell states (0, 1 or 2) into a table index.
#[inline]
pub fn encode_window(cells: [u8; WINDOW]) -> usize {
    cells
        .iter()
        .rev()
        .fold(0, |acc, &c| acc * 3 + c as usize)
}

/// Decode a table index back into five cell states.
pub fn decode_window(mut index: usize) -> [u8; WINDOW] {
    let mut cells = [0u8; WINDOW];
    for cell in &mut cells {
        *cell = (index % 3) as u8;
        index /= 3;
    }
    cells
}

/// Build the full window table.
fn make_window_scores() -> [i64; WINDOW_PATTERNS] {
    std::array::from_fn(|index| score_cells(&decode_window(index)))
}

/// Score one decoded window from the point of view of player `1`.
fn score_cells(cells: &[u8; WINDOW]) -> i64 {
    let mine = cells.iter().filter(|&&c| c == 1).count();
    let theirs = cells.iter().filter(|&&c| c == 2).count();

    match (mine, theirs) {
        (0, 0) => 0,
        (_, 0) => single_owner_score(cells, 1, mine),
        (0, _) => -single_owner_score(cells, 2, theirs),
        _ => 0, // dead window
    }
}

fn single_owner_score(cells: &[u8; WINDOW], owner: u8, count: usize) -> i64 {
    STONE_WEIGHTS[count] + RUN_BONUS[longest_run(cells, owner)]
}

/// Length of the longest unbroken run of `owner` stones.
fn longest_run(cells: &[u8; WINDOW], owner: u8) -> usize {
    let mut best = 0;
    let mut current = 0;
    for &c in cells {
        if c == owner {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swap_owner(cells: [u8; WINDOW]) -> [u8; WINDOW] {
        cells.map(|c| match c {
            1 => 2,
            2 => 1,
            other => other,
        })
    }

    #[test]
    fn test_encode_decode() {
        let cells = [1, 0, 2, 2, 1];
        assert_eq!(decode_window(encode_window(cells)), cells);
        assert_eq!(encode_window([0; WINDOW]), 0);
        assert_eq!(encode_window([2; WINDOW]), WINDOW_PATTERNS - 1);
    }

    #[test]
    fn test_empty_and_dead_windows() {
        assert_eq!(window_score(0), 0);
        assert_eq!(window_score(encode_window([1, 2, 0, 0, 0])), 0);
        assert_eq!(window_score(encode_window([1, 1, 1, 1, 2])), 0);
    }

    #[test]
    fn test_owner_swap_negates() {
        for index in 0..WINDOW_PATTERNS {
            let swapped = encode_window(swap_owner(decode_window(index)));
            assert_eq!(window_score(index), -window_score(swapped));
        }
    }

    #[test]
    fn test_adding_a_stone_increases_score() {
        for index in 0..WINDOW_PATTERNS {
            let cells = decode_window(index);
            if cells.contains(&2) {
                continue;
            }
            for i in 0..WINDOW {
                if cells[i] == 0 {
                    let mut more = cells;
                    more[i] = 1;
                    assert!(
                        window_score(encode_window(more)) > window_score(index),
                        "{:?} should beat {:?}",
                        more,
                        cells
                    );
                }
            }
        }
    }

    #[test]
    fn test_runs_beat_split_stones() {
        let run = window_score(encode_window([1, 1, 1, 0, 0]));
        let split = window_score(encode_window([1, 0, 1, 0, 1]));
        assert!(run > split);
        assert!(window_score(encode_window([1, 1, 1, 1, 0])) > 100 * window_score(encode_window([1, 1, 0, 0, 0])));
    }
}

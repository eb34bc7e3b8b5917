//! Pure point computation for a guessed score against a final score.

/// Points awarded when the guess matches the final score exactly.
pub const EXACT_SCORE_POINTS: u32 = 10;
/// Points awarded when only the outcome (win/draw/loss) matches.
pub const OUTCOME_POINTS: u32 = 5;

/// Compute the points a guess earns against a final score.
///
/// An exact score match earns [`EXACT_SCORE_POINTS`]; predicting the right
/// outcome (same winner, or both a draw) without the exact score earns
/// [`OUTCOME_POINTS`]; anything else earns nothing. Goal-difference
/// proximity carries no partial credit.
pub fn score(guess_a: u32, guess_b: u32, final_a: u32, final_b: u32) -> u32 {
    if guess_a == final_a && guess_b == final_b {
        return EXACT_SCORE_POINTS;
    }

    if guess_a.cmp(&guess_b) == final_a.cmp(&final_b) {
        return OUTCOME_POINTS;
    }

    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_score_earns_full_points() {
        assert_eq!(score(2, 1, 2, 1), EXACT_SCORE_POINTS);
        assert_eq!(score(0, 0, 0, 0), EXACT_SCORE_POINTS);
        assert_eq!(score(7, 7, 7, 7), EXACT_SCORE_POINTS);
    }

    #[test]
    fn correct_outcome_earns_partial_points() {
        // Both predict a home win.
        assert_eq!(score(3, 1, 2, 0), OUTCOME_POINTS);
        // Both predict a draw, different scoreline.
        assert_eq!(score(1, 1, 2, 2), OUTCOME_POINTS);
        // Both predict an away win.
        assert_eq!(score(0, 2, 1, 3), OUTCOME_POINTS);
    }

    #[test]
    fn wrong_outcome_earns_nothing() {
        assert_eq!(score(2, 1, 1, 2), 0);
        assert_eq!(score(1, 1, 2, 0), 0);
        assert_eq!(score(0, 3, 3, 3), 0);
    }

    #[test]
    fn exact_match_wins_over_outcome_rule() {
        // A drawn guess matching a drawn final exactly must not fall through
        // to the outcome rule.
        assert_eq!(score(1, 1, 1, 1), EXACT_SCORE_POINTS);
    }

    #[test]
    fn total_over_large_inputs() {
        assert_eq!(score(u32::MAX, 0, u32::MAX, 0), EXACT_SCORE_POINTS);
        assert_eq!(score(u32::MAX, 0, 5, 0), OUTCOME_POINTS);
    }
}

use crate::models::{Profile, ScoringType};

/// Points awarded per fully closed ring under the ring-close rule.
pub const RING_CLOSE_BONUS: i32 = 100;

/// Raw metrics for a single calendar day, as delivered by the health
/// provider. Values are sanitized before scoring, so callers may pass
/// whatever the provider reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayMetrics {
    pub move_calories: f64,
    pub exercise_minutes: f64,
    pub stand_hours: f64,
    pub step_count: f64,
}

/// The user's three daily ring goals.
#[derive(Debug, Clone, Copy)]
pub struct RingGoals {
    pub move_calories: f64,
    pub exercise_minutes: f64,
    pub stand_hours: f64,
}

impl RingGoals {
    pub fn of_profile(profile: &Profile) -> Self {
        Self {
            move_calories: f64::from(profile.move_goal),
            exercise_minutes: f64::from(profile.exercise_goal),
            stand_hours: f64::from(profile.stand_goal),
        }
    }
}

/// Convert one day's metrics into points under the given rule.
///
/// Always returns a finite, non-negative integer: inputs that are negative,
/// NaN or infinite are treated as zero, and a zero goal yields a zero ratio
/// instead of dividing.
pub fn compute_points(rule: ScoringType, metrics: &DayMetrics, goals: &RingGoals) -> i32 {
    let move_ratio = ratio(metrics.move_calories, goals.move_calories);
    let exercise_ratio = ratio(metrics.exercise_minutes, goals.exercise_minutes);
    let stand_ratio = ratio(metrics.stand_hours, goals.stand_hours);

    match rule {
        ScoringType::RingClose => {
            let mut points = 0;
            for ring in [move_ratio, exercise_ratio, stand_ratio] {
                if ring >= 1.0 {
                    points += RING_CLOSE_BONUS;
                }
            }
            points
        }
        ScoringType::Percentage => {
            let capped = move_ratio.min(1.0) * 100.0
                + exercise_ratio.min(1.0) * 100.0
                + stand_ratio.min(1.0) * 100.0;
            (capped / 3.0).round() as i32
        }
        ScoringType::RawNumbers => {
            sanitize(metrics.move_calories).round() as i32
                + sanitize(metrics.exercise_minutes).round() as i32
                + sanitize(metrics.stand_hours).round() as i32
        }
        ScoringType::StepCount => sanitize(metrics.step_count).round() as i32,
        ScoringType::Workout => workout_points(),
    }
}

/// Completion ratio for one ring. A missing or zero goal scores as zero
/// rather than dividing.
pub fn ratio(metric: f64, goal: f64) -> f64 {
    if goal <= 0.0 || !goal.is_finite() {
        return 0.0;
    }
    sanitize(metric) / goal
}

/// Clamp provider input to a finite, non-negative value.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

// The point formula for workout competitions was never settled; clients can
// already declare the type and its config, but every day scores zero until
// product decides the formula.
fn workout_points() -> i32 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goals() -> RingGoals {
        RingGoals {
            move_calories: 500.0,
            exercise_minutes: 30.0,
            stand_hours: 12.0,
        }
    }

    fn metrics(move_calories: f64, exercise_minutes: f64, stand_hours: f64) -> DayMetrics {
        DayMetrics {
            move_calories,
            exercise_minutes,
            stand_hours,
            step_count: 0.0,
        }
    }

    #[test]
    fn test_ring_close_all_rings_closed() {
        let points = compute_points(ScoringType::RingClose, &metrics(500.0, 30.0, 12.0), &goals());
        assert_eq!(points, 300);
    }

    #[test]
    fn test_ring_close_exact_goal_counts() {
        // ratio == 1.0 awards the bonus, 0.999x does not
        let at_goal = compute_points(ScoringType::RingClose, &metrics(500.0, 0.0, 0.0), &goals());
        assert_eq!(at_goal, 100);

        let just_under =
            compute_points(ScoringType::RingClose, &metrics(499.5, 0.0, 0.0), &goals());
        assert_eq!(just_under, 0);
    }

    #[test]
    fn test_ring_close_no_partial_credit() {
        let points = compute_points(ScoringType::RingClose, &metrics(250.0, 15.0, 6.0), &goals());
        assert_eq!(points, 0);
    }

    #[test]
    fn test_percentage_caps_each_ring_at_100() {
        // double the goal on every ring is still 100, not 200
        let points =
            compute_points(ScoringType::Percentage, &metrics(1000.0, 60.0, 24.0), &goals());
        assert_eq!(points, 100);
    }

    #[test]
    fn test_percentage_averages_three_rings() {
        let points = compute_points(ScoringType::Percentage, &metrics(250.0, 15.0, 6.0), &goals());
        assert_eq!(points, 50);
    }

    #[test]
    fn test_raw_numbers_uncapped_sum() {
        let points =
            compute_points(ScoringType::RawNumbers, &metrics(1234.4, 56.5, 10.0), &goals());
        assert_eq!(points, 1234 + 57 + 10);
    }

    #[test]
    fn test_step_count_rounds() {
        let day = DayMetrics {
            step_count: 10432.6,
            ..DayMetrics::default()
        };
        assert_eq!(compute_points(ScoringType::StepCount, &day, &goals()), 10433);
    }

    #[test]
    fn test_workout_scores_zero() {
        let points = compute_points(ScoringType::Workout, &metrics(500.0, 30.0, 12.0), &goals());
        assert_eq!(points, 0);
    }

    #[test]
    fn test_zero_goal_never_divides() {
        let zero_goals = RingGoals {
            move_calories: 0.0,
            exercise_minutes: 0.0,
            stand_hours: 0.0,
        };
        for rule in [
            ScoringType::RingClose,
            ScoringType::Percentage,
            ScoringType::RawNumbers,
            ScoringType::StepCount,
            ScoringType::Workout,
        ] {
            let points = compute_points(rule, &metrics(500.0, 30.0, 12.0), &zero_goals);
            assert!(points >= 0, "{rule:?} produced negative points");
        }
    }

    #[test]
    fn test_non_finite_inputs_score_as_zero() {
        let day = DayMetrics {
            move_calories: f64::NAN,
            exercise_minutes: f64::INFINITY,
            stand_hours: -4.0,
            step_count: f64::NEG_INFINITY,
        };
        assert_eq!(compute_points(ScoringType::Percentage, &day, &goals()), 0);
        assert_eq!(compute_points(ScoringType::RawNumbers, &day, &goals()), 0);
        assert_eq!(compute_points(ScoringType::StepCount, &day, &goals()), 0);
    }

    #[test]
    fn test_negative_goal_treated_as_zero() {
        let bad_goals = RingGoals {
            move_calories: -500.0,
            exercise_minutes: 30.0,
            stand_hours: 12.0,
        };
        let points = compute_points(ScoringType::RingClose, &metrics(500.0, 30.0, 12.0), &bad_goals);
        assert_eq!(points, 200);
    }
}

// Quiz grading and course completion math

use crate::models::Question;

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Share of `total` as a percentage rounded to two decimals. An empty
/// course counts as one lesson.
pub fn completion_percent(completed: usize, total: u64) -> f64 {
    let total = total.max(1) as f64;
    round2(100.0 * completed as f64 / total).min(100.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grade {
    pub correct: usize,
    pub total: usize,
    pub score: f64,
}

/// Grades answers by position: `answers[i]` is checked against question
/// `i`. Unanswered questions are wrong and surplus answers are ignored.
pub fn grade(questions: &[Question], answers: &[i64]) -> Grade {
    let correct = questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| usize::try_from(**a).is_ok_and(|a| a == q.answer))
        .count();
    let total = questions.len();
    Grade {
        correct,
        total,
        score: round2(100.0 * correct as f64 / total.max(1) as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_quiz;

    #[test]
    fn grades_default_quiz() {
        let quiz = default_quiz("c1");
        assert_eq!(grade(&quiz.questions, &[1, 0]).score, 100.0);
        assert_eq!(grade(&quiz.questions, &[0, 0]).score, 50.0);
        assert_eq!(grade(&quiz.questions, &[1]).score, 50.0);
        assert_eq!(grade(&quiz.questions, &[]).score, 0.0);
        assert_eq!(grade(&quiz.questions, &[1, 0, 3, 3]).correct, 2);
        assert_eq!(grade(&quiz.questions, &[-1, 0]).correct, 1);
    }

    #[test]
    fn empty_quiz_scores_zero() {
        let g = grade(&[], &[1, 2]);
        assert_eq!(g, Grade { correct: 0, total: 0, score: 0.0 });
    }

    #[test]
    fn percent_rounds_and_guards_zero_lessons() {
        assert_eq!(completion_percent(1, 4), 25.0);
        assert_eq!(completion_percent(2, 4), 50.0);
        assert_eq!(completion_percent(1, 3), 33.33);
        assert_eq!(completion_percent(2, 3), 66.67);
        assert_eq!(completion_percent(1, 0), 100.0);
        assert_eq!(completion_percent(5, 2), 100.0);
    }
}

use crate::models::quiz_question::AnswerKey;
use rand::Rng;
use std::collections::HashMap;
use uuid::Uuid;

/// Baseline seconds a taker is expected to spend per question.
const EXPECTED_SECONDS_PER_QUESTION: i64 = 30;

/// Outcome of scoring one quiz submission. XP fields are zero unless the
/// attempt passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub correct_count: usize,
    pub total_questions: usize,
    pub score: i32,
    pub passed: bool,
    pub base_xp: i32,
    pub time_bonus: i32,
    pub xp_awarded: i32,
}

pub struct ScoringService;

impl ScoringService {
    /// Grades submitted answers against the answer key. A question absent
    /// from the map counts as incorrect.
    pub fn grade(questions: &[AnswerKey], answers: &HashMap<Uuid, String>) -> (usize, i32) {
        let total = questions.len();
        let correct = questions
            .iter()
            .filter(|q| answers.get(&q.id).map(|a| a == &q.correct_answer) == Some(true))
            .count();
        let score = (100 * correct as i32) / total.max(1) as i32;
        (correct, score)
    }

    /// Draws base XP from the lesson's reward range and applies the
    /// time bonus/penalty. `elapsed_seconds == 0` means the attempt was
    /// not timed and gets no adjustment.
    pub fn award_xp<R: Rng>(
        rng: &mut R,
        xp_min: i32,
        xp_max: i32,
        total_questions: usize,
        elapsed_seconds: i64,
    ) -> (i32, i32, i32) {
        let base_xp = rng.gen_range(xp_min..=xp_max);

        let expected = total_questions as i64 * EXPECTED_SECONDS_PER_QUESTION;
        let time_bonus = if elapsed_seconds > 0 && expected > 0 {
            if elapsed_seconds < expected {
                let max_bonus = (base_xp as f64 * 0.5).floor() as i32;
                let saved = (expected - elapsed_seconds) as f64 / expected as f64;
                let bonus = (base_xp as f64 * 0.5 * saved).floor() as i32;
                bonus.min(max_bonus)
            } else if elapsed_seconds > expected * 2 {
                -((base_xp as f64 * 0.2).floor() as i32)
            } else {
                0
            }
        } else {
            0
        };

        let xp_awarded = (base_xp + time_bonus).max(0);
        (base_xp, time_bonus, xp_awarded)
    }

    /// Full scoring pipeline for a submission: grade, compare against the
    /// lesson's pass threshold, and, on a pass, draw the XP award.
    pub fn score_submission<R: Rng>(
        rng: &mut R,
        questions: &[AnswerKey],
        answers: &HashMap<Uuid, String>,
        pass_threshold: i32,
        xp_min: i32,
        xp_max: i32,
        elapsed_seconds: i64,
    ) -> QuizOutcome {
        let (correct_count, score) = Self::grade(questions, answers);
        let passed = score >= pass_threshold;

        let (base_xp, time_bonus, xp_awarded) = if passed {
            Self::award_xp(rng, xp_min, xp_max, questions.len(), elapsed_seconds)
        } else {
            (0, 0, 0)
        };

        QuizOutcome {
            correct_count,
            total_questions: questions.len(),
            score,
            passed,
            base_xp,
            time_bonus,
            xp_awarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn keys(tags: &[&str]) -> Vec<AnswerKey> {
        tags.iter()
            .map(|t| AnswerKey {
                id: Uuid::new_v4(),
                correct_answer: t.to_string(),
            })
            .collect()
    }

    fn answer_first_n(questions: &[AnswerKey], n: usize) -> HashMap<Uuid, String> {
        questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let tag = if i < n {
                    q.correct_answer.clone()
                } else if q.correct_answer == "A" {
                    "B".to_string()
                } else {
                    "A".to_string()
                };
                (q.id, tag)
            })
            .collect()
    }

    /// RNG stub that always returns the low end of the requested range,
    /// so base_xp is predictable without depending on StdRng internals.
    struct MinRng;

    impl rand::RngCore for MinRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    #[test]
    fn score_is_floored_percentage() {
        let qs = keys(&["A", "B", "C"]);
        let answers = answer_first_n(&qs, 2);
        let (correct, score) = ScoringService::grade(&qs, &answers);
        assert_eq!(correct, 2);
        assert_eq!(score, 66); // floor(100 * 2 / 3)
    }

    #[test]
    fn missing_answers_count_as_incorrect() {
        let qs = keys(&["A", "B", "C", "D"]);
        let mut answers = HashMap::new();
        answers.insert(qs[0].id, "A".to_string());
        let (correct, score) = ScoringService::grade(&qs, &answers);
        assert_eq!(correct, 1);
        assert_eq!(score, 25);
    }

    #[test]
    fn unknown_question_ids_are_ignored() {
        let qs = keys(&["A", "B"]);
        let mut answers = HashMap::new();
        answers.insert(Uuid::new_v4(), "A".to_string());
        let (correct, _) = ScoringService::grade(&qs, &answers);
        assert_eq!(correct, 0);
    }

    #[test]
    fn failing_score_awards_nothing() {
        let qs = keys(&["A", "B", "C", "D", "A"]);
        let answers = answer_first_n(&qs, 2);
        let mut rng = StdRng::seed_from_u64(7);
        let outcome =
            ScoringService::score_submission(&mut rng, &qs, &answers, 70, 50, 100, 60);
        assert_eq!(outcome.score, 40);
        assert!(!outcome.passed);
        assert_eq!(outcome.base_xp, 0);
        assert_eq!(outcome.time_bonus, 0);
        assert_eq!(outcome.xp_awarded, 0);
    }

    #[test]
    fn fast_completion_earns_bonus() {
        // Worked example: 5 questions, expected 150s, elapsed 60s,
        // base_xp 80 -> bonus floor(80 * 0.5 * 90/150) = 24.
        let (base, bonus, awarded) = ScoringService::award_xp(&mut MinRng, 80, 80, 5, 60);
        assert_eq!(base, 80);
        assert_eq!(bonus, 24);
        assert_eq!(awarded, 104);
    }

    #[test]
    fn slow_completion_pays_penalty() {
        // Elapsed 400s > 2 * 150s -> penalty floor(80 * 0.2) = 16.
        let (base, bonus, awarded) = ScoringService::award_xp(&mut MinRng, 80, 80, 5, 400);
        assert_eq!(base, 80);
        assert_eq!(bonus, -16);
        assert_eq!(awarded, 64);
    }

    #[test]
    fn untimed_attempt_gets_no_adjustment() {
        let (base, bonus, awarded) = ScoringService::award_xp(&mut MinRng, 80, 80, 5, 0);
        assert_eq!(base, 80);
        assert_eq!(bonus, 0);
        assert_eq!(awarded, 80);
    }

    #[test]
    fn normal_pace_gets_no_adjustment() {
        // Between expected and 2x expected.
        let (_, bonus, _) = ScoringService::award_xp(&mut MinRng, 80, 80, 5, 200);
        assert_eq!(bonus, 0);
    }

    #[test]
    fn bonus_is_capped_at_half_base() {
        // elapsed 1s of 150s expected: raw bonus rounds just under the cap.
        let (base, bonus, _) = ScoringService::award_xp(&mut MinRng, 80, 80, 5, 1);
        assert_eq!(base, 80);
        assert!(bonus <= 40);
    }

    #[test]
    fn award_never_negative() {
        let (_, _, awarded) = ScoringService::award_xp(&mut MinRng, 0, 0, 5, 400);
        assert_eq!(awarded, 0);
    }

    #[test]
    fn base_xp_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let (base, _, _) = ScoringService::award_xp(&mut rng, 50, 100, 5, 0);
            assert!((50..=100).contains(&base));
        }
    }

    #[test]
    fn pass_threshold_is_inclusive() {
        let qs = keys(&["A", "B", "C", "D", "A"]);
        let answers = answer_first_n(&qs, 4); // score 80
        let mut rng = StdRng::seed_from_u64(1);
        let outcome =
            ScoringService::score_submission(&mut rng, &qs, &answers, 80, 10, 20, 0);
        assert!(outcome.passed);
        assert!(outcome.xp_awarded >= 10);
    }
}

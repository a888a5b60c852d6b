pub mod bank;
pub mod session;
mod templates;

use std::fmt;
use std::str::FromStr;

/// One multiple-choice question. Ids are reassigned 1..n for every
/// generated session, in shuffled order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
}

/// The outcome of a single round. `chosen` is `None` when the countdown
/// expired before the user picked anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnswerRecord {
    pub question_id: u32,
    pub chosen: Option<usize>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseDifficultyError;

impl fmt::Display for ParseDifficultyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown difficulty, expected easy, medium or hard")
    }
}
impl std::error::Error for ParseDifficultyError {}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{}", name)
    }
}

/// Everything the user picks during setup. Immutable for the whole session.
/// `difficulty` is accepted but does not alter generated content.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionConfig {
    pub topic: String,
    pub question_count: usize,
    pub difficulty: Difficulty,
    pub seconds_per_question: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionResult {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub total_elapsed_seconds: u64,
    pub answers: Vec<AnswerRecord>,
}

impl SessionResult {
    /// Tallies the answer log into a final summary. Pure and total: the
    /// same inputs always produce the same result.
    pub fn from_answers(
        answers: Vec<AnswerRecord>,
        total_questions: usize,
        total_elapsed_seconds: u64,
    ) -> Self {
        let correct_answers = answers.iter().filter(|a| a.is_correct).count();
        Self {
            total_questions,
            correct_answers,
            total_elapsed_seconds,
            answers,
        }
    }

    /// Score as a rounded percentage. Generation always yields at least one
    /// question, so `total_questions` is nonzero by construction.
    pub fn percentage(&self) -> u32 {
        (100.0 * self.correct_answers as f64 / self.total_questions as f64).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(" Medium ".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_display_round_trips() {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(d.to_string().parse::<Difficulty>(), Ok(d));
        }
    }

    #[test]
    fn aggregation_counts_correct_answers() {
        let answers = vec![
            AnswerRecord { question_id: 1, chosen: Some(2), is_correct: true },
            AnswerRecord { question_id: 2, chosen: None, is_correct: false },
            AnswerRecord { question_id: 3, chosen: Some(0), is_correct: true },
        ];
        let result = SessionResult::from_answers(answers.clone(), 3, 42);
        assert_eq!(result.correct_answers, 2);
        assert_eq!(result.total_questions, 3);
        assert_eq!(result.total_elapsed_seconds, 42);
        assert_eq!(result.answers, answers);
    }

    #[test]
    fn aggregation_is_pure() {
        let answers = vec![
            AnswerRecord { question_id: 1, chosen: Some(1), is_correct: false },
            AnswerRecord { question_id: 2, chosen: Some(3), is_correct: true },
        ];
        let a = SessionResult::from_answers(answers.clone(), 2, 17);
        let b = SessionResult::from_answers(answers, 2, 17);
        assert_eq!(a, b);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        let record = |correct| AnswerRecord { question_id: 1, chosen: Some(0), is_correct: correct };
        let two_of_three =
            SessionResult::from_answers(vec![record(true), record(true), record(false)], 3, 0);
        assert_eq!(two_of_three.percentage(), 67);

        let one_of_eight = SessionResult::from_answers(vec![record(true)], 8, 0);
        assert_eq!(one_of_eight.percentage(), 13);

        let all = SessionResult::from_answers(vec![record(true), record(true)], 2, 0);
        assert_eq!(all.percentage(), 100);
    }
}

use std::fmt;

use super::{bank, AnswerRecord, Question, SessionConfig, SessionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Setup,
    Generating,
    Active,
    Results,
}

/// The only guarded transition in the whole machine: a session cannot start
/// without a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    EmptyTopic,
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::EmptyTopic => write!(f, "topic must not be empty"),
        }
    }
}
impl std::error::Error for StartError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Recorded { correct: bool },
    /// The question was already resolved (or the index was out of range);
    /// nothing was recorded.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running { remaining: u32 },
    /// The countdown hit zero and a timeout record was appended. `finished`
    /// is true when this was the last question and the session moved
    /// straight to results.
    Expired { finished: bool },
    /// No running countdown: the session is not active or the current
    /// question is already resolved.
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextQuestion,
    Finished,
    /// Not active, or the current question has not been resolved yet.
    Ignored,
}

/// One quiz run from topic entry through results.
///
/// The session owns all mutable quiz state and is advanced purely by method
/// calls; the host drives the clock by calling [`Session::tick`] once per
/// elapsed second, so nothing in here ever waits on real time.
#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: Phase,
    config: Option<SessionConfig>,
    questions: Vec<Question>,
    current: usize,
    chosen: Option<usize>,
    resolved: bool,
    answers: Vec<AnswerRecord>,
    remaining: u32,
    elapsed: u64,
    result: Option<SessionResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Setup -> Generating. Rejects empty/whitespace topics and leaves the
    /// phase unchanged in that case.
    pub fn begin(&mut self, config: SessionConfig) -> Result<(), StartError> {
        if config.topic.trim().is_empty() {
            return Err(StartError::EmptyTopic);
        }
        if self.phase == Phase::Setup {
            self.config = Some(config);
            self.phase = Phase::Generating;
        }
        Ok(())
    }

    /// Generating -> Active. Runs the question bank and arms the countdown
    /// for question 1. The simulated generation latency is the host's
    /// business; by the time this is called the wait is already over.
    pub fn complete_generation(&mut self) {
        if self.phase != Phase::Generating {
            return;
        }
        let Some(config) = self.config.as_ref() else {
            return;
        };
        self.questions = bank::generate(&config.topic, config.question_count, config.difficulty);
        self.current = 0;
        self.chosen = None;
        self.resolved = false;
        self.answers.clear();
        self.remaining = config.seconds_per_question;
        self.elapsed = 0;
        self.result = None;
        self.phase = Phase::Active;
    }

    /// Records the user's answer for the current question. The first
    /// selection wins; any further selection on the same question is a
    /// no-op. Recording an answer freezes the countdown.
    pub fn select(&mut self, index: usize) -> Selection {
        if self.phase != Phase::Active || self.resolved {
            return Selection::Ignored;
        }
        let Some(question) = self.questions.get(self.current) else {
            return Selection::Ignored;
        };
        if index >= question.options.len() {
            return Selection::Ignored;
        }
        let correct = index == question.correct_answer;
        self.answers.push(AnswerRecord {
            question_id: question.id,
            chosen: Some(index),
            is_correct: correct,
        });
        self.chosen = Some(index);
        self.resolved = true;
        Selection::Recorded { correct }
    }

    /// Advances the clock by one second. Accumulates the global stopwatch
    /// and burns down the per-question countdown; hitting zero auto-submits
    /// a timed-out record exactly once. Ticks while the question is already
    /// resolved (or outside the active phase) are inert.
    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::Active || self.resolved {
            return Tick::Idle;
        }
        self.elapsed += 1;
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return Tick::Running { remaining: self.remaining };
        }
        let Some(question) = self.questions.get(self.current) else {
            return Tick::Idle;
        };
        self.answers.push(AnswerRecord {
            question_id: question.id,
            chosen: None,
            is_correct: false,
        });
        self.resolved = true;
        if self.on_last_question() {
            self.finish();
            Tick::Expired { finished: true }
        } else {
            Tick::Expired { finished: false }
        }
    }

    /// Moves on after the current question was resolved: next question with
    /// a fresh countdown, or results if this was the last one.
    pub fn advance(&mut self) -> Advance {
        if self.phase != Phase::Active || !self.resolved {
            return Advance::Ignored;
        }
        if self.on_last_question() {
            self.finish();
            return Advance::Finished;
        }
        self.current += 1;
        self.chosen = None;
        self.resolved = false;
        self.remaining = self.seconds_per_question();
        Advance::NextQuestion
    }

    /// Results -> Active with the same question list: index, answers and the
    /// stopwatch are reset, questions are not regenerated.
    pub fn retake(&mut self) {
        if self.phase != Phase::Results {
            return;
        }
        self.current = 0;
        self.chosen = None;
        self.resolved = false;
        self.answers.clear();
        self.remaining = self.seconds_per_question();
        self.elapsed = 0;
        self.result = None;
        self.phase = Phase::Active;
    }

    /// Discards everything and returns to setup.
    pub fn restart(&mut self) {
        *self = Session::new();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// 1-based number of the question currently showing.
    pub fn question_number(&self) -> usize {
        self.current + 1
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn on_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    /// True once the current question has been answered or timed out.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn chosen(&self) -> Option<usize> {
        self.chosen
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    fn seconds_per_question(&self) -> u32 {
        self.config.as_ref().map(|c| c.seconds_per_question).unwrap_or(0)
    }

    fn finish(&mut self) {
        self.result = Some(SessionResult::from_answers(
            self.answers.clone(),
            self.questions.len(),
            self.elapsed,
        ));
        self.phase = Phase::Results;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Difficulty;

    fn config(topic: &str, count: usize, seconds: u32) -> SessionConfig {
        SessionConfig {
            topic: topic.to_string(),
            question_count: count,
            difficulty: Difficulty::Easy,
            seconds_per_question: seconds,
        }
    }

    fn active_session(topic: &str, count: usize, seconds: u32) -> Session {
        let mut session = Session::new();
        session.begin(config(topic, count, seconds)).unwrap();
        assert_eq!(session.phase(), Phase::Generating);
        session.complete_generation();
        assert_eq!(session.phase(), Phase::Active);
        session
    }

    #[test]
    fn empty_topic_is_rejected_and_phase_is_unchanged() {
        let mut session = Session::new();
        assert_eq!(session.begin(config("   ", 5, 60)), Err(StartError::EmptyTopic));
        assert_eq!(session.phase(), Phase::Setup);
        assert!(session.begin(config("javascript", 5, 60)).is_ok());
        assert_eq!(session.phase(), Phase::Generating);
    }

    #[test]
    fn answering_every_question_correctly_scores_full_marks() {
        let mut session = active_session("javascript", 5, 60);
        assert_eq!(session.total_questions(), 5);
        for round in 0..5 {
            let correct = session.current_question().unwrap().correct_answer;
            assert_eq!(session.select(correct), Selection::Recorded { correct: true });
            let advance = session.advance();
            if round < 4 {
                assert_eq!(advance, Advance::NextQuestion);
            } else {
                assert_eq!(advance, Advance::Finished);
            }
        }
        let result = session.result().unwrap();
        assert_eq!(result.total_questions, 5);
        assert_eq!(result.correct_answers, 5);
        assert_eq!(result.percentage(), 100);
        assert_eq!(session.phase(), Phase::Results);
    }

    #[test]
    fn letting_every_question_time_out_scores_zero() {
        let mut session = active_session("javascript", 3, 30);
        loop {
            let mut expiry = None;
            for _ in 0..30 {
                match session.tick() {
                    Tick::Running { .. } => {}
                    Tick::Expired { finished } => {
                        expiry = Some(finished);
                        break;
                    }
                    Tick::Idle => panic!("countdown went idle before expiring"),
                }
            }
            match expiry {
                Some(true) => break,
                Some(false) => assert_eq!(session.advance(), Advance::NextQuestion),
                None => panic!("countdown never expired"),
            }
        }
        let result = session.result().unwrap();
        assert_eq!(result.correct_answers, 0);
        assert_eq!(result.total_questions, 3);
        assert_eq!(result.total_elapsed_seconds, 90);
        assert!(result.answers.iter().all(|a| a.chosen.is_none() && !a.is_correct));
    }

    #[test]
    fn first_selection_wins() {
        let mut session = active_session("python", 5, 60);
        let correct = session.current_question().unwrap().correct_answer;
        let wrong = (correct + 1) % 4;
        assert_eq!(session.select(wrong), Selection::Recorded { correct: false });
        assert_eq!(session.select(correct), Selection::Ignored);
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.answers()[0].chosen, Some(wrong));
        assert!(!session.answers()[0].is_correct);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut session = active_session("aws", 5, 60);
        assert_eq!(session.select(4), Selection::Ignored);
        assert_eq!(session.select(99), Selection::Ignored);
        assert!(session.answers().is_empty());
        assert!(!session.is_resolved());
    }

    #[test]
    fn answering_freezes_the_countdown() {
        let mut session = active_session("react", 5, 60);
        assert_eq!(session.tick(), Tick::Running { remaining: 59 });
        session.select(0);
        let remaining = session.remaining_seconds();
        let elapsed = session.elapsed_seconds();
        assert_eq!(session.tick(), Tick::Idle);
        assert_eq!(session.remaining_seconds(), remaining);
        assert_eq!(session.elapsed_seconds(), elapsed);
    }

    #[test]
    fn timeout_fires_exactly_once() {
        let mut session = active_session("aws", 2, 1);
        assert_eq!(session.tick(), Tick::Expired { finished: false });
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.tick(), Tick::Idle);
        assert_eq!(session.tick(), Tick::Idle);
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn timeout_on_last_question_goes_straight_to_results() {
        let mut session = active_session("aws", 2, 1);
        assert_eq!(session.tick(), Tick::Expired { finished: false });
        assert_eq!(session.advance(), Advance::NextQuestion);
        assert_eq!(session.tick(), Tick::Expired { finished: true });
        assert_eq!(session.phase(), Phase::Results);
        assert_eq!(session.result().unwrap().answers.len(), 2);
    }

    #[test]
    fn advance_before_resolution_is_ignored() {
        let mut session = active_session("python", 5, 60);
        assert_eq!(session.advance(), Advance::Ignored);
        assert_eq!(session.question_number(), 1);
    }

    #[test]
    fn elapsed_time_is_a_global_stopwatch() {
        let mut session = active_session("aws", 2, 60);
        for _ in 0..3 {
            session.tick();
        }
        session.select(0);
        session.advance();
        assert_eq!(session.remaining_seconds(), 60);
        for _ in 0..4 {
            session.tick();
        }
        session.select(0);
        assert_eq!(session.advance(), Advance::Finished);
        assert_eq!(session.result().unwrap().total_elapsed_seconds, 7);
    }

    #[test]
    fn retake_replays_the_same_questions_from_scratch() {
        let mut session = active_session("react", 4, 45);
        let original: Vec<String> =
            session.questions().iter().map(|q| q.prompt.clone()).collect();
        while session.phase() == Phase::Active {
            session.tick();
            session.select(0);
            session.advance();
        }
        assert_eq!(session.phase(), Phase::Results);

        session.retake();
        assert_eq!(session.phase(), Phase::Active);
        let replayed: Vec<String> =
            session.questions().iter().map(|q| q.prompt.clone()).collect();
        assert_eq!(replayed, original);
        assert_eq!(session.question_number(), 1);
        assert!(session.answers().is_empty());
        assert_eq!(session.elapsed_seconds(), 0);
        assert_eq!(session.remaining_seconds(), 45);
        assert!(session.result().is_none());
    }

    #[test]
    fn restart_discards_the_whole_session() {
        let mut session = active_session("python", 5, 30);
        session.select(1);
        session.restart();
        assert_eq!(session.phase(), Phase::Setup);
        assert_eq!(session.total_questions(), 0);
        assert!(session.answers().is_empty());
        assert!(session.config().is_none());
        assert!(session.result().is_none());
    }

    #[test]
    fn one_record_per_question_in_question_order() {
        let mut session = active_session("javascript", 5, 60);
        let mut expected_ids = Vec::new();
        while session.phase() == Phase::Active {
            expected_ids.push(session.current_question().unwrap().id);
            session.select(2);
            session.advance();
        }
        let result = session.result().unwrap();
        let recorded: Vec<u32> = result.answers.iter().map(|a| a.question_id).collect();
        assert_eq!(recorded, expected_ids);
        assert_eq!(recorded, vec![1, 2, 3, 4, 5]);
    }
}

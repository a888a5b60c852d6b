use rand::seq::SliceRandom;
use rand::thread_rng;

use super::templates;
use super::{Difficulty, Question};

/// Builds the question list for one session: pick the template set for the
/// topic, shuffle it uniformly, keep at most `count` questions and hand out
/// fresh 1-based ids in the final order.
///
/// Template sets hold 10 questions, so asking for more silently yields 10.
/// `difficulty` is part of the contract but does not alter selection or
/// content. Cannot fail for any input; unknown and empty topics get the
/// generic set.
pub fn generate(topic: &str, count: usize, _difficulty: Difficulty) -> Vec<Question> {
    let mut questions = templates::for_topic(topic);
    questions.shuffle(&mut thread_rng());
    let keep = count.min(questions.len());
    questions.truncate(keep);
    for (index, question) in questions.iter_mut().enumerate() {
        question.id = (index + 1) as u32;
    }
    questions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_prompts(questions: &[Question]) -> Vec<String> {
        let mut prompts: Vec<String> = questions.iter().map(|q| q.prompt.clone()).collect();
        prompts.sort();
        prompts
    }

    fn pool(topic: &str) -> Vec<String> {
        sorted_prompts(&templates::for_topic(topic))
    }

    #[test]
    fn generates_requested_count_with_well_formed_questions() {
        for count in [5, 10, 15, 20] {
            let questions = generate("javascript", count, Difficulty::Medium);
            assert_eq!(questions.len(), count.min(10));
            for question in &questions {
                assert_eq!(question.options.len(), 4);
                assert!(question.correct_answer < 4);
                assert!(!question.prompt.is_empty());
                assert!(!question.explanation.is_empty());
            }
        }
    }

    #[test]
    fn ids_are_reassigned_sequentially_from_one() {
        let questions = generate("aws", 5, Difficulty::Easy);
        let ids: Vec<u32> = questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn topic_matching_is_case_insensitive_substring() {
        assert_eq!(sorted_prompts(&generate("Learning JS", 10, Difficulty::Easy)), pool("javascript"));
        assert_eq!(sorted_prompts(&generate("JAVASCRIPT basics", 10, Difficulty::Hard)), pool("javascript"));
        assert_eq!(sorted_prompts(&generate("ReactJS basics", 10, Difficulty::Easy)), pool("react"));
        assert_eq!(sorted_prompts(&generate("  python 101  ", 10, Difficulty::Easy)), pool("python"));
        assert_eq!(sorted_prompts(&generate("Amazon Web Services", 10, Difficulty::Easy)), pool("aws"));
    }

    #[test]
    fn repeated_generation_draws_from_one_pool_without_mixing() {
        let first = generate("react", 10, Difficulty::Easy);
        let second = generate("react hooks deep dive", 10, Difficulty::Hard);
        assert_eq!(sorted_prompts(&first), sorted_prompts(&second));
        assert!(first.iter().any(|q| q.prompt == "What is JSX?"));
        assert!(first.iter().all(|q| !q.prompt.contains("JavaScript data type")));
    }

    #[test]
    fn unknown_topic_interpolates_literal_topic_text() {
        let questions = generate("Quantum Basketweaving", 5, Difficulty::Medium);
        assert_eq!(questions.len(), 5);
        for question in &questions {
            assert!(
                question.prompt.contains("Quantum Basketweaving"),
                "generic prompt should mention the topic: {}",
                question.prompt
            );
        }
    }

    #[test]
    fn count_above_pool_size_yields_full_pool() {
        assert_eq!(generate("python", 20, Difficulty::Easy).len(), 10);
        assert_eq!(generate("Quantum Basketweaving", 15, Difficulty::Easy).len(), 10);
    }

    #[test]
    fn empty_topic_falls_back_to_generic_set() {
        let questions = generate("", 5, Difficulty::Easy);
        assert_eq!(questions.len(), 5);
        // The generic set is recognizable by its catch-all option.
        assert!(questions
            .iter()
            .any(|q| q.options.iter().any(|o| o.contains("All of the above") || o.contains("All industries"))));
    }
}

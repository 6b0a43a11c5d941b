use crate::models::domain::question::{Difficulty, Question};
use crate::models::domain::QuestionBank;

#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub const CATEGORIES: [&str; 4] = ["Hazards", "Legislation", "Procedures", "Rescue"];

    /// A three-option question with the given id and correct option
    pub fn question(id: u64, correct_index: usize) -> Question {
        Question::multiple_choice(
            id,
            &format!("Question {}", id),
            &["Option A", "Option B", "Option C"],
            correct_index,
            &format!("Explanation for question {}", id),
        )
        .expect("fixture question should be valid")
    }

    /// Bank "test-bank" with ids 1..=n and the given correct options
    pub fn bank_with_correct(correct: &[usize]) -> QuestionBank {
        let questions = correct
            .iter()
            .enumerate()
            .map(|(i, &c)| question(i as u64 + 1, c))
            .collect();
        QuestionBank::new("test-bank", "Test Bank", questions)
            .expect("fixture bank should be valid")
    }

    /// Bank with the given number of questions per difficulty, cycling through
    /// `CATEGORIES`
    pub fn categorised_bank(basic: usize, intermediate: usize, advanced: usize) -> QuestionBank {
        let mut questions = Vec::new();
        let mut next_id = 1;
        for (difficulty, count) in [
            (Difficulty::Basic, basic),
            (Difficulty::Intermediate, intermediate),
            (Difficulty::Advanced, advanced),
        ] {
            for i in 0..count {
                questions.push(
                    question(next_id, 0)
                        .with_difficulty(difficulty)
                        .with_category(CATEGORIES[i % CATEGORIES.len()]),
                );
                next_id += 1;
            }
        }

        QuestionBank::new("mock-exam", "Mock Exam", questions)
            .expect("fixture bank should be valid")
            .with_pass_threshold(80)
            .expect("fixture threshold should be valid")
            .with_categories(CATEGORIES.iter().map(|c| c.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_fixtures_question() {
        let q = question(3, 2);
        assert_eq!(q.correct_index(), 2);
        assert_eq!(q.option_count(), 3);
    }

    #[test]
    fn test_fixtures_bank_with_correct() {
        let bank = bank_with_correct(&[0, 1, 2]);
        assert_eq!(bank.len(), 3);
        assert_eq!(bank.questions()[1].correct_index(), 1);
    }

    #[test]
    fn test_fixtures_categorised_bank() {
        let bank = categorised_bank(4, 2, 1);
        assert_eq!(bank.len(), 7);
        assert_eq!(
            bank.questions()
                .iter()
                .filter(|q| q.difficulty() == Some(Difficulty::Advanced))
                .count(),
            1
        );
    }
}

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::errors::{AppError, AppResult};
use crate::models::domain::question::{Difficulty, Question, QuestionId};
use crate::models::domain::QuestionBank;

/// Relative weights of each difficulty in a generated exam.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DifficultyMix {
    pub basic: u32,
    pub intermediate: u32,
    pub advanced: u32,
}

impl Default for DifficultyMix {
    fn default() -> Self {
        DifficultyMix {
            basic: 40,
            intermediate: 45,
            advanced: 15,
        }
    }
}

impl DifficultyMix {
    /// Per-difficulty counts for `count` questions. Basic and intermediate are
    /// rounded, advanced takes whatever is left.
    pub fn quotas(&self, count: usize) -> AppResult<[(Difficulty, usize); 3]> {
        let total = (self.basic + self.intermediate + self.advanced) as usize;
        if total == 0 {
            return Err(AppError::ConfigurationError(
                "difficulty mix must have at least one non-zero weight".to_string(),
            ));
        }

        let rounded = |weight: u32| (count * weight as usize * 2 + total) / (total * 2);
        let basic = rounded(self.basic);
        let intermediate = rounded(self.intermediate).min(count - basic);
        let advanced = count - basic - intermediate;

        Ok([
            (Difficulty::Basic, basic),
            (Difficulty::Intermediate, intermediate),
            (Difficulty::Advanced, advanced),
        ])
    }
}

pub struct QuestionSelectionService;

impl QuestionSelectionService {
    /// Draw a mock exam of `count` questions from `bank`, weighted by difficulty and
    /// spread across the bank's categories. Short buckets are topped up from whatever
    /// is left so the exam always has `min(count, bank.len())` questions.
    pub fn select_balanced<R: Rng + ?Sized>(
        bank: &QuestionBank,
        count: usize,
        mix: DifficultyMix,
        rng: &mut R,
    ) -> AppResult<QuestionBank> {
        if count == 0 {
            return Err(AppError::ConfigurationError(
                "an exam needs at least one question".to_string(),
            ));
        }

        if count >= bank.len() {
            let mut all: Vec<Question> = bank.questions().to_vec();
            all.shuffle(rng);
            return bank.derive(all);
        }

        let mut picked: Vec<&Question> = Vec::with_capacity(count);
        let mut taken: HashSet<&QuestionId> = HashSet::with_capacity(count);

        for (difficulty, quota) in mix.quotas(count)? {
            let pool: Vec<&Question> = bank
                .questions()
                .iter()
                .filter(|q| q.difficulty() == Some(difficulty))
                .collect();
            for question in Self::spread_across_categories(bank, pool, quota, rng) {
                taken.insert(question.id());
                picked.push(question);
            }
        }

        if picked.len() < count {
            let mut leftovers: Vec<&Question> = bank
                .questions()
                .iter()
                .filter(|q| !taken.contains(q.id()))
                .collect();
            leftovers.shuffle(rng);
            log::debug!(
                "Topping up exam for '{}' with {} questions from leftovers",
                bank.id(),
                count - picked.len()
            );
            picked.extend(leftovers.into_iter().take(count - picked.len()));
        }

        picked.shuffle(rng);
        bank.derive(picked.into_iter().cloned().collect())
    }

    /// Round-robin over category groups so no single category dominates.
    fn spread_across_categories<'a, R: Rng + ?Sized>(
        bank: &QuestionBank,
        pool: Vec<&'a Question>,
        quota: usize,
        rng: &mut R,
    ) -> Vec<&'a Question> {
        let mut order: Vec<Option<&str>> = bank
            .categories()
            .iter()
            .map(|c| Some(c.as_str()))
            .collect();
        for question in &pool {
            if !order.contains(&question.category()) {
                order.push(question.category());
            }
        }

        let mut groups: Vec<Vec<&Question>> = order
            .iter()
            .map(|category| {
                let mut group: Vec<&Question> = pool
                    .iter()
                    .copied()
                    .filter(|q| q.category() == *category)
                    .collect();
                group.shuffle(rng);
                group
            })
            .filter(|group| !group.is_empty())
            .collect();
        groups.shuffle(rng);

        let mut selected = Vec::with_capacity(quota);
        while selected.len() < quota && groups.iter().any(|g| !g.is_empty()) {
            for group in groups.iter_mut() {
                if selected.len() == quota {
                    break;
                }
                if let Some(question) = group.pop() {
                    selected.push(question);
                }
            }
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::test_utils::fixtures::categorised_bank;

    fn count_by<F: Fn(&Question) -> bool>(bank: &QuestionBank, f: F) -> usize {
        bank.questions().iter().filter(|q| f(q)).count()
    }

    #[test]
    fn default_quotas_for_thirty() {
        let quotas = DifficultyMix::default().quotas(30).expect("mix is valid");

        assert_eq!(
            quotas,
            [
                (Difficulty::Basic, 12),
                (Difficulty::Intermediate, 14),
                (Difficulty::Advanced, 4)
            ]
        );
    }

    #[test]
    fn zero_mix_is_rejected() {
        let mix = DifficultyMix {
            basic: 0,
            intermediate: 0,
            advanced: 0,
        };

        assert!(mix.quotas(10).unwrap_err().is_configuration());
    }

    #[test]
    fn zero_count_is_rejected() {
        let bank = categorised_bank(4, 4, 4);
        let mut rng = StdRng::seed_from_u64(7);

        let result = QuestionSelectionService::select_balanced(
            &bank,
            0,
            DifficultyMix::default(),
            &mut rng,
        );

        assert!(result.unwrap_err().is_configuration());
    }

    #[test]
    fn exam_follows_difficulty_mix() {
        let bank = categorised_bank(20, 20, 20);
        let mut rng = StdRng::seed_from_u64(42);

        let exam = QuestionSelectionService::select_balanced(
            &bank,
            20,
            DifficultyMix::default(),
            &mut rng,
        )
        .expect("selection should succeed");

        assert_eq!(exam.len(), 20);
        assert_eq!(count_by(&exam, |q| q.difficulty() == Some(Difficulty::Basic)), 8);
        assert_eq!(count_by(&exam, |q| q.difficulty() == Some(Difficulty::Intermediate)), 9);
        assert_eq!(count_by(&exam, |q| q.difficulty() == Some(Difficulty::Advanced)), 3);
    }

    #[test]
    fn exam_spreads_across_categories() {
        let bank = categorised_bank(20, 20, 20);
        let mut rng = StdRng::seed_from_u64(3);

        let exam = QuestionSelectionService::select_balanced(
            &bank,
            20,
            DifficultyMix::default(),
            &mut rng,
        )
        .expect("selection should succeed");

        for category in bank.categories() {
            let n = count_by(&exam, |q| q.category() == Some(category.as_str()));
            assert!(n >= 3, "category {} only has {} questions", category, n);
        }
    }

    #[test]
    fn short_bucket_is_topped_up() {
        let bank = categorised_bank(10, 10, 1);
        let mut rng = StdRng::seed_from_u64(11);

        let exam = QuestionSelectionService::select_balanced(
            &bank,
            15,
            DifficultyMix::default(),
            &mut rng,
        )
        .expect("selection should succeed");

        assert_eq!(exam.len(), 15);
        assert_eq!(count_by(&exam, |q| q.difficulty() == Some(Difficulty::Advanced)), 1);
    }

    #[test]
    fn oversized_request_returns_whole_bank() {
        let bank = categorised_bank(2, 2, 2);
        let mut rng = StdRng::seed_from_u64(5);

        let exam = QuestionSelectionService::select_balanced(
            &bank,
            50,
            DifficultyMix::default(),
            &mut rng,
        )
        .expect("selection should succeed");

        assert_eq!(exam.len(), bank.len());
    }

    #[test]
    fn same_seed_gives_same_exam() {
        let bank = categorised_bank(10, 10, 10);

        let ids = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            QuestionSelectionService::select_balanced(&bank, 12, DifficultyMix::default(), &mut rng)
                .expect("selection should succeed")
                .questions()
                .iter()
                .map(|q| q.id().clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(ids(99), ids(99));
    }

    #[test]
    fn exam_keeps_bank_metadata() {
        let bank = categorised_bank(5, 5, 5);
        let mut rng = StdRng::seed_from_u64(1);

        let exam = QuestionSelectionService::select_balanced(
            &bank,
            5,
            DifficultyMix::default(),
            &mut rng,
        )
        .expect("selection should succeed");

        assert_eq!(exam.id(), bank.id());
        assert_eq!(exam.pass_threshold(), bank.pass_threshold());
    }
}

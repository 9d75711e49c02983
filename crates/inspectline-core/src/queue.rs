//! Per-level work queue construction.
//!
//! Half of a level's queue is exactly what the level's recipes demand, all
//! correct. The other half is the same number of records of random types.
//! Among those, `round(R / 2)` slots get a defect and an independently chosen
//! `round(R / 2)` slots get falsified paperwork, so some noise records carry
//! both and some carry neither. The two halves are mixed into one FIFO.

use std::collections::VecDeque;

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::IngredientType;
use crate::item::{GenerationFlags, ItemGenerator, ItemRecord};
use crate::recipe::{RecipeIndex, RecipeSpec};

// ---------------------------------------------------------------------------
// WorkQueue
// ---------------------------------------------------------------------------

/// FIFO of records for one level. Consumed from the front only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkQueue {
    items: VecDeque<ItemRecord>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the next record, or `None` once the level's supply is exhausted.
    pub fn dequeue_next(&mut self) -> Option<ItemRecord> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<ItemRecord>> for WorkQueue {
    fn from(items: Vec<ItemRecord>) -> Self {
        Self {
            items: items.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// QueuePlan
// ---------------------------------------------------------------------------

/// The two halves of a level queue before they are mixed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueuePlan {
    /// Correct records matching recipe demand, already shuffled.
    pub required: Vec<ItemRecord>,
    /// Random-type records, index-aligned with the slot lists below.
    pub noise: Vec<ItemRecord>,
    /// Noise indices generated with a defect, ascending.
    pub defect_slots: Vec<usize>,
    /// Noise indices generated with falsified fields, ascending.
    pub mistake_slots: Vec<usize>,
}

impl QueuePlan {
    pub fn len(&self) -> usize {
        self.required.len() + self.noise.len()
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.noise.is_empty()
    }

    /// Concatenate both halves and shuffle the result.
    pub fn into_queue<R: Rng + ?Sized>(self, rng: &mut R) -> WorkQueue {
        let mut all = self.required;
        all.extend(self.noise);
        all.shuffle(rng);
        WorkQueue::from(all)
    }
}

// ---------------------------------------------------------------------------
// QueueBuilder
// ---------------------------------------------------------------------------

/// Number of flawed slots for `required` correct records: `round(required / 2)`
/// with ties to even.
pub fn error_quota(required: usize) -> usize {
    (required as f64 / 2.0).round_ties_even() as usize
}

/// Builds level queues from recipe demand.
#[derive(Debug, Clone)]
pub struct QueueBuilder {
    generator: ItemGenerator,
}

impl QueueBuilder {
    pub fn new(generator: ItemGenerator) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &ItemGenerator {
        &self.generator
    }

    /// Build and mix the queue for `level_recipes`. No recipes, or recipes
    /// with no demand, produce an empty queue.
    pub fn build_queue<'a, R: Rng + ?Sized>(
        &self,
        level_recipes: impl IntoIterator<Item = &'a RecipeSpec>,
        today: NaiveDate,
        rng: &mut R,
    ) -> WorkQueue {
        self.build_plan(level_recipes, today, rng).into_queue(rng)
    }

    /// Build both halves without mixing them.
    pub fn build_plan<'a, R: Rng + ?Sized>(
        &self,
        level_recipes: impl IntoIterator<Item = &'a RecipeSpec>,
        today: NaiveDate,
        rng: &mut R,
    ) -> QueuePlan {
        let counts = RecipeIndex::aggregate_requirements(level_recipes);

        let mut required = Vec::new();
        for (&ingredient, &n) in &counts {
            for _ in 0..n {
                required.push(
                    self.generator
                        .generate(ingredient, GenerationFlags::CORRECT, today, rng),
                );
            }
        }
        required.shuffle(rng);

        let r = required.len();
        if r == 0 {
            return QueuePlan::default();
        }

        let quota = error_quota(r);
        let defect_slots = pick_slots(rng, r, quota);
        let mistake_slots = pick_slots(rng, r, quota);

        let mut defective = vec![false; r];
        let mut mistaken = vec![false; r];
        for &i in &defect_slots {
            defective[i] = true;
        }
        for &i in &mistake_slots {
            mistaken[i] = true;
        }

        let noise = (0..r)
            .map(|i| {
                let ingredient = IngredientType::random(rng);
                let flags = GenerationFlags::new(mistaken[i], defective[i]);
                self.generator.generate(ingredient, flags, today, rng)
            })
            .collect();

        debug!(
            required = r,
            quota,
            types = counts.len(),
            "built level queue plan"
        );

        QueuePlan {
            required,
            noise,
            defect_slots,
            mistake_slots,
        }
    }
}

/// `amount` distinct indices in `0..length`, ascending.
fn pick_slots<R: Rng + ?Sized>(rng: &mut R, length: usize, amount: usize) -> Vec<usize> {
    let mut slots = index::sample(rng, length, amount.min(length)).into_vec();
    slots.sort_unstable();
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimRng;
    use crate::test_utils::*;
    use IngredientType::*;

    fn builder() -> QueueBuilder {
        QueueBuilder::new(ItemGenerator::new(standard_catalog()))
    }

    #[test]
    fn quota_rounds_half_to_even() {
        assert_eq!(error_quota(0), 0);
        assert_eq!(error_quota(1), 0);
        assert_eq!(error_quota(2), 1);
        assert_eq!(error_quota(3), 2);
        assert_eq!(error_quota(4), 2);
        assert_eq!(error_quota(5), 2);
        assert_eq!(error_quota(7), 4);
    }

    #[test]
    fn two_tomatoes_make_a_queue_of_four() {
        let recipe = recipe("pair", &[(Tomato, 2)]);
        let mut rng = SimRng::new(10);
        let plan = builder().build_plan([&recipe], test_date(), &mut rng);

        assert_eq!(plan.required.len(), 2);
        for r in &plan.required {
            assert_eq!(r.ingredient, Tomato);
            assert!(r.defects.is_empty());
            assert_eq!(r.declared_name, "Tomato");
        }
        assert_eq!(plan.noise.len(), 2);
        assert_eq!(plan.defect_slots.len(), 1);
        assert_eq!(plan.mistake_slots.len(), 1);
        assert_eq!(plan.into_queue(&mut rng).len(), 4);
    }

    #[test]
    fn noise_flags_follow_the_slots() {
        let recipe = recipe("big", &[(Potato, 5), (Onion, 5), (Carrot, 4)]);
        let mut rng = SimRng::new(11);
        let plan = builder().build_plan([&recipe], test_date(), &mut rng);
        assert_eq!(plan.required.len(), 14);
        assert_eq!(plan.defect_slots.len(), 7);
        assert_eq!(plan.mistake_slots.len(), 7);
        for (i, record) in plan.noise.iter().enumerate() {
            assert_eq!(record.has_defect(), plan.defect_slots.contains(&i));
        }
        // Slots are distinct.
        let mut dedup = plan.defect_slots.clone();
        dedup.dedup();
        assert_eq!(dedup, plan.defect_slots);
    }

    #[test]
    fn empty_level_yields_empty_queue() {
        let mut rng = SimRng::new(12);
        let queue = builder().build_queue(std::iter::empty(), test_date(), &mut rng);
        assert!(queue.is_empty());
    }

    #[test]
    fn queue_preserves_required_multiset() {
        let recipe = recipe("mix", &[(Tomato, 3), (Pepper, 2)]);
        let mut rng = SimRng::new(13);
        let plan = builder().build_plan([&recipe], test_date(), &mut rng);
        let mut expected = plan.required.clone();
        expected.extend(plan.noise.clone());

        let mut queue = plan.into_queue(&mut rng);
        let mut drained = Vec::new();
        while let Some(r) = queue.dequeue_next() {
            drained.push(r);
        }
        assert_eq!(drained.len(), expected.len());
        for r in &expected {
            assert!(drained.contains(r));
        }
    }

    #[test]
    fn dequeue_on_empty_returns_none() {
        let mut queue = WorkQueue::new();
        assert_eq!(queue.dequeue_next(), None);
    }

    #[test]
    fn same_seed_same_queue() {
        let recipe = recipe("mix", &[(Cabbage, 2), (Onion, 3)]);
        let a = builder().build_queue([&recipe], test_date(), &mut SimRng::new(5));
        let b = builder().build_queue([&recipe], test_date(), &mut SimRng::new(5));
        assert_eq!(a, b);
    }
}

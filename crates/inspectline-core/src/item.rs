//! Item records and the generator that manufactures them.
//!
//! A correct record is internally consistent: its variety belongs to its
//! type, its origin is the variety's canonical origin, it carries no defects
//! and it expires within the shelf-life window. A mistake record flips a fair
//! coin for each of name, variety, origin and expiry and falsifies the ones
//! that come up. Defects are requested separately and are independent of
//! mistakes.

use std::sync::Arc;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::calendar::{Expiry, MAX_SHELF_MONTHS};
use crate::catalog::{Catalog, Defect, IngredientType, Origin, Variety};

/// One inspectable unit on the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// The ingredient type the record belongs to.
    pub ingredient: IngredientType,
    pub variety: Variety,
    pub origin: Origin,
    /// The name printed on the label; may disagree with `ingredient`.
    pub declared_name: String,
    pub expiry: Expiry,
    /// Physical flaws. Empty for a sound item; at most one is ever attached.
    #[serde(default)]
    pub defects: Vec<Defect>,
}

impl ItemRecord {
    pub fn has_defect(&self) -> bool {
        !self.defects.is_empty()
    }
}

/// What the generator should produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationFlags {
    /// Falsify some documentation fields.
    pub mistake: bool,
    /// Attach a physical defect.
    pub defective: bool,
}

impl GenerationFlags {
    pub const CORRECT: Self = Self {
        mistake: false,
        defective: false,
    };

    pub fn new(mistake: bool, defective: bool) -> Self {
        Self { mistake, defective }
    }
}

/// Builds [`ItemRecord`]s against a shared [`Catalog`].
#[derive(Debug, Clone)]
pub struct ItemGenerator {
    catalog: Arc<Catalog>,
}

impl ItemGenerator {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Produce one record of `ingredient`. Every draw is over a closed,
    /// non-empty domain, so this cannot fail.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        ingredient: IngredientType,
        flags: GenerationFlags,
        today: NaiveDate,
        rng: &mut R,
    ) -> ItemRecord {
        let defects = if flags.defective {
            vec![Defect::random(rng)]
        } else {
            Vec::new()
        };

        if !flags.mistake {
            let variety = self.correct_variety(ingredient, rng);
            return ItemRecord {
                ingredient,
                variety,
                origin: self.catalog.origin_of(variety),
                declared_name: ingredient.canonical_name().to_string(),
                expiry: fresh_expiry(today, rng),
                defects,
            };
        }

        let declared_name = if rng.gen_bool(0.5) {
            IngredientType::random(rng).canonical_name()
        } else {
            ingredient.canonical_name()
        };

        let variety = if rng.gen_bool(0.5) {
            Variety::random(rng)
        } else {
            self.correct_variety(ingredient, rng)
        };

        // Derived from whichever variety was chosen above, right or wrong.
        let origin = if rng.gen_bool(0.5) {
            Origin::random(rng)
        } else {
            self.catalog.origin_of(variety)
        };

        let expiry = if rng.gen_bool(0.5) {
            bad_expiry(today, rng)
        } else {
            fresh_expiry(today, rng)
        };

        ItemRecord {
            ingredient,
            variety,
            origin,
            declared_name: declared_name.to_string(),
            expiry,
            defects,
        }
    }

    fn correct_variety<R: Rng + ?Sized>(&self, ingredient: IngredientType, rng: &mut R) -> Variety {
        let partition = self.catalog.varieties_of(ingredient);
        partition[rng.gen_range(0..partition.len())]
    }
}

/// 1..=12 months ahead.
fn fresh_expiry<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> Expiry {
    Expiry::months_after(today, rng.gen_range(1..=MAX_SHELF_MONTHS))
}

/// Either already expired (1..=12 months back) or beyond the shelf-life
/// window (13..=24 months ahead), with equal odds.
fn bad_expiry<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> Expiry {
    if rng.gen_bool(0.5) {
        Expiry::months_before(today, rng.gen_range(1..=MAX_SHELF_MONTHS))
    } else {
        Expiry::months_after(
            today,
            rng.gen_range(MAX_SHELF_MONTHS + 1..=2 * MAX_SHELF_MONTHS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ExpiryStatus;
    use crate::rng::SimRng;
    use crate::test_utils::*;

    fn generator() -> ItemGenerator {
        ItemGenerator::new(standard_catalog())
    }

    #[test]
    fn correct_records_are_consistent() {
        let g = generator();
        let mut rng = SimRng::new(1);
        let today = test_date();
        for ingredient in IngredientType::ALL {
            for _ in 0..200 {
                let r = g.generate(ingredient, GenerationFlags::CORRECT, today, &mut rng);
                assert_eq!(r.ingredient, ingredient);
                assert_eq!(r.declared_name, ingredient.canonical_name());
                assert!(g.catalog().is_variety_of(ingredient, r.variety));
                assert_eq!(r.origin, g.catalog().origin_of(r.variety));
                assert!(r.defects.is_empty());
                assert_eq!(r.expiry.status(today), ExpiryStatus::Valid);
            }
        }
    }

    #[test]
    fn defective_flag_attaches_exactly_one_defect() {
        let g = generator();
        let mut rng = SimRng::new(2);
        for _ in 0..100 {
            let r = g.generate(
                IngredientType::Onion,
                GenerationFlags::new(false, true),
                test_date(),
                &mut rng,
            );
            assert_eq!(r.defects.len(), 1);
            // Defects never touch the documentation fields.
            assert_eq!(r.declared_name, "Onion");
        }
    }

    #[test]
    fn mistakes_hit_every_field_eventually() {
        let g = generator();
        let mut rng = SimRng::new(3);
        let today = test_date();
        let (mut name, mut variety, mut origin, mut expiry) = (false, false, false, false);
        for _ in 0..500 {
            let r = g.generate(
                IngredientType::Tomato,
                GenerationFlags::new(true, false),
                today,
                &mut rng,
            );
            assert!(r.defects.is_empty());
            name |= r.declared_name != "Tomato";
            variety |= !g.catalog().is_variety_of(IngredientType::Tomato, r.variety);
            origin |= r.origin != g.catalog().origin_of(r.variety);
            expiry |= r.expiry.status(today) != ExpiryStatus::Valid;
        }
        assert!(name && variety && origin && expiry);
    }

    #[test]
    fn bad_expiry_is_never_inside_the_window() {
        let mut rng = SimRng::new(4);
        let today = test_date();
        let mut saw_expired = false;
        let mut saw_out_of_range = false;
        for _ in 0..500 {
            match bad_expiry(today, &mut rng).status(today) {
                ExpiryStatus::Expired => saw_expired = true,
                ExpiryStatus::OutOfRange => saw_out_of_range = true,
                ExpiryStatus::Valid => panic!("bad expiry landed in window"),
            }
        }
        assert!(saw_expired && saw_out_of_range);
    }

    #[test]
    fn same_seed_same_record() {
        let g = generator();
        let flags = GenerationFlags::new(true, true);
        let a = g.generate(IngredientType::Potato, flags, test_date(), &mut SimRng::new(77));
        let b = g.generate(IngredientType::Potato, flags, test_date(), &mut SimRng::new(77));
        assert_eq!(a, b);
    }
}

//! Ingredient catalog: the type -> variety partition and the variety -> origin
//! mapping.
//!
//! Both tables live in one [`Catalog`] that is built once from a flat list of
//! `(variety, type, origin)` rows. Building checks that every variety appears
//! exactly once, that every type owns exactly [`VARIETIES_PER_TYPE`] varieties,
//! and that every origin owns between one and [`MAX_VARIETIES_PER_ORIGIN`].
//! The generator and the validator read the same instance, so they can never
//! disagree about where a variety comes from.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of varieties every ingredient type owns.
pub const VARIETIES_PER_TYPE: usize = 3;

/// Upper bound on the varieties a single origin may own.
pub const MAX_VARIETIES_PER_ORIGIN: usize = 2;

// ---------------------------------------------------------------------------
// Enumerated domains
// ---------------------------------------------------------------------------

/// The six ingredient kinds that appear on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IngredientType {
    Tomato,
    Onion,
    Carrot,
    Potato,
    Pepper,
    Cabbage,
}

impl IngredientType {
    pub const ALL: [IngredientType; 6] = [
        Self::Tomato,
        Self::Onion,
        Self::Carrot,
        Self::Potato,
        Self::Pepper,
        Self::Cabbage,
    ];

    /// Position in [`IngredientType::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The name printed on a correctly labeled record.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::Tomato => "Tomato",
            Self::Onion => "Onion",
            Self::Carrot => "Carrot",
            Self::Potato => "Potato",
            Self::Pepper => "Pepper",
            Self::Cabbage => "Cabbage",
        }
    }

    /// Parse a canonical name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.canonical_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Uniform draw over all six types.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for IngredientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Sub-kind of an ingredient type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Variety {
    Cherry,
    Roma,
    Beefsteak,
    RedOnion,
    Shallot,
    Vidalia,
    Nantes,
    Chantenay,
    Imperator,
    Russet,
    Yukon,
    Fingerling,
    Bell,
    Jalapeno,
    Habanero,
    Savoy,
    Napa,
    RedCabbage,
}

impl Variety {
    pub const ALL: [Variety; 18] = [
        Self::Cherry,
        Self::Roma,
        Self::Beefsteak,
        Self::RedOnion,
        Self::Shallot,
        Self::Vidalia,
        Self::Nantes,
        Self::Chantenay,
        Self::Imperator,
        Self::Russet,
        Self::Yukon,
        Self::Fingerling,
        Self::Bell,
        Self::Jalapeno,
        Self::Habanero,
        Self::Savoy,
        Self::Napa,
        Self::RedCabbage,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Cherry => "Cherry",
            Self::Roma => "Roma",
            Self::Beefsteak => "Beefsteak",
            Self::RedOnion => "Red Onion",
            Self::Shallot => "Shallot",
            Self::Vidalia => "Vidalia",
            Self::Nantes => "Nantes",
            Self::Chantenay => "Chantenay",
            Self::Imperator => "Imperator",
            Self::Russet => "Russet",
            Self::Yukon => "Yukon Gold",
            Self::Fingerling => "Fingerling",
            Self::Bell => "Bell",
            Self::Jalapeno => "Jalapeno",
            Self::Habanero => "Habanero",
            Self::Savoy => "Savoy",
            Self::Napa => "Napa",
            Self::RedCabbage => "Red Cabbage",
        }
    }

    /// Uniform draw over all eighteen varieties, ignoring the type partition.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Variety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Claimed source location of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Origin {
    Spain,
    Italy,
    Netherlands,
    Mexico,
    France,
    Peru,
    Poland,
    China,
    Morocco,
    UnitedStates,
}

impl Origin {
    pub const ALL: [Origin; 10] = [
        Self::Spain,
        Self::Italy,
        Self::Netherlands,
        Self::Mexico,
        Self::France,
        Self::Peru,
        Self::Poland,
        Self::China,
        Self::Morocco,
        Self::UnitedStates,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Spain => "Spain",
            Self::Italy => "Italy",
            Self::Netherlands => "Netherlands",
            Self::Mexico => "Mexico",
            Self::France => "France",
            Self::Peru => "Peru",
            Self::Poland => "Poland",
            Self::China => "China",
            Self::Morocco => "Morocco",
            Self::UnitedStates => "United States",
        }
    }

    /// Uniform draw over all ten origins, ignoring the variety mapping.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A visible physical quality flaw. A record without defects simply carries
/// an empty defect list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Defect {
    Bruised,
    Rotten,
    Moldy,
    Wormy,
    Cracked,
    Withered,
}

impl Defect {
    pub const ALL: [Defect; 6] = [
        Self::Bruised,
        Self::Rotten,
        Self::Moldy,
        Self::Wormy,
        Self::Cracked,
        Self::Withered,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

// ---------------------------------------------------------------------------
// Standard table
// ---------------------------------------------------------------------------

/// The shipped catalog rows: `(variety, owning type, canonical origin)`.
pub const STANDARD_ENTRIES: [(Variety, IngredientType, Origin); 18] = [
    (Variety::Cherry, IngredientType::Tomato, Origin::Spain),
    (Variety::Roma, IngredientType::Tomato, Origin::Italy),
    (Variety::Beefsteak, IngredientType::Tomato, Origin::Netherlands),
    (Variety::RedOnion, IngredientType::Onion, Origin::Netherlands),
    (Variety::Shallot, IngredientType::Onion, Origin::France),
    (Variety::Vidalia, IngredientType::Onion, Origin::UnitedStates),
    (Variety::Nantes, IngredientType::Carrot, Origin::France),
    (Variety::Chantenay, IngredientType::Carrot, Origin::Poland),
    (Variety::Imperator, IngredientType::Carrot, Origin::China),
    (Variety::Russet, IngredientType::Potato, Origin::UnitedStates),
    (Variety::Yukon, IngredientType::Potato, Origin::Peru),
    (Variety::Fingerling, IngredientType::Potato, Origin::Peru),
    (Variety::Bell, IngredientType::Pepper, Origin::Spain),
    (Variety::Jalapeno, IngredientType::Pepper, Origin::Mexico),
    (Variety::Habanero, IngredientType::Pepper, Origin::Mexico),
    (Variety::Savoy, IngredientType::Cabbage, Origin::Italy),
    (Variety::Napa, IngredientType::Cabbage, Origin::China),
    (Variety::RedCabbage, IngredientType::Cabbage, Origin::Morocco),
];

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Errors raised when a catalog table does not cover its domains exactly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("variety {0} is listed more than once")]
    DuplicateVariety(Variety),
    #[error("variety {0} is not listed")]
    MissingVariety(Variety),
    #[error("{ingredient} owns {count} varieties, expected {}", VARIETIES_PER_TYPE)]
    PartitionSize {
        ingredient: IngredientType,
        count: usize,
    },
    #[error("{origin} owns {count} varieties, expected 1..={}", MAX_VARIETIES_PER_ORIGIN)]
    OriginCoverage { origin: Origin, count: usize },
}

/// Validated lookup tables. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Varieties per type, indexed by [`IngredientType::index`].
    partitions: Vec<Vec<Variety>>,
    /// Owning type per variety, indexed by [`Variety::index`].
    owners: Vec<IngredientType>,
    /// Canonical origin per variety, indexed by [`Variety::index`].
    origins: Vec<Origin>,
}

impl Catalog {
    /// Build the shipped catalog.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_entries(&STANDARD_ENTRIES)
    }

    /// Build a catalog from `(variety, type, origin)` rows, rejecting any
    /// table that leaves a gap or overlaps.
    pub fn from_entries(
        entries: &[(Variety, IngredientType, Origin)],
    ) -> Result<Self, CatalogError> {
        let mut owner_slots: Vec<Option<IngredientType>> = vec![None; Variety::ALL.len()];
        let mut origin_slots: Vec<Option<Origin>> = vec![None; Variety::ALL.len()];
        let mut partitions: Vec<Vec<Variety>> = vec![Vec::new(); IngredientType::ALL.len()];
        let mut origin_load = vec![0usize; Origin::ALL.len()];

        for &(variety, ingredient, origin) in entries {
            let slot = variety.index();
            if owner_slots[slot].is_some() {
                return Err(CatalogError::DuplicateVariety(variety));
            }
            owner_slots[slot] = Some(ingredient);
            origin_slots[slot] = Some(origin);
            partitions[ingredient.index()].push(variety);
            origin_load[origin.index()] += 1;
        }

        let owners = Variety::ALL
            .iter()
            .map(|&v| owner_slots[v.index()].ok_or(CatalogError::MissingVariety(v)))
            .collect::<Result<Vec<_>, _>>()?;
        let origins = Variety::ALL
            .iter()
            .map(|&v| origin_slots[v.index()].ok_or(CatalogError::MissingVariety(v)))
            .collect::<Result<Vec<_>, _>>()?;

        for ingredient in IngredientType::ALL {
            let count = partitions[ingredient.index()].len();
            if count != VARIETIES_PER_TYPE {
                return Err(CatalogError::PartitionSize { ingredient, count });
            }
        }

        for origin in Origin::ALL {
            let count = origin_load[origin.index()];
            if !(1..=MAX_VARIETIES_PER_ORIGIN).contains(&count) {
                return Err(CatalogError::OriginCoverage { origin, count });
            }
        }

        Ok(Self {
            partitions,
            owners,
            origins,
        })
    }

    /// The varieties owned by `ingredient`, in table order.
    pub fn varieties_of(&self, ingredient: IngredientType) -> &[Variety] {
        &self.partitions[ingredient.index()]
    }

    /// The type whose partition contains `variety`.
    pub fn ingredient_of(&self, variety: Variety) -> IngredientType {
        self.owners[variety.index()]
    }

    /// The canonical origin of `variety`.
    pub fn origin_of(&self, variety: Variety) -> Origin {
        self.origins[variety.index()]
    }

    /// Whether `variety` belongs to `ingredient`'s partition.
    pub fn is_variety_of(&self, ingredient: IngredientType, variety: Variety) -> bool {
        self.ingredient_of(variety) == ingredient
    }

    /// Varieties whose canonical origin is `origin`.
    pub fn varieties_from(&self, origin: Origin) -> impl Iterator<Item = Variety> + '_ {
        Variety::ALL
            .into_iter()
            .filter(move |&v| self.origin_of(v) == origin)
    }

    pub fn canonical_name(&self, ingredient: IngredientType) -> &'static str {
        ingredient.canonical_name()
    }

    /// Every canonical type name, in [`IngredientType::ALL`] order.
    pub fn all_names(&self) -> impl Iterator<Item = &'static str> {
        IngredientType::ALL.into_iter().map(IngredientType::canonical_name)
    }
}

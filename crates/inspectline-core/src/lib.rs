//! Inspectline Core -- the generation, queue-balancing and validation engine
//! for the vegetable inspection-line game.
//!
//! Item records flow through a per-level work queue, get inspected by the
//! player, and are packed into orders that must match a recipe. Everything in
//! this crate is a synchronous computation over its inputs; rendering, input
//! handling and audio live in the host.
//!
//! # Level Pipeline
//!
//! 1. **Resolve** -- Look up the level's recipes in the [`recipe::RecipeIndex`].
//! 2. **Build** -- [`queue::QueueBuilder`] emits one correct record per unit of
//!    recipe demand plus the same number of noise records, half of them
//!    defective and half of them mislabeled.
//! 3. **Dispatch** -- The host pulls records one at a time from the
//!    [`queue::WorkQueue`].
//! 4. **Assemble** -- Accepted records are moved into an [`order::Order`].
//! 5. **Validate** -- [`validation::OrderValidator`] gates on exact ingredient
//!    counts, then scores every record and computes the time reward.
//! 6. **Reward** -- The reward is added to the [`clock::GameClock`].
//!
//! # Key Types
//!
//! - [`catalog::Catalog`] -- The single type -> variety partition and
//!   variety -> origin mapping, checked for full coverage when built.
//! - [`item::ItemGenerator`] -- Produces correct or deliberately flawed records.
//! - [`session::Session`] -- Explicit wiring of index, clock, builder and
//!   validator for one play session. No global state.
//! - [`rng::SimRng`] -- Seedable SplitMix64 generator; every random draw in the
//!   engine goes through an injected `rand::Rng`.
//!
//! ```rust,ignore
//! let mut session = Session::with_config(recipes, SessionConfig::default(), today, rng)?;
//! session.start_level(&["salad"])?;
//! let order = session.open_order("salad")?;
//! while let Ok(record) = session.next_item() {
//!     // inspect, then accept or discard
//! }
//! let outcome = session.submit(order)?;
//! ```

pub mod calendar;
pub mod catalog;
pub mod clock;
pub mod item;
pub mod order;
pub mod queue;
pub mod recipe;
pub mod rng;
pub mod session;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

//! One play session: the engine components wired together explicitly.
//!
//! A [`Session`] owns the recipe index, the clock, the queue builder, the
//! validator and the rng it was handed. Nothing is looked up through global
//! state. Open orders live in a slot map so the host can juggle several
//! customers at once.

use std::sync::Arc;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogError};
use crate::clock::GameClock;
use crate::item::{ItemGenerator, ItemRecord};
use crate::order::{DEFAULT_ORDER_CAPACITY, Order, OrderError, OrderId, OrderState};
use crate::queue::{QueueBuilder, WorkQueue};
use crate::recipe::RecipeIndex;
use crate::rng::SimRng;
use crate::validation::{OrderValidator, ResultClass, ScoringConfig, ValidationError, ValidationResult};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for a session, usually loaded from a settings file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub scoring: ScoringConfig,
    pub order_capacity: usize,
    /// Countdown seconds at the start of each level.
    pub starting_seconds: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            order_capacity: DEFAULT_ORDER_CAPACITY,
            starting_seconds: 180.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors and stats
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The queue has been drained. Ordinary gameplay, not a fault.
    #[error("no item available")]
    NoItemAvailable,
    /// A recipe name the index cannot resolve. Indicates a wiring bug.
    #[error("recipe '{0}' is not registered")]
    UnknownRecipe(String),
    #[error("order {0:?} is not open in this session")]
    UnknownOrder(OrderId),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl SessionError {
    /// The record a rejected `accept` handed back, if any.
    pub fn into_record(self) -> Option<ItemRecord> {
        match self {
            Self::Order(e) => e.into_record(),
            _ => None,
        }
    }
}

/// Running totals for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub levels_started: u32,
    pub items_dispatched: u32,
    pub orders_submitted: u32,
    pub perfect_orders: u32,
    pub partial_orders: u32,
    pub zero_reward_orders: u32,
    pub wrong_ingredient_orders: u32,
    pub seconds_awarded: f32,
}

impl SessionStats {
    fn record(&mut self, result: &ValidationResult) {
        self.orders_submitted += 1;
        self.seconds_awarded += result.reward_seconds;
        match result.result_class {
            ResultClass::Perfect => self.perfect_orders += 1,
            ResultClass::Partial => self.partial_orders += 1,
            ResultClass::ZeroReward => self.zero_reward_orders += 1,
            ResultClass::WrongIngredients => self.wrong_ingredient_orders += 1,
        }
    }
}

/// A submitted order together with its verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderOutcome {
    pub order: Order,
    pub result: ValidationResult,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session<R: Rng = SimRng> {
    catalog: Arc<Catalog>,
    recipes: RecipeIndex,
    clock: GameClock,
    builder: QueueBuilder,
    validator: OrderValidator,
    rng: R,
    config: SessionConfig,
    queue: WorkQueue,
    orders: SlotMap<OrderId, Order>,
    stats: SessionStats,
}

impl<R: Rng> Session<R> {
    /// Wire a session from already-built components.
    pub fn new(
        recipes: RecipeIndex,
        clock: GameClock,
        builder: QueueBuilder,
        validator: OrderValidator,
        config: SessionConfig,
        rng: R,
    ) -> Self {
        let catalog = Arc::clone(builder.generator().catalog());
        Self {
            catalog,
            recipes,
            clock,
            builder,
            validator,
            rng,
            config,
            queue: Default::default(),
            orders: SlotMap::with_key(),
            stats: SessionStats::default(),
        }
    }

    /// Build the standard catalog and every component from `config`.
    pub fn with_config(
        recipes: RecipeIndex,
        config: SessionConfig,
        today: NaiveDate,
        rng: R,
    ) -> Result<Self, SessionError> {
        let catalog = Arc::new(Catalog::standard()?);
        let builder = QueueBuilder::new(ItemGenerator::new(Arc::clone(&catalog)));
        let validator = OrderValidator::new(Arc::clone(&catalog), config.scoring);
        let clock = GameClock::new(today, config.starting_seconds);
        Ok(Self::new(recipes, clock, builder, validator, config, rng))
    }

    /// The catalog shared by the generator and validator.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn recipes(&self) -> &RecipeIndex {
        &self.recipes
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut GameClock {
        &mut self.clock
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Records left in the current level's queue.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Replace the work queue with a fresh one for `recipe_names` and reset
    /// the countdown. Returns the queue length.
    pub fn start_level<S: AsRef<str>>(&mut self, recipe_names: &[S]) -> Result<usize, SessionError> {
        let mut specs = Vec::with_capacity(recipe_names.len());
        for name in recipe_names {
            let name = name.as_ref();
            let spec = self.recipes.lookup(name).ok_or_else(|| {
                warn!(recipe = name, "level references an unknown recipe");
                SessionError::UnknownRecipe(name.to_string())
            })?;
            specs.push(spec);
        }
        let today = self.clock.today();
        self.queue = self.builder.build_queue(specs, today, &mut self.rng);
        self.clock.reset(self.config.starting_seconds);
        self.stats.levels_started += 1;
        info!(
            recipes = recipe_names.len(),
            items = self.queue.len(),
            %today,
            "level started"
        );
        Ok(self.queue.len())
    }

    /// Hand the next record to the host.
    pub fn next_item(&mut self) -> Result<ItemRecord, SessionError> {
        let record = self.queue.dequeue_next().ok_or(SessionError::NoItemAvailable)?;
        self.stats.items_dispatched += 1;
        Ok(record)
    }

    /// Open an empty order for a registered recipe.
    pub fn open_order(&mut self, recipe_name: &str) -> Result<OrderId, SessionError> {
        if !self.recipes.contains(recipe_name) {
            warn!(recipe = recipe_name, "order opened for unknown recipe");
            return Err(SessionError::UnknownRecipe(recipe_name.to_string()));
        }
        let order = Order::with_capacity(recipe_name, self.config.order_capacity);
        Ok(self.orders.insert(order))
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Open orders in insertion-slot order.
    pub fn open_orders(&self) -> impl Iterator<Item = (OrderId, &Order)> {
        self.orders.iter()
    }

    /// Move `record` into order `id`. On rejection the record travels back
    /// inside the error; see [`SessionError::into_record`].
    pub fn accept(&mut self, id: OrderId, record: ItemRecord) -> Result<OrderState, SessionError> {
        let order = self.orders.get_mut(id).ok_or(SessionError::UnknownOrder(id))?;
        order.accept(record).map_err(|e| {
            debug!(error = %e, recipe = order.recipe(), "record rejected");
            SessionError::from(e)
        })
    }

    pub fn withdraw(&mut self, id: OrderId, slot: usize) -> Result<ItemRecord, SessionError> {
        let order = self.orders.get_mut(id).ok_or(SessionError::UnknownOrder(id))?;
        Ok(order.withdraw(slot)?)
    }

    /// Abandon an open order, returning its records.
    pub fn discard_order(&mut self, id: OrderId) -> Result<Vec<ItemRecord>, SessionError> {
        let order = self.orders.remove(id).ok_or(SessionError::UnknownOrder(id))?;
        Ok(order.into_items())
    }

    /// Submit and validate order `id`, then credit the reward to the clock.
    ///
    /// The id is consumed: the submitted order leaves the session and comes
    /// back inside the [`OrderOutcome`]. Submitting the same id again is
    /// [`SessionError::UnknownOrder`], and resubmitting the returned order is
    /// [`OrderError::AlreadySubmitted`]. A rejected submit leaves the order
    /// open under its id.
    pub fn submit(&mut self, id: OrderId) -> Result<OrderOutcome, SessionError> {
        let order = self.orders.get_mut(id).ok_or(SessionError::UnknownOrder(id))?;
        let recipe = self
            .recipes
            .lookup(order.recipe())
            .ok_or_else(|| SessionError::UnknownRecipe(order.recipe().to_string()))?;
        order.submit()?;
        let result = self.validator.validate(order, recipe, self.clock.today())?;

        if result.reward_seconds > 0.0 {
            self.clock.add_time(result.reward_seconds);
        }
        self.stats.record(&result);
        info!(
            recipe = recipe.name(),
            class = ?result.result_class,
            errors = result.error_count(),
            reward = result.reward_seconds,
            "order validated"
        );

        let order = self.orders.remove(id).ok_or(SessionError::UnknownOrder(id))?;
        Ok(OrderOutcome { order, result })
    }

    /// Advance the countdown. Returns the seconds left.
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.clock.tick(dt)
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    /// The level ends when the countdown runs out.
    pub fn is_level_over(&self) -> bool {
        self.clock.is_out_of_time()
    }
}

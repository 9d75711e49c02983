//! Scripted inspector: plays a level through a [`Session`] without a UI.
//!
//! The inspector diagnoses each record with its own [`OrderValidator`], and
//! with probability `miss_rate` overlooks a flaw. Approved records go to the
//! first open order that still needs their type; an order is submitted as
//! soon as its recipe is satisfied.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use inspectline_core::catalog::IngredientType;
use inspectline_core::item::ItemRecord;
use inspectline_core::order::OrderId;
use inspectline_core::rng::SimRng;
use inspectline_core::session::{Session, SessionError};
use inspectline_core::validation::{OrderValidator, ResultClass};
use inspectline_data::LevelDef;
use rand::Rng;
use tracing::debug;

/// Countdown seconds spent looking at one record.
pub const SECONDS_PER_ITEM: f32 = 2.0;

pub struct ScriptedInspector {
    validator: OrderValidator,
    miss_rate: f64,
    rng: SimRng,
}

/// What happened during one level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelReport {
    pub level: String,
    pub items_seen: usize,
    pub accepted: usize,
    pub discarded: usize,
    pub outcomes: Vec<(String, ResultClass, f32)>,
    pub unfinished_orders: usize,
    pub seconds_left: f32,
}

struct OpenOrder {
    id: OrderId,
    recipe: String,
    needs: BTreeMap<IngredientType, u32>,
}

impl ScriptedInspector {
    pub fn new(validator: OrderValidator, miss_rate: f64, rng: SimRng) -> Self {
        Self {
            validator,
            miss_rate: miss_rate.clamp(0.0, 1.0),
            rng,
        }
    }

    fn approves(&mut self, record: &ItemRecord, today: NaiveDate) -> bool {
        let flawed = self.validator.diagnose(0, record, today).has_errors();
        !flawed || self.rng.gen_bool(self.miss_rate)
    }

    /// Play `level` to the end of its queue or its countdown.
    pub fn play<R: Rng>(
        &mut self,
        session: &mut Session<R>,
        level: &LevelDef,
    ) -> Result<LevelReport, SessionError> {
        session.start_level(&level.recipes)?;
        let mut open = Vec::with_capacity(level.recipes.len());
        for name in &level.recipes {
            open.push(OpenOrder {
                id: session.open_order(name)?,
                recipe: name.clone(),
                needs: session
                    .recipes()
                    .lookup(name)
                    .map(|spec| spec.requirements())
                    .unwrap_or_default(),
            });
        }

        let mut report = LevelReport {
            level: level.name.clone(),
            items_seen: 0,
            accepted: 0,
            discarded: 0,
            outcomes: Vec::new(),
            unfinished_orders: 0,
            seconds_left: 0.0,
        };

        while !open.is_empty() && !session.is_level_over() {
            let record = match session.next_item() {
                Ok(record) => record,
                Err(SessionError::NoItemAvailable) => break,
                Err(e) => return Err(e),
            };
            report.items_seen += 1;
            session.tick(SECONDS_PER_ITEM);

            let today = session.clock().today();
            let slot = open
                .iter()
                .position(|o| o.needs.get(&record.ingredient).is_some_and(|&n| n > 0));
            let Some(slot) = slot.filter(|_| self.approves(&record, today)) else {
                report.discarded += 1;
                continue;
            };

            let ingredient = record.ingredient;
            let target = &mut open[slot];
            match session.accept(target.id, record) {
                Ok(_) => report.accepted += 1,
                Err(SessionError::Order(e)) => {
                    debug!(error = %e, recipe = %target.recipe, "order could not take the record");
                    report.discarded += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }
            if let Some(n) = target.needs.get_mut(&ingredient) {
                *n -= 1;
            }

            if target.needs.values().all(|&n| n == 0) {
                let done = open.remove(slot);
                let outcome = session.submit(done.id)?;
                report.outcomes.push((
                    done.recipe,
                    outcome.result.result_class,
                    outcome.result.reward_seconds,
                ));
            }
        }

        report.unfinished_orders = open.len();
        for order in open {
            session.discard_order(order.id)?;
        }
        report.seconds_left = session.clock().remaining();
        Ok(report)
    }
}

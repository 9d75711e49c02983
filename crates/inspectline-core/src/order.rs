//! Orders: a fixed number of slots filled with accepted records for one recipe.
//!
//! Lifecycle: `Empty -> Filling -> Full -> Submitted`. Submission is terminal.
//! Rejected records are handed back inside the error so nothing is lost.

use serde::{Deserialize, Serialize};

use crate::item::ItemRecord;

/// Slots in a standard order crate.
pub const DEFAULT_ORDER_CAPACITY: usize = 6;

slotmap::new_key_type! {
    /// Identifies an open order within a session.
    pub struct OrderId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderState {
    Empty,
    Filling,
    Full,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("order is full ({capacity} slots)")]
    Full {
        record: ItemRecord,
        capacity: usize,
    },
    #[error("order has been submitted and no longer accepts records")]
    Closed { record: ItemRecord },
    #[error("order has already been submitted")]
    AlreadySubmitted,
    #[error("cannot submit an empty order")]
    EmptySubmit,
    #[error("order has no record in slot {slot}")]
    NoSuchSlot { slot: usize },
}

impl OrderError {
    /// The rejected record, if this error carries one.
    pub fn into_record(self) -> Option<ItemRecord> {
        match self {
            Self::Full { record, .. } | Self::Closed { record } => Some(record),
            _ => None,
        }
    }
}

/// Records assembled for one recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    recipe: String,
    capacity: usize,
    items: Vec<ItemRecord>,
    submitted: bool,
}

impl Order {
    /// A standard six-slot order for `recipe`.
    pub fn new(recipe: impl Into<String>) -> Self {
        Self::with_capacity(recipe, DEFAULT_ORDER_CAPACITY)
    }

    /// An order with `capacity` slots (at least one).
    pub fn with_capacity(recipe: impl Into<String>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            recipe: recipe.into(),
            capacity,
            items: Vec::with_capacity(capacity),
            submitted: false,
        }
    }

    /// Name of the recipe this order is assembled against.
    pub fn recipe(&self) -> &str {
        &self.recipe
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn remaining_slots(&self) -> usize {
        self.capacity - self.items.len()
    }

    pub fn state(&self) -> OrderState {
        if self.submitted {
            OrderState::Submitted
        } else if self.items.is_empty() {
            OrderState::Empty
        } else if self.items.len() >= self.capacity {
            OrderState::Full
        } else {
            OrderState::Filling
        }
    }

    /// Move `record` into the next free slot. Returns the new state.
    pub fn accept(&mut self, record: ItemRecord) -> Result<OrderState, OrderError> {
        match self.state() {
            OrderState::Submitted => Err(OrderError::Closed { record }),
            OrderState::Full => Err(OrderError::Full {
                record,
                capacity: self.capacity,
            }),
            OrderState::Empty | OrderState::Filling => {
                self.items.push(record);
                Ok(self.state())
            }
        }
    }

    /// Take the record in `slot` back out. Later records shift down.
    pub fn withdraw(&mut self, slot: usize) -> Result<ItemRecord, OrderError> {
        if self.submitted {
            return Err(OrderError::AlreadySubmitted);
        }
        if slot >= self.items.len() {
            return Err(OrderError::NoSuchSlot { slot });
        }
        Ok(self.items.remove(slot))
    }

    /// Close the order. Only `Filling` and `Full` orders can be submitted.
    pub fn submit(&mut self) -> Result<(), OrderError> {
        match self.state() {
            OrderState::Submitted => Err(OrderError::AlreadySubmitted),
            OrderState::Empty => Err(OrderError::EmptySubmit),
            OrderState::Filling | OrderState::Full => {
                self.submitted = true;
                Ok(())
            }
        }
    }

    /// Consume the order and hand its records back.
    pub fn into_items(self) -> Vec<ItemRecord> {
        self.items
    }
}

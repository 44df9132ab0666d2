use std::collections::HashMap;
use uuid::Uuid;

use crate::validation::ValidationError;

/// A line offered for allocation together with its ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCandidate {
    pub order_line_id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub product_name: String,
    pub max_quantity: u32,
}

/// Per-line quantity choices over a fixed candidate set.
///
/// A line is selected exactly when its quantity is non-zero; every selected
/// quantity lies in `1..=max_quantity`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    candidates: Vec<LineCandidate>,
    chosen: HashMap<Uuid, u32>,
}

impl Selection {
    /// Candidates with nothing left to allocate are not offered.
    pub fn new(candidates: Vec<LineCandidate>) -> Self {
        Self {
            candidates: candidates.into_iter().filter(|c| c.max_quantity > 0).collect(),
            chosen: HashMap::new(),
        }
    }

    pub fn candidates(&self) -> &[LineCandidate] {
        &self.candidates
    }

    pub fn candidate(&self, order_line_id: &Uuid) -> Option<&LineCandidate> {
        self.candidates.iter().find(|c| c.order_line_id == *order_line_id)
    }

    pub fn quantity(&self, order_line_id: &Uuid) -> u32 {
        self.chosen.get(order_line_id).copied().unwrap_or(0)
    }

    /// Set one line's quantity. Zero deselects; above the ceiling is rejected
    /// and the selection is left untouched.
    pub fn set_quantity(&mut self, order_line_id: Uuid, quantity: u32) -> Result<(), ValidationError> {
        let maximum = self
            .candidate(&order_line_id)
            .ok_or(ValidationError::UnknownLine(order_line_id))?
            .max_quantity;

        if quantity > maximum {
            return Err(ValidationError::QuantityExceedsMaximum {
                order_line_id,
                requested: quantity,
                maximum,
            });
        }

        self.apply(order_line_id, quantity);
        Ok(())
    }

    /// Stepper-style input: clamp into `[0, max]` and return what was stored.
    pub fn set_quantity_clamped(&mut self, order_line_id: Uuid, quantity: u32) -> Result<u32, ValidationError> {
        let maximum = self
            .candidate(&order_line_id)
            .ok_or(ValidationError::UnknownLine(order_line_id))?
            .max_quantity;

        let stored = quantity.min(maximum);
        self.apply(order_line_id, stored);
        Ok(stored)
    }

    /// Every candidate at its full ceiling.
    pub fn select_all(&mut self) {
        self.chosen = self
            .candidates
            .iter()
            .map(|c| (c.order_line_id, c.max_quantity))
            .collect();
    }

    pub fn deselect_all(&mut self) {
        self.chosen.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    /// Selected lines in candidate order.
    pub fn selected(&self) -> Vec<(&LineCandidate, u32)> {
        self.candidates
            .iter()
            .filter_map(|c| self.chosen.get(&c.order_line_id).map(|q| (c, *q)))
            .collect()
    }

    fn apply(&mut self, order_line_id: Uuid, quantity: u32) {
        if quantity == 0 {
            self.chosen.remove(&order_line_id);
        } else {
            self.chosen.insert(order_line_id, quantity);
        }
    }
}

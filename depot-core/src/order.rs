use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

/// An order as supplied by the order source. Read-only to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
}

impl Order {
    pub fn new(order_number: impl Into<String>, customer_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_number: order_number.into(),
            customer_name,
            lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: OrderLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn line(&self, order_line_id: &Uuid) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.order_line_id == *order_line_id)
    }

    /// Lines that still have something left to allocate.
    pub fn open_lines(&self) -> impl Iterator<Item = &OrderLine> {
        self.lines.iter().filter(|l| l.remaining_quantity() > 0)
    }

    pub fn has_remaining(&self) -> bool {
        self.open_lines().next().is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub order_line_id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub product_name: String,
    pub ordered_quantity: u32,
    #[serde(default)]
    pub fulfilled_quantity: u32,
}

impl OrderLine {
    pub fn new(
        product_id: Uuid,
        sku: impl Into<String>,
        product_name: impl Into<String>,
        ordered_quantity: u32,
        fulfilled_quantity: u32,
    ) -> CoreResult<Self> {
        if fulfilled_quantity > ordered_quantity {
            return Err(CoreError::ValidationError(format!(
                "fulfilled quantity {} exceeds ordered quantity {}",
                fulfilled_quantity, ordered_quantity
            )));
        }

        Ok(Self {
            order_line_id: Uuid::new_v4(),
            product_id,
            sku: sku.into(),
            product_name: product_name.into(),
            ordered_quantity,
            fulfilled_quantity,
        })
    }

    /// Upper bound for any new allocation against this line.
    pub fn remaining_quantity(&self) -> u32 {
        // A malformed upstream record never yields a negative bound.
        self.ordered_quantity.saturating_sub(self.fulfilled_quantity)
    }
}

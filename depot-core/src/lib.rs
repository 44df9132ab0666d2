pub mod address;
pub mod order;
pub mod repository;
pub mod resource;
pub mod warehouse;

pub use address::{AddressField, PostalAddress};
pub use order::{Order, OrderLine};
pub use repository::{OrderSource, WarehouseDirectory};
pub use resource::{ResourceClient, ResourceError, ResourceMethod};
pub use warehouse::Warehouse;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

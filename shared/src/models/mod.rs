//! Domain models shared between the booking core and the console

pub mod catalog;
pub mod order;
pub mod table;
pub mod voucher;

pub use catalog::{CatalogItem, ItemKind};
pub use order::{OrderStatus, OrderSummary};
pub use table::{Table, TableStatus, TableUpdate};
pub use voucher::{DiscountType, Voucher};

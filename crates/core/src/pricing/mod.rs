mod resolver;
mod table;

pub use resolver::{PriceResolver, ResolutionError};
pub use table::PriceTable;

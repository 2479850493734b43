pub mod loaders;
pub mod order;

pub use loaders::{load_orders, read_orders};
pub use order::{Order, REQUIRED_COLUMNS};

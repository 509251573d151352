pub mod doh;
pub mod health;
pub mod lookup;
pub mod stats;

pub use doh::{doh_get, doh_post};
pub use health::health_check;
pub use lookup::lookup;
pub use stats::get_stats;

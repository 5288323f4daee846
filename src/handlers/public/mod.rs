// handlers/public/mod.rs - Public handlers (no authentication required)
pub mod carts;
pub mod menu;
pub mod payments;
pub mod reviews;
pub mod stats;
pub mod system;
pub mod tokens;
pub mod users;

// handlers/elevated/mod.rs - Elevated handlers (admin role required)
//
// These run behind both the identity gate and the admin gate; the admin
// role is read from the stored user record on every request, never from
// the token.
pub mod menu;
pub mod stats;
pub mod users;

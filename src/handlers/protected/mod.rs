// handlers/protected/mod.rs - Protected handlers (valid bearer token required)
//
// Routes here are scoped to the caller: the `:email` path segment must match
// the token identity or the request is refused with 403.
pub mod payments;
pub mod users;

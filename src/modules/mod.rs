//! Feature modules. Each has a `controller` (HTTP handlers), a `service`
//! (calls into the store) and a `router`.

pub mod auth;
pub mod health;
pub mod lookup;
pub mod services;
pub mod users;

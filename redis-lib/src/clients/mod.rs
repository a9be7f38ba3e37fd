//! The high-level client: the `Redis` facade and the factories building it.

mod client;
pub use client::Redis;
#[cfg(test)]
pub(crate) use client::CONNECTION_METHODS;

mod factory;
pub use factory::{create_client, create_redis};

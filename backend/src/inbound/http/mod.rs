//! HTTP inbound adapter exposing REST endpoints.

pub mod adopts;
pub mod campaigns;
pub mod donations;
pub mod error;
pub mod health;
pub mod payments;
pub mod pets;
pub mod query;
pub(crate) mod records;
pub mod routes;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;

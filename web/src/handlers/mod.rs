//! HTTP handlers.
//!
//! One module per resource; DTOs live next to the handlers that shape
//! them. Handlers stay thin — parse, call the engine, shape the response.

pub mod admin;
pub mod catalog;
pub mod claimants;
pub mod claims;
pub mod health;

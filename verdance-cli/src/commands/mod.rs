//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`assess`] - Sustainability assessment (authenticated)
//! - [`config`] - Configuration management (path, show, init)
//! - [`health`] - Vegetation health at a point
//! - [`index`] - Vegetation index statistics
//! - [`land_cover`] - Land-cover composition of a rectangle
//! - [`moisture`] - Soil moisture and drought risk
//! - [`status`] - Backend availability and mode
//! - [`trend`] - Multi-year index trend

pub mod assess;
pub mod common;
pub mod config;
pub mod health;
pub mod index;
pub mod land_cover;
pub mod moisture;
pub mod status;
pub mod trend;

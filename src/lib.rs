//! Client-side product catalog.
//!
//! A single catalog actor owns the browsing state (filters, sort, page, cart,
//! selection and toast) and answers typed requests sent through
//! [`clients::CatalogClient`]. Favorites survive restarts in a key-value slot.
//! The filter, sort and paginate steps are plain functions in [`pipeline`].

pub mod app_system;
pub mod catalog_actor;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod favorites;
pub mod messages;
pub mod pipeline;
pub mod repository;
pub mod view;

#[cfg(test)]
mod mock_framework;

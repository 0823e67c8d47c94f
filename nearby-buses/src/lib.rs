//! Nearby bus stops with live arrival countdowns.
//!
//! Locates the device, lists the closest stops from the public stop
//! registry, and shows per-service arrival countdowns that tick once a
//! second. A few stops can be kept as favourites.

pub mod app;
pub mod config;
pub mod countdown;
pub mod domain;
pub mod favorites;
pub mod feed;
pub mod locator;
pub mod nearby;
pub mod view;

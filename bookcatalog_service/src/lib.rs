pub mod api;
pub mod pagination;

#[cfg(any(feature = "client", test))]
pub mod client;

#[cfg(any(feature = "server", test))]
pub mod app_config;
#[cfg(any(feature = "server", test))]
pub mod catalog;
#[cfg(any(feature = "server", test))]
pub mod catalog_repository;
#[cfg(any(feature = "server", test))]
mod handlers;
#[cfg(any(feature = "server", test))]
pub mod negotiation;
#[cfg(any(feature = "server", test))]
pub mod reviews;
#[cfg(any(feature = "server", test))]
pub mod settings;
#[cfg(any(feature = "server", test))]
mod views;

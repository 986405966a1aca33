//! API Module
//!
//! One submodule per resource, each exposing a `router()` merged in
//! [`crate::core::server::build_app`].

pub mod auth;
pub mod categories;
pub mod dishes;
pub mod health;
pub mod image;
pub mod menu;
pub mod qrcode;
pub mod upload;

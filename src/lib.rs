// lib.rs — panorama viewer core; the window and GPU glue live in main.rs

pub mod app;
pub mod catalog;
pub mod config;
pub mod controls;
pub mod error;
pub mod i18n;
pub mod panorama;
pub mod preload;
pub mod renderer;
pub mod store;
pub mod toolbar;

slint::include_modules!();

pub mod app;

#[cfg(feature = "vision")]
pub mod camera;

pub mod actions;
#[cfg(feature = "egui-desktop")]
pub mod app;
pub mod driver;
pub mod logging;
pub mod prefs;
pub mod state;
#[cfg(feature = "egui-desktop")]
mod theme;

#[cfg(feature = "egui-desktop")]
pub use app::launch;

pub mod encoding;
pub mod formats;
pub mod grid;
pub mod matcher;
pub mod model;
pub mod session;
pub mod translate;

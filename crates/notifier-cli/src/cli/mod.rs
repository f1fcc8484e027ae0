pub mod audio;
pub mod fixture;
pub mod output;
pub mod runner;

pub use fixture::Fixture;
pub use output::ConsoleSurface;
pub use runner::{default_data_dir, Runner};

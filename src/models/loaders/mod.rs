pub mod toml_loader;

pub use toml_loader::{load_batch_file, parse_batch_config, BatchFile};

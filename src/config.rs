//! Configuration loader and schema types.
//!
//! Settings come from (highest wins) environment variables, an optional
//! TOML file, then struct defaults. CLI flags are applied on top in `main`.

mod load;
mod schema;

pub use load::resolve_config_path;
pub use schema::*;

//! User settings: the `Settings` schema and how it is read from the config
//! file and `RONDO__*` environment variables.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;

mod config;
mod identifier_authority;

pub use config::*;
pub use identifier_authority::*;

mod error;
mod patient_id;

pub use error::*;
pub use patient_id::*;

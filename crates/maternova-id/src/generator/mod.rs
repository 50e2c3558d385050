#[cfg(feature = "atomic")]
mod atomic;
mod basic;
mod id_generator;
mod interface;
#[cfg(feature = "lock")]
mod lock;
mod policy;
mod snapshot;

#[cfg_attr(docsrs, doc(cfg(feature = "atomic")))]
#[cfg(feature = "atomic")]
pub use atomic::*;
pub use basic::*;
pub use id_generator::*;
pub use interface::*;
#[cfg_attr(docsrs, doc(cfg(feature = "lock")))]
#[cfg(feature = "lock")]
pub use lock::*;
pub use policy::*;
pub use snapshot::*;

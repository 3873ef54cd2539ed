pub use autologin_core::*;
#[cfg(feature = "memory")]
pub use autologin_memory::*;

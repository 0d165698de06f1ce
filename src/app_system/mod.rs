//! System orchestration, startup, and shutdown logic.

pub mod rental_system;
pub mod seed;
pub mod tracing;

pub use self::rental_system::*;
pub use self::seed::*;
pub use self::tracing::*;

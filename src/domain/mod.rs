//! Business domain entities. Pure data structures with no actor-specific concerns.

pub mod address;
pub mod money;
pub mod notification;
pub mod payout;
pub mod product;
pub mod rental;
pub mod user;
pub mod vendor;

pub use address::*;
pub use money::*;
pub use notification::*;
pub use payout::*;
pub use product::*;
pub use rental::*;
pub use user::*;
pub use vendor::*;

//! Domain records and list endpoints for users, conversations, and threads.

pub mod conversation;
pub mod filter;
pub mod thread;
pub mod user;

pub use conversation::*;
pub use filter::*;
pub use thread::*;
pub use user::*;

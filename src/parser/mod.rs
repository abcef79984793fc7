pub mod beacon;
pub mod binary;
pub mod catalog;
pub mod cell;
pub mod helpers;
pub mod message;
pub mod stream;
pub mod text;

pub use beacon::*;
pub use binary::*;
pub use catalog::*;
pub use cell::*;
pub use message::*;
pub use stream::*;
pub use text::*;

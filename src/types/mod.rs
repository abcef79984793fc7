pub mod network;
pub mod position;
pub mod record;

pub use network::*;
pub use position::*;
pub use record::*;

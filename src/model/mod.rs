pub mod address;
pub mod config;
pub mod counts;
pub mod item;
pub mod notice;
pub mod outcome;
pub mod page;
pub mod target;

pub use address::*;
pub use config::*;
pub use counts::*;
pub use item::*;
pub use notice::*;
pub use outcome::*;
pub use page::*;
pub use target::*;

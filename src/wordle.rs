//! The solver core: pattern oracle, corpora, frequency costs, candidate
//! filtering, move selection, strategy-tree search, persistence, and the
//! runtime lookup consumed by a game controller.

pub mod color;
pub mod corpus;
pub mod data;
pub mod filter;
pub mod freq;
pub mod lookup;
pub mod matrix;
pub mod prelude;
pub mod resources;
pub mod search;
pub mod select;
pub mod strategy;

pub use color::*;
pub use corpus::*;
pub use data::*;
pub use filter::*;
pub use freq::*;
pub use lookup::*;
pub use matrix::*;
pub use prelude::*;
pub use resources::*;
pub use search::*;
pub use select::*;
pub use strategy::*;

pub use actions::*;
pub use config::*;
pub use errors::*;
pub use grid::*;
pub use protocol::*;
pub use turn::*;
pub use visualization::*;

mod actions;
#[cfg(test)]
mod arbitrary;
pub mod automaton;
mod config;
mod errors;
mod grid;
mod protocol;
mod turn;
mod visualization;

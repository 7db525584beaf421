mod confirmation;
mod derive;
mod instruction;
mod pipeline;
mod transaction;

pub use confirmation::*;
pub use derive::*;
pub use instruction::*;
pub use pipeline::*;
pub use transaction::*;

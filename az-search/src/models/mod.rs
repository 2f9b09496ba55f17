mod alias;
mod documents;
mod index;
mod semantic;
mod vector;

pub use alias::*;
pub use documents::*;
pub use index::*;
pub use semantic::*;
pub use vector::*;

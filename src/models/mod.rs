pub mod criteria;
pub mod insights;
pub mod record;

pub use criteria::*;
pub use insights::*;
pub use record::*;

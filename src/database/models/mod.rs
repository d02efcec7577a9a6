pub mod certificate;
pub mod lunch;
pub mod open_doors;
pub mod pedagog;
pub mod poll;
pub mod student;

pub use certificate::*;
pub use lunch::*;
pub use open_doors::*;
pub use pedagog::*;
pub use poll::*;
pub use student::*;

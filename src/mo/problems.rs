pub mod dtlz;
pub mod schaffer_n1;
pub mod zdt1;

pub use dtlz::dtlz1::Dtlz1;
pub use schaffer_n1::SchafferN1;
pub use zdt1::Zdt1;

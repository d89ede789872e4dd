pub mod deposit;
pub mod month;
pub mod settings;
pub mod trade;

pub use deposit::*;
pub use month::*;
pub use settings::*;
pub use trade::*;

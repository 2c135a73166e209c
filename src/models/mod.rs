pub mod alert;
pub mod attribute;
pub mod crop;
pub mod parameter;
pub mod reading;
pub mod recommendation;
pub mod scoring;
pub mod threshold;

pub use alert::*;
pub use attribute::*;
pub use crop::*;
pub use parameter::*;
pub use reading::*;
pub use recommendation::*;
pub use scoring::*;
pub use threshold::*;

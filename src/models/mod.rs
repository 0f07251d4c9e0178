pub mod health;
pub mod request;
pub mod response;
pub mod settings;

pub use health::*;
pub use request::*;
pub use response::*;
pub use settings::*;

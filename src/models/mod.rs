// Re-export all models organized by domain
pub mod appointment;
pub mod bed;
pub mod billing;
pub mod errors;
pub mod medicine;
pub mod patient;
pub mod request;
pub mod response;
pub mod staff;
pub mod user;

pub use appointment::*;
pub use bed::*;
pub use billing::*;
pub use errors::*;
pub use medicine::*;
pub use patient::*;
pub use request::*;
pub use response::*;
pub use staff::*;
pub use user::*;

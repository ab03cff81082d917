pub mod appointment_service;
pub mod bed_service;
pub mod billing_service;
pub mod dashboard_service;
pub mod patient_service;
pub mod pharmacy_service;
pub mod record_service;
pub mod staff_service;
pub mod user_service;

pub use appointment_service::*;
pub use bed_service::*;
pub use billing_service::*;
pub use dashboard_service::*;
pub use patient_service::*;
pub use pharmacy_service::*;
pub use record_service::*;
pub use staff_service::*;
pub use user_service::*;

pub mod notifications_constants;
pub mod notifications_model;
pub mod notifications_service;
pub mod notifications_traits;


pub use notifications_constants::*;
pub use notifications_model::{FanoutOutcome, FanoutResult, Message};
pub use notifications_service::NotificationService;
pub use notifications_traits::{NotificationServiceTrait, NotifierTrait};

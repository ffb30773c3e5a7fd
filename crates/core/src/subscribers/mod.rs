pub mod subscribers_model;
pub mod subscribers_service;
pub mod subscribers_traits;


pub use subscribers_model::validate_email;
pub use subscribers_service::SubscriberService;
pub use subscribers_traits::{SubscriberRepositoryTrait, SubscriberServiceTrait};

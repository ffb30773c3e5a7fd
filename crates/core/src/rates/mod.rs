pub mod rates_service;
pub mod rates_traits;

pub use rates_service::RateService;
pub use rates_traits::RateServiceTrait;

mod repository;

pub use repository::SubscriberRepository;

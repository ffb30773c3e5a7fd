/// Subject line of the rate broadcast.
pub const RATE_INFO_SUBJECT: &str = "Rate info";

/// Deliveries in flight at once during a broadcast.
pub const DEFAULT_BROADCAST_CONCURRENCY: usize = 1;

/// Body of the rate broadcast.
pub fn rate_info_body(rate: f64) -> String {
    format!("Current rate is {:.6}", rate)
}

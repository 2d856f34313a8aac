//! Concrete single-workload resources

pub mod gateway_fqdn;
pub mod gateway_name;

pub use gateway_fqdn::GatewayFqdn;
pub use gateway_name::GatewayName;

//! Data transfer objects

mod resolver_config;

pub use resolver_config::ResolverConfig;

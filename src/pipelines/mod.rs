pub mod provider;
pub mod sentiment;

pub(crate) mod stats;

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod logging;
pub mod page;
pub mod server;

#[cfg(test)]
mod test_support;

pub mod binding;
pub mod dispatcher;
pub mod poller;
pub mod slot;
pub mod snapshot;

#[cfg(test)]
pub mod poller_test;

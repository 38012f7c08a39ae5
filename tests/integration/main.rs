//! End-to-end tests over the public API with a scripted transport.

mod aggregator;
mod provider_client;
mod stub_transport;

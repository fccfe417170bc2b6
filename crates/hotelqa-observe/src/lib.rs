//! Observability setup shared by the `hotelqa` binary.

pub mod tracing_setup;

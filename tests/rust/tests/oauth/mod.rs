//! OAuth bridge integration tests.

mod api;

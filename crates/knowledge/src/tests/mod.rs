//! Crate-level tests and the fakes they share with module tests.

pub(crate) mod fakes;

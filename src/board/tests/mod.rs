//! Board-level test suites.

mod movegen;

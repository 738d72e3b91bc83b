//! Network substrates for tests.

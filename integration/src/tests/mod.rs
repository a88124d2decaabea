//! The end-to-end tests, run against a devnet with the GHO system deployed

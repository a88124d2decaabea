//! Defines types and utilities for managing the inventory of integration tests

use std::{future::Future, pin::Pin};

use eyre::Result;
use itertools::Itertools;

use crate::env::TestEnv;

/// The signature of an integration test
type TestFn = fn(TestEnv) -> Pin<Box<dyn Future<Output = Result<()>>>>;

/// A struct representing an integration test
pub struct IntegrationTest {
    /// The group the test belongs to, chain state is restored after each group
    pub group: &'static str,
    /// The name of the test
    pub name: &'static str,
    /// The test function
    pub test_fn: TestFn,
}

// Collect the integration tests into an iterable
inventory::collect!(IntegrationTest);

/// The registered tests, grouped and in a stable order
pub fn grouped_tests(filter: Option<&str>) -> Vec<(&'static str, Vec<&'static IntegrationTest>)> {
    inventory::iter::<IntegrationTest>
        .into_iter()
        .filter(|test| filter.map_or(true, |name| test.name == name || test.group == name))
        .sorted_by_key(|test| (test.group, test.name))
        .group_by(|test| test.group)
        .into_iter()
        .map(|(group, tests)| (group, tests.collect()))
        .collect()
}

/// Macro to register an integration test under a group
#[macro_export]
macro_rules! integration_test {
    ($group:literal, $test_fn:ident) => {
        inventory::submit!($crate::test_inventory::IntegrationTest {
            group: $group,
            name: stringify!($test_fn),
            test_fn: move |env| std::boxed::Box::pin($test_fn(env)),
        });
    };
}

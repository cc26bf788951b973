mod scenario_tests;
mod support;

//! Test-support crate. The golden-file and API suites live at the workspace
//! root under `tests/` and are wired in as this package's test targets.

//! Workspace-level integration tests for mparith.
//!
//! The tests live in `tests/`; this library target only anchors them.

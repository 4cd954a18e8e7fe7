//! Fluent builders for test stimulus.

//! Mock implementations of the core's collaborators.

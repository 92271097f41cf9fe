// Business logic services layer
//
// This module contains reusable business logic services that can be
// used across different parts of the application (CLI, wizard core, tests).

pub mod reconcile;

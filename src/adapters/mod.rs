// Adapters layer: concrete implementations for external systems.
// Filesystem storage lives under src/config/cli.rs next to the CLI config that owns it.

pub mod memory;

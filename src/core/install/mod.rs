// ─── Release Installer ───
// Resolves a release id against the manifest and materializes everything it
// needs into the content store.

pub mod materializer;

pub use materializer::{MaterializedRelease, Materializer};

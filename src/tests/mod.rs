// navto test suite
//
// Unit tests for small helpers live next to their code; everything that
// exercises more than one module lives here.

pub mod helpers; // Fixture builders, scripted index builder, recording callback

pub mod pattern_tests; // Match kinds, dotted and spaced patterns


pub mod config_tests; // Options file, env overrides, manifests
pub mod workspace_tests; // Solution lookups, priority partition

// Options loading and workspace manifests

use anyhow::Result;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::config::{MAX_CONCURRENT_PROJECTS_ENV, NavigateToOptions};
use crate::search::{IndexBuilder, NavigateToError};
use crate::symbols::{Accessibility, DeclaredSymbolKind};
use crate::workspace::manifest::WorkspaceManifest;

#[test]
#[serial]
fn missing_file_gives_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let options = NavigateToOptions::load(&dir.path().join("navto.toml"))?;

    assert_eq!(options, NavigateToOptions::default());
    assert!(options.max_concurrent_projects >= 1);
    Ok(())
}

#[test]
fn partial_toml_keeps_other_defaults() -> Result<()> {
    let options = NavigateToOptions::from_toml("allow_fuzzy_matching = false\nmax_concurrent_projects = 0\n")?;

    assert!(!options.allow_fuzzy_matching);
    assert_eq!(options.max_concurrent_projects, 1, "zero is clamped to one");
    assert!(options.search_generated_documents);
    assert_eq!(options.fuzzy_min_pattern_length, 3);
    Ok(())
}

#[test]
#[serial]
fn invalid_file_is_a_config_error() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("navto.toml");
    fs::write(&path, "max_concurrent_projects = \"lots\"")?;

    let err = NavigateToOptions::load(&path).unwrap_err();
    assert!(matches!(err, NavigateToError::Config(ref message) if message.contains("navto.toml")));
    Ok(())
}

#[test]
#[serial]
fn environment_overrides_the_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("navto.toml");
    fs::write(&path, "max_concurrent_projects = 2\n")?;

    // SAFETY: serialized with every other test that touches the environment
    unsafe { std::env::set_var(MAX_CONCURRENT_PROJECTS_ENV, "7") };
    let overridden = NavigateToOptions::load(&path)?;
    unsafe { std::env::set_var(MAX_CONCURRENT_PROJECTS_ENV, "none") };
    let ignored = NavigateToOptions::load(&path)?;
    unsafe { std::env::remove_var(MAX_CONCURRENT_PROJECTS_ENV) };

    assert_eq!(overridden.max_concurrent_projects, 7);
    assert_eq!(ignored.max_concurrent_projects, 2);
    Ok(())
}

#[test]
fn fuzzy_setting_reaches_the_matcher() -> Result<()> {
    use crate::pattern::PatternMatcher;

    let strict = NavigateToOptions::from_toml("allow_fuzzy_matching = false")?.matcher();
    assert!(strict.match_word("Console", "Consloe").is_none());
    assert!(NavigateToOptions::default().matcher().match_word("Console", "Consloe").is_some());
    Ok(())
}

#[tokio::test]
async fn manifest_builds_solution_and_indices() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("workspace.json");
    fs::write(
        &path,
        r#"{
          "projects": [
            { "name": "Core(net8.0)",
              "documents": [
                { "path": "src/Foo.cs",
                  "declarations": [
                    { "name": "Foo", "kind": "class", "span": { "start": 0, "length": 3 },
                      "container": "Acme", "accessibility": "internal" },
                    { "name": "Run", "kind": "method", "span": { "start": 20, "length": 3 },
                      "container": "Foo", "fully_qualified_container": "Acme.Foo", "parameter_count": 1 }
                  ] },
                { "path": "obj/Foo.g.cs", "generated": true }
              ] },
            { "name": "Tools" }
          ]
        }"#,
    )?;

    let (solution, builder) = WorkspaceManifest::load(&path)?.into_workspace();
    assert_eq!(solution.projects().len(), 2);
    assert_eq!(solution.document_count(), 2);

    let core = &solution.projects()[0];
    assert_eq!(core.generated_documents().count(), 1);
    let foo = core.regular_documents().next().unwrap();
    let index = builder.build_index(&foo.key(), &CancellationToken::new()).await?;

    let declarations = index.declarations();
    assert_eq!(declarations.len(), 2);
    assert_eq!(declarations[0].accessibility, Accessibility::Internal);
    assert_eq!(declarations[0].fully_qualified_container_name.as_ref(), "Acme");
    assert_eq!(declarations[1].kind, DeclaredSymbolKind::Method);
    assert_eq!(declarations[1].container_display_name.as_ref(), "Foo");
    assert_eq!(declarations[1].fully_qualified_container_name.as_ref(), "Acme.Foo");
    assert_eq!(declarations[1].parameter_count, 1);
    Ok(())
}

#[test]
fn unreadable_manifest_names_the_file() {
    let err = WorkspaceManifest::load(std::path::Path::new("/nonexistent/workspace.json")).unwrap_err();
    assert!(format!("{:#}", err).contains("workspace.json"));
}

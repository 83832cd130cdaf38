//! Check command - run a generation pass and report problems

use std::path::Path;

use canopy_generator::Site;
use color_eyre::eyre::{Result, bail};

/// Run the check command.
///
/// Parses every content file and fails if any document was left out. With `strict`,
/// warnings fail the check as well.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "checking content");

    let site = crate::generate(config_path)?;
    report(&site);
    verdict(&site, strict)?;

    println!();
    println!("✓ All checks passed");

    Ok(())
}

fn report(site: &Site) {
    println!("Summary:");
    println!("  Documents:  {}", site.documents.len());
    println!("  List pages: {}", site.list_pages.len());
    println!("  Errors:     {}", site.errors.len());
    println!("  Warnings:   {}", site.warnings.len());

    if !site.errors.is_empty() {
        println!();
        println!("Errors:");
        for err in &site.errors {
            match err.parser {
                Some(parser) => println!("  ✗ {err} [{parser}]"),
                None => println!("  ✗ {err}"),
            }
        }
    }

    if !site.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warn in &site.warnings {
            println!("  ⚠ {warn}");
        }
    }
}

fn verdict(site: &Site, strict: bool) -> Result<()> {
    if site.has_errors() {
        bail!("Check failed with {} error(s)", site.errors.len());
    }

    if strict && !site.warnings.is_empty() {
        bail!(
            "Check failed with {} warning(s) (strict mode)",
            site.warnings.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn site_with(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        for (name, body) in files {
            fs::write(content.join(name), body).unwrap();
        }
        dir
    }

    #[test]
    fn test_clean_site_passes() {
        let dir = site_with(&[("hello.md", "# Hello")]);
        run(&dir.path().join("canopy.toml"), true).unwrap();
    }

    #[test]
    fn test_errors_fail() {
        let dir = site_with(&[("hello.md", "# Hello"), ("photo.xyz", "?")]);
        let err = run(&dir.path().join("canopy.toml"), false).unwrap_err();
        assert!(err.to_string().contains("1 error"));
    }

    #[test]
    fn test_warnings_fail_only_when_strict() {
        let dir = site_with(&[("bad.md", "+++\ntitle = \n+++\nBody")]);
        let config = dir.path().join("canopy.toml");

        run(&config, false).unwrap();
        let err = run(&config, true).unwrap_err();
        assert!(err.to_string().contains("strict mode"));
    }
}

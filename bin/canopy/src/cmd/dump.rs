//! Dump command - write the render-ready content model as JSON

use std::{fs, path::Path};

use color_eyre::eyre::{Result, WrapErr};

/// Run the dump command.
///
/// Writes the site model to `output`, or to stdout when no path is given.
pub fn run(config_path: &Path, output: Option<&Path>) -> Result<()> {
    let site = crate::generate(config_path)?;
    let json = serde_json::to_string_pretty(&site).wrap_err("failed to serialize site")?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json).wrap_err_with(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote site model");
        }
        None => println!("{json}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content/posts");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("index.md"), "---\nlist: true\n---\n# Posts").unwrap();
        fs::write(content.join("first.md"), "---\ndate: 2024-01-01\n---\nFirst body.").unwrap();

        let output = dir.path().join("out/site.json");
        run(&dir.path().join("canopy.toml"), Some(&output)).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(json["documents"].as_array().unwrap().len(), 2);

        let page = &json["list_pages"][0];
        assert_eq!(page["index_url"], "/posts/");
        assert_eq!(page["sort"]["key"], "date");
        assert_eq!(page["sort"]["order"], "desc");
        assert_eq!(page["items"][0]["title"], "First");
        assert_eq!(page["items"][0]["excerpt"], "First body.");
    }
}

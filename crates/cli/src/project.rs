//! Writing generated tool modules to disk, either bare or inside a runnable
//! MCP server crate.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tera::{Context, Tera};
use thiserror::Error;
use toml_edit::Value;
use tracing::debug;

use toolforge_core::Generated;
use toolforge_core::openapi::ir::EmitOptions;

const CARGO_TEMPLATE: &str = include_str!("../templates/Cargo.toml.tera");
const MAIN_TEMPLATE: &str = include_str!("../templates/main.rs.tera");
const README_TEMPLATE: &str = include_str!("../templates/README.md.tera");

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("{} already exists, pass --force to overwrite it", path.display())]
    OutputExists { path: PathBuf },
    #[error("Failed to render {name}: {source}")]
    Template {
        name: &'static str,
        #[source]
        source: tera::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProjectError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Values shared by the scaffolding templates.
#[derive(Debug, Clone)]
pub struct ProjectMeta {
    pub namespace: String,
    pub base_url: Option<String>,
    /// Document origin, shown in the README
    pub source: String,
}

#[derive(Debug, Serialize)]
struct ToolRow<'a> {
    name: &'a str,
    method: &'a str,
    path: String,
}

/// Write only the generated module to `file`.
pub fn write_module(file: &Path, code: &str, force: bool) -> Result<PathBuf, ProjectError> {
    if file.exists() && !force {
        return Err(ProjectError::OutputExists {
            path: file.to_path_buf(),
        });
    }
    write_atomic(file, code)?;
    Ok(file.to_path_buf())
}

/// Scaffold an MCP server crate around the generated module in `dir`.
///
/// Returns the written files in a stable order.
pub fn write_project(
    dir: &Path,
    generated: &Generated,
    meta: &ProjectMeta,
    force: bool,
) -> Result<Vec<PathBuf>, ProjectError> {
    if !force && !is_empty_dir(dir)? {
        return Err(ProjectError::OutputExists {
            path: dir.to_path_buf(),
        });
    }

    let names = EmitOptions {
        namespace: meta.namespace.clone(),
        base_url: meta.base_url.clone(),
    };
    let tools: Vec<ToolRow<'_>> = generated
        .endpoints
        .iter()
        .map(|e| ToolRow {
            name: &e.tool_name,
            method: e.http_method.as_str(),
            path: markdown_cell(&e.path),
        })
        .collect();

    let mut context = Context::new();
    context.insert("crate_name", &crate_name(&meta.namespace));
    context.insert("namespace", &meta.namespace);
    let description = toml_string(&format!("MCP tools for the {} API", meta.namespace));
    context.insert("description", &description);
    context.insert("module", &names.module_name());
    context.insert("container", &names.container_name());
    context.insert("base_url", &meta.base_url);
    context.insert("source", &meta.source);
    context.insert("tools", &tools);

    let files = [
        ("Cargo.toml", render("Cargo.toml", CARGO_TEMPLATE, &context)?),
        ("src/main.rs", render("src/main.rs", MAIN_TEMPLATE, &context)?),
        ("src/tools.rs", generated.code.clone()),
        ("README.md", render("README.md", README_TEMPLATE, &context)?),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (relative, contents) in files {
        let path = dir.join(relative);
        write_atomic(&path, &contents)?;
        written.push(path);
    }
    Ok(written)
}

fn render(name: &'static str, template: &str, context: &Context) -> Result<String, ProjectError> {
    Tera::one_off(template, context, false)
        .map_err(|source| ProjectError::Template { name, source })
}

/// Quoted TOML string for `text`.
fn toml_string(text: &str) -> String {
    let mut value = Value::from(text);
    value.decor_mut().clear();
    value.to_string()
}

/// Escape `|` so the text stays inside one Markdown table cell.
fn markdown_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Package name for a namespace: lowercase words joined by `-`.
pub fn crate_name(namespace: &str) -> String {
    let words: Vec<String> = namespace
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_ascii_lowercase())
        .collect();
    let name = format!("{}-mcp", words.join("-"));
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("mcp-{name}")
    } else {
        name
    }
}

fn is_empty_dir(dir: &Path) -> Result<bool, ProjectError> {
    if !dir.exists() {
        return Ok(true);
    }
    if !dir.is_dir() {
        return Ok(false);
    }
    let mut entries = fs::read_dir(dir).map_err(ProjectError::io(dir))?;
    Ok(entries.next().is_none())
}

/// Write through a temporary file in the target directory, then rename over
/// the destination.
fn write_atomic(path: &Path, contents: &str) -> Result<(), ProjectError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(ProjectError::io(parent))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(ProjectError::io(path))?;
    temp.write_all(contents.as_bytes())
        .map_err(ProjectError::io(path))?;
    temp.persist(path)
        .map_err(|err| ProjectError::io(path)(err.error))?;

    debug!(path = %path.display(), bytes = contents.len(), "Wrote file.");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use toolforge_core::{GenerateOptions, generate};

    const DOC: &str = r#"{
        "paths": {
            "/users/{id}": {
                "get": {
                    "summary": "Get a user",
                    "parameters": [{ "name": "id", "in": "path", "required": true }],
                    "responses": { "200": { "description": "ok" } }
                }
            },
            "/users": {
                "post": { "summary": "Create a user", "responses": { "201": { "description": "ok" } } }
            }
        }
    }"#;

    fn generated(base_url: Option<&str>) -> Generated {
        let options = GenerateOptions::new("Pet Store", base_url).unwrap();
        generate(DOC, &options).unwrap()
    }

    fn meta(base_url: Option<&str>) -> ProjectMeta {
        ProjectMeta {
            namespace: "Pet Store".into(),
            base_url: base_url.map(String::from),
            source: "petstore.json".into(),
        }
    }

    #[test]
    fn test_crate_name() {
        assert_eq!(crate_name("Pet Store"), "pet-store-mcp");
        assert_eq!(crate_name("github_api"), "github-api-mcp");
        assert_eq!(crate_name("3d-printer"), "mcp-3d-printer-mcp");
    }

    #[test]
    fn test_write_project() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("petstore");
        let base_url = Some("https://api.example.com");

        let written = write_project(&dir, &generated(base_url), &meta(base_url), false).unwrap();
        assert_eq!(
            written,
            vec![
                dir.join("Cargo.toml"),
                dir.join("src/main.rs"),
                dir.join("src/tools.rs"),
                dir.join("README.md"),
            ]
        );

        let cargo = fs::read_to_string(dir.join("Cargo.toml")).unwrap();
        assert!(cargo.contains("name = \"pet-store-mcp\""));
        assert!(cargo.contains("rmcp = "));

        let main = fs::read_to_string(dir.join("src/main.rs")).unwrap();
        assert!(main.contains("use tools::pet_store::PetStoreTools;"));
        assert!(main.contains("PetStoreTools::new().serve(stdio())"));

        let tools = fs::read_to_string(dir.join("src/tools.rs")).unwrap();
        assert_eq!(tools, generated(base_url).code);

        let readme = fs::read_to_string(dir.join("README.md")).unwrap();
        assert!(readme.contains("| `GetUserById` | GET | `/users/{id}` |"));
        assert!(readme.contains("| `CreateUser` | POST | `/users` |"));
        assert!(readme.contains("Requests go to `https://api.example.com`."));
    }

    #[test]
    fn test_templates_escape_document_values() {
        let doc = r#"{ "paths": { "/search/{a}|{b}": { "get": { "operationId": "Search" } } } }"#;
        let namespace = r#"Acme "Beta" \ Tools"#;
        let generated = generate(doc, &GenerateOptions::new(namespace, None).unwrap()).unwrap();
        let meta = ProjectMeta {
            namespace: namespace.into(),
            base_url: None,
            source: "acme.json".into(),
        };

        let temp = tempfile::tempdir().unwrap();
        write_project(temp.path(), &generated, &meta, false).unwrap();

        let cargo = fs::read_to_string(temp.path().join("Cargo.toml")).unwrap();
        let manifest: toml_edit::DocumentMut = cargo.parse().unwrap();
        assert_eq!(
            manifest["package"]["description"].as_str(),
            Some(r#"MCP tools for the Acme "Beta" \ Tools API"#)
        );
        assert_eq!(manifest["package"]["name"].as_str(), Some("acme-beta-tools-mcp"));

        let readme = fs::read_to_string(temp.path().join("README.md")).unwrap();
        assert!(readme.contains("| `Search` | GET | `/search/{a}\\|{b}` |"));
    }

    #[test]
    fn test_readme_without_base_url() {
        let temp = tempfile::tempdir().unwrap();
        write_project(temp.path(), &generated(None), &meta(None), false).unwrap();

        let readme = fs::read_to_string(temp.path().join("README.md")).unwrap();
        assert!(readme.contains("No base URL was given."));
    }

    #[test]
    fn test_refuses_non_empty_directory() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("keep.txt"), "keep").unwrap();

        let err = write_project(temp.path(), &generated(None), &meta(None), false).unwrap_err();
        assert!(matches!(err, ProjectError::OutputExists { .. }));
        assert!(!temp.path().join("Cargo.toml").exists());

        write_project(temp.path(), &generated(None), &meta(None), true).unwrap();
        assert!(temp.path().join("Cargo.toml").exists());
        assert!(temp.path().join("keep.txt").exists());
    }

    #[test]
    fn test_write_module() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("out/tools.rs");

        write_module(&file, "pub mod a {}\n", false).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "pub mod a {}\n");

        let err = write_module(&file, "pub mod b {}\n", false).unwrap_err();
        assert!(matches!(err, ProjectError::OutputExists { .. }));
        assert_eq!(fs::read_to_string(&file).unwrap(), "pub mod a {}\n");

        write_module(&file, "pub mod b {}\n", true).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "pub mod b {}\n");
    }
}

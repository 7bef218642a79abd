use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One seller account as declared in `projects.yaml`.
///
/// The key itself never lives in the file, only the name of the environment
/// variable that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub api_key_env: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectsFile {
    pub projects: Vec<ProjectConfig>,
}

/// A project with its API key resolved. Immutable for the whole run.
#[derive(Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub api_key: String,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("name", &self.name)
            .field("api_key", &"[redacted]")
            .finish()
    }
}

/// Load the projects file and resolve every API key from the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, fails validation,
/// or if not a single project has its key variable set.
pub fn load_projects(path: &Path) -> Result<Vec<Project>, ConfigError> {
    let file = load_projects_file(path)?;
    resolve_projects(&file, |key| std::env::var(key))
}

/// Read and validate `projects.yaml` without touching the environment.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_projects_file(path: &Path) -> Result<ProjectsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProjectsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: ProjectsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::ProjectsFileParse)?;

    validate_projects(&file)?;

    Ok(file)
}

/// Resolve API keys through `lookup`, preserving file order.
///
/// A project whose variable is unset or blank is skipped with a warning so one
/// missing credential does not block the other accounts.
///
/// # Errors
///
/// Returns [`ConfigError::NoProjects`] when no project ends up with a key.
pub fn resolve_projects<F>(file: &ProjectsFile, lookup: F) -> Result<Vec<Project>, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let mut resolved = Vec::with_capacity(file.projects.len());

    for project in &file.projects {
        match lookup(&project.api_key_env) {
            Ok(key) if !key.trim().is_empty() => resolved.push(Project {
                name: project.name.clone(),
                api_key: key.trim().to_string(),
            }),
            _ => {
                tracing::warn!(
                    project = %project.name,
                    var = %project.api_key_env,
                    "skipping project: API key variable is not set"
                );
            }
        }
    }

    if resolved.is_empty() {
        return Err(ConfigError::NoProjects {
            configured: file.projects.len(),
        });
    }

    Ok(resolved)
}

fn validate_projects(file: &ProjectsFile) -> Result<(), ConfigError> {
    if file.projects.is_empty() {
        return Err(ConfigError::Validation(
            "projects file must list at least one project".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();

    for project in &file.projects {
        if project.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "project name must be non-empty".to_string(),
            ));
        }

        if project.api_key_env.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "project '{}' has an empty api_key_env",
                project.name
            )));
        }

        if !seen_names.insert(project.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate project name: '{}'",
                project.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "projects_test.rs"]
mod tests;

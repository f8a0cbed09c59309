//! Application context and state management.
//!
//! This module provides the [`AppContext`] type which holds the state shared
//! by every command: resolved paths, the loaded [`Settings`] and the schema
//! store. It is built once in `main` and passed down explicitly.

use std::path::{Path, PathBuf};

use crate::{
    config::Settings,
    scaffold::Scaffolder,
    schema::store::SchemaStore,
    utils::Command,
};

/// Path configuration grouping all path-related fields.
#[derive(Debug, Default, Clone)]
pub struct PathConfig {
    /// Workspace root directory.
    pub workspace: PathBuf,
    /// Schema store root.
    pub schemas_root: PathBuf,
    /// Root of the consuming app.
    pub app_root: PathBuf,
}

impl PathConfig {
    /// Resolves the configured paths against `workspace`.
    pub fn resolve(workspace: &Path, settings: &Settings) -> Self {
        let abs = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                workspace.join(p)
            }
        };
        Self {
            workspace: workspace.to_path_buf(),
            schemas_root: abs(&settings.paths.schemas_root),
            app_root: abs(&settings.paths.app_root),
        }
    }
}

/// The main application context holding all state.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved directories.
    pub paths: PathConfig,
    /// Loaded configuration.
    pub settings: Settings,
    /// Whether debug output is enabled.
    pub debug: bool,
    store: SchemaStore,
}

impl AppContext {
    pub fn new(workspace: &Path, settings: Settings, debug: bool) -> Self {
        let paths = PathConfig::resolve(workspace, &settings);
        let store = SchemaStore::new(&paths.schemas_root);
        Self {
            paths,
            settings,
            debug,
            store,
        }
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    /// Scaffolder writing into the app root.
    pub fn scaffolder(&self) -> Scaffolder<'_> {
        Scaffolder::new(
            &self.paths.app_root,
            &self.store,
            &self.settings.registry.extra_components,
        )
    }

    /// Creates a new command builder for the given program.
    ///
    /// The command runs in the app root with `${workspaceFolder}` substitution.
    pub fn command(&self, program: &str) -> Command {
        let workspace = self.paths.workspace.clone();
        Command::new(program, &self.paths.app_root, move |s| {
            value_replace_with_var(&workspace, s)
        })
    }

    /// A platform shell running `cmd`.
    pub fn shell_command(&self, cmd: &str) -> Command {
        let mut command = match std::env::consts::OS {
            "windows" => {
                let mut command = self.command("powershell");
                command.arg("-Command");
                command
            }
            _ => {
                let mut command = self.command("sh");
                command.arg("-c");
                command
            }
        };
        command.arg(cmd);
        command
    }
}

/// Replaces `${workspaceFolder}` with the workspace directory path.
pub fn value_replace_with_var<S>(workspace: &Path, value: S) -> String
where
    S: AsRef<std::ffi::OsStr>,
{
    let raw = value.as_ref().to_string_lossy();
    raw.replace(
        "${workspaceFolder}",
        format!("{}", workspace.display()).as_ref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_resolve_against_workspace() {
        let mut settings = Settings::default();
        settings.paths.app_root = PathBuf::from("/abs/app");
        let ctx = AppContext::new(Path::new("/ws"), settings, false);
        assert_eq!(
            ctx.paths.schemas_root,
            PathBuf::from("/ws/schema-generator/schemas/storyblok")
        );
        assert_eq!(ctx.paths.app_root, PathBuf::from("/abs/app"));
        assert_eq!(ctx.store().root(), ctx.paths.schemas_root.as_path());
    }

    #[test]
    fn test_workspace_folder_substitution() {
        assert_eq!(
            value_replace_with_var(Path::new("/ws"), "${workspaceFolder}/out"),
            "/ws/out"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_command_runs_in_app_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.paths.app_root = dir.path().to_path_buf();
        let ctx = AppContext::new(Path::new("/ws"), settings, false);

        let out = ctx
            .shell_command("echo ${workspaceFolder}; pwd")
            .capture()
            .unwrap();
        assert!(out.status.success());
        let stdout = String::from_utf8_lossy(&out.stdout);
        let mut lines = stdout.lines();
        assert_eq!(lines.next(), Some("/ws"));
        let cwd = std::fs::canonicalize(lines.next().unwrap()).unwrap();
        assert_eq!(cwd, std::fs::canonicalize(dir.path()).unwrap());
    }
}

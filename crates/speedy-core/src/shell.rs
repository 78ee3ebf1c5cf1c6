//! Default [`Shell`]: hands paths to the desktop's opener.

use crate::engine::{BoxFuture, Shell};
use crate::{Error, Result};
use futures_util::FutureExt;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
enum Opener {
    /// Desktop default handler via the `open` crate
    #[default]
    System,
    /// `program args.. <path>`
    Command { program: String, args: Vec<String> },
}

/// Opens and launches through external programs.
///
/// Handlers are started detached; an activation resolves once the handler
/// has been spawned, not when it exits. Child output is discarded so it
/// cannot draw over the terminal UI.
#[derive(Debug, Clone, Default)]
pub struct SystemShell {
    opener: Opener,
}

impl SystemShell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `program args.. <path>` instead of the desktop opener.
    pub fn with_opener<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            opener: Opener::Command {
                program: program.into(),
                args: args.into_iter().map(Into::into).collect(),
            },
        }
    }

    fn open_path(&self, path: &str) -> Result<()> {
        match &self.opener {
            Opener::System => open::that_detached(path).map_err(|source| Error::Spawn {
                program: "open".to_string(),
                source,
            }),
            Opener::Command { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args).arg(path);
                spawn_detached(cmd, program)
            }
        }
    }
}

impl Shell for SystemShell {
    fn open(&self, path: String) -> BoxFuture<'static, Result<()>> {
        let shell = self.clone();
        async move {
            ensure_exists(&path)?;
            info!("Opening {}", path);
            shell.open_path(&path)
        }
        .boxed()
    }

    fn launch(&self, path: String) -> BoxFuture<'static, Result<()>> {
        let shell = self.clone();
        async move {
            ensure_exists(&path)?;
            info!("Launching {}", path);
            if is_desktop_file(&path) {
                let mut cmd = Command::new("gio");
                cmd.arg("launch").arg(&path);
                spawn_detached(cmd, "gio")
            } else {
                shell.open_path(&path)
            }
        }
        .boxed()
    }
}

fn ensure_exists(path: &str) -> Result<()> {
    if Path::new(path).exists() {
        Ok(())
    } else {
        Err(Error::NotFound(path.to_string()))
    }
}

fn is_desktop_file(path: &str) -> bool {
    cfg!(not(any(target_os = "windows", target_os = "macos")))
        && Path::new(path)
            .extension()
            .is_some_and(|ext| ext == "desktop")
}

/// Start `cmd` without waiting for it to exit.
fn spawn_detached(mut cmd: Command, program: &str) -> Result<()> {
    let child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;

    debug!("Started {} (pid {:?})", program, child.id());
    Ok(())
}

//! Append-only journal of issued exchange commands.

use anyhow::{Context, Result};
use chrono::Local;
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Durable log of commands, one line per record: `<timestamp>: <command>`.
#[derive(Clone)]
pub struct CommandJournal {
    file: Arc<Mutex<File>>,
    path: PathBuf,
}

impl CommandJournal {
    pub async fn open(path: PathBuf) -> Result<Self> {
        ensure_parent_dir(&path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("opening command journal {}", path.display()))?;
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one command record.
    ///
    /// The whole line is written with a single `write_all` under the lock, so
    /// records from concurrent callers never interleave. Write failures are
    /// logged and swallowed; journaling must not affect the command result.
    pub async fn record(&self, command: &str) {
        let line = format!("{}: {}\n", Local::now().format("%Y-%m-%d %H:%M:%S%.6f"), command);
        let mut file = self.file.lock().await;
        if let Err(err) = file.write_all(line.as_bytes()).await {
            warn!(
                "failed to append to command journal {}: {}",
                self.path.display(),
                err
            );
        }
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating journal directory {}", parent.display()))?;
    }
    Ok(())
}

//! The background refinement pipeline.
//!
//! A bounded FIFO queue feeds a single worker thread. The worker invokes
//! the external precise-pruning tool once per job and populates the style
//! store; it never runs two reductions concurrently and it never retries.
//! Failures are logged for the operator — requests never wait on this
//! pipeline, so nothing here surfaces to a caller.

use crate::config::CssCutConfig;
use crate::patterns::TOOL_COMMENT;
use crate::store::StyleStore;
use crate::types::{CachedStyle, ReductionJob};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::process::Command;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};

/// Store handle shared between request contexts and the worker. Reads run
/// concurrently; the single writer takes the lock exclusively.
pub type SharedStore = Arc<RwLock<Box<dyn StyleStore>>>;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to launch precise-pruning tool: {0}")]
    Launch(std::io::Error),
    #[error("precise-pruning tool exited with {status}; output:\n{output}")]
    ToolFailed {
        status: std::process::ExitStatus,
        output: String,
    },
}

/// Payload handed to the external tool via a temp file.
#[derive(Serialize)]
struct ToolPayload<'a> {
    paths: &'a [String],
    html: &'a str,
}

/// Start the refinement worker. It drains `jobs` serially until the sending
/// side is dropped.
pub fn spawn_worker(
    config: CssCutConfig,
    store: SharedStore,
    jobs: Receiver<ReductionJob>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        for job in jobs {
            process_job(&config, &store, job);
        }
    })
}

/// Run one job to a terminal state: stored, discarded or abandoned.
fn process_job(config: &CssCutConfig, store: &SharedStore, job: ReductionJob) {
    let key = job.fingerprint.to_hex();

    // Re-check the store: duplicate enqueues can race ahead of the worker.
    let cached = {
        let guard = store.read().unwrap_or_else(|e| e.into_inner());
        guard.get(&job.fingerprint)
    };
    match cached {
        Ok(Some(_)) => return, // discarded: already refined
        Ok(None) => {}
        Err(e) => {
            log::error!("store read failed for {}: {:#}", key, e);
            return;
        }
    }
    if job.stylesheet_paths.is_empty() {
        return; // discarded: nothing to reduce
    }

    match run_tool(config, &job) {
        Ok(css) => {
            let style = CachedStyle::new(css);
            let mut guard = store.write().unwrap_or_else(|e| e.into_inner());
            if let Err(e) = guard.put(&job.fingerprint, &style) {
                log::error!("store write failed for {}: {:#}", key, e);
            }
        }
        Err(e) => {
            // Abandoned: no retry; the fingerprint stays absent and future
            // requests keep using the approximate reduction.
            log::error!("refinement abandoned for {}: {:#}", key, e);
        }
    }
}

/// Invoke the external precise-pruning tool for one job.
///
/// The payload file is uniquely named and removed on every exit path,
/// including launch failure — `NamedTempFile` deletes on drop.
fn run_tool(config: &CssCutConfig, job: &ReductionJob) -> Result<String> {
    let payload = serde_json::to_vec(&ToolPayload {
        paths: &job.stylesheet_paths,
        html: &job.html,
    })?;

    let mut file = tempfile::Builder::new()
        .prefix("csscut_job_")
        .suffix(".json")
        .tempfile_in(&config.tmp_dir)?;
    file.write_all(&payload)?;
    file.flush()?;

    let output = Command::new(&config.tool_command)
        .arg(&config.tool_script)
        .arg(file.path())
        .output()
        .map_err(PipelineError::Launch)?;

    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(PipelineError::ToolFailed {
            status: output.status,
            output: combined,
        }
        .into());
    }

    let css = String::from_utf8_lossy(&output.stdout);
    Ok(TOOL_COMMENT.replace_all(&css, "").into_owned())
}

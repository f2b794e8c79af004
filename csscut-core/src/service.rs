//! The request-facing service object.
//!
//! `CssCut` owns the store handle, the refinement queue and the
//! configuration; construct it once and pass it by reference to every
//! request context. Per request: fingerprint → store lookup → cached CSS on
//! a hit, or enqueue-and-fast-cut on a miss → inject.

use crate::config::CssCutConfig;
use crate::extract;
use crate::fingerprint::page_fingerprint;
use crate::inject::inject_style;
use crate::pipeline::{self, SharedStore};
use crate::reducer;
use crate::store::{FileStore, StyleStore};
use crate::types::ReductionJob;
use anyhow::Result;
use std::sync::mpsc::{self, SyncSender};
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;

pub struct CssCut {
    config: CssCutConfig,
    store: SharedStore,
    jobs: SyncSender<ReductionJob>,
    worker: Option<JoinHandle<()>>,
}

impl CssCut {
    /// Open the configured file store and start the service.
    pub fn open(config: CssCutConfig) -> Result<Self> {
        let store = FileStore::open(&config.store_path, config.clean_on_start)?;
        Self::with_store(config, Box::new(store))
    }

    /// Create the service with an injected store implementation.
    pub fn with_store(config: CssCutConfig, store: Box<dyn StyleStore>) -> Result<Self> {
        let store: SharedStore = Arc::new(RwLock::new(store));
        let (jobs, queue) = mpsc::sync_channel(config.queue_capacity);
        let worker = pipeline::spawn_worker(config.clone(), Arc::clone(&store), queue);

        Ok(Self {
            config,
            store,
            jobs,
            worker: Some(worker),
        })
    }

    /// Reduce the page's CSS and inline it: the top-level entry point.
    ///
    /// Stylesheet read errors abort the call before any injection.
    pub fn cut_and_inject(&self, html: &str) -> Result<String> {
        let css = self.get_cut_css(html)?;
        Ok(inject_style(html, &css))
    }

    /// Produce the reduced CSS for a page: cached precise reduction on a
    /// fingerprint hit, approximate reduction (plus a queued refinement
    /// job) on a miss.
    pub fn get_cut_css(&self, html: &str) -> Result<String> {
        let paths = extract::stylesheet_paths(html, &self.config.www_root);
        let fingerprint = page_fingerprint(html);

        // Store errors other than a miss degrade to a miss: the request is
        // served by the approximate engine while the operator gets the log.
        let cached = {
            let guard = self.store.read().unwrap_or_else(|e| e.into_inner());
            match guard.get(&fingerprint) {
                Ok(entry) => entry,
                Err(e) => {
                    log::error!("store read failed for {}: {:#}", fingerprint.to_hex(), e);
                    None
                }
            }
        };
        if let Some(style) = cached {
            return Ok(style.css);
        }

        // Queue a precise reduction for this page structure. Blocks when
        // the queue is full — deliberate backpressure, no drop policy.
        let job = ReductionJob {
            fingerprint,
            html: html.to_string(),
            stylesheet_paths: paths.clone(),
        };
        if let Err(e) = self.jobs.send(job) {
            log::error!("refinement queue closed: {}", e);
        }

        let css = extract::read_stylesheets(&paths)?;
        Ok(reducer::fast_cut(html, &css))
    }

    /// Close the queue and wait for the worker to drain it.
    ///
    /// Lets short-lived hosts (the CLI) see their refinement land in the
    /// store before exiting. A long-lived server never needs to call this.
    pub fn shutdown(mut self) {
        let worker = self.worker.take();
        drop(self);
        if let Some(handle) = worker {
            let _ = handle.join();
        }
    }
}

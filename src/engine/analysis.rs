//! Background analysis of the tapped mix.
//!
//! Runs on its own thread, draining the ring the renderer pushes tap samples
//! into. Snapshots are published through `ArcSwap`: the most recent value
//! wins, and readers never block the analysis thread or each other.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use arc_swap::ArcSwap;
use rtrb::Consumer;
use tracing::debug;

use crate::{
    config::AnalyserConfig,
    dsp::analyser::{AnalysisSnapshot, Analyser},
    error::{EngineError, Result},
};

/// Samples drained from the ring per pass.
const DRAIN_CHUNK: usize = 1024;

/// Shared state between the analysis thread and its handles.
struct AnalysisState {
    latest: ArcSwap<AnalysisSnapshot>,
    running: AtomicBool,
}

impl AnalysisState {
    fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Read side of the analysis: cheap to clone, safe to poll from any thread.
#[derive(Clone)]
pub struct SnapshotHandle {
    state: Arc<AnalysisState>,
}

impl SnapshotHandle {
    /// The freshest published snapshot.
    pub fn load(&self) -> Arc<AnalysisSnapshot> {
        self.state.latest.load_full()
    }
}

pub struct AnalysisWorker {
    state: Arc<AnalysisState>,
    thread: Option<JoinHandle<()>>,
}

impl AnalysisWorker {
    pub fn spawn(tap: Consumer<f32>, config: AnalyserConfig) -> Result<Self> {
        let state = Arc::new(AnalysisState {
            latest: ArcSwap::from_pointee(AnalysisSnapshot::silent(config.fft_size)),
            running: AtomicBool::new(true),
        });

        let thread = thread::Builder::new()
            .name("aurora-analysis".into())
            .spawn({
                let state = Arc::clone(&state);
                move || run_analysis_thread(tap, state, config)
            })
            .map_err(|err| {
                EngineError::UnsupportedEnvironment(format!("failed to spawn analysis thread: {err}"))
            })?;

        Ok(Self {
            state,
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> SnapshotHandle {
        SnapshotHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        self.state.stop();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Drain the tap and publish a snapshot every half window.
fn run_analysis_thread(mut tap: Consumer<f32>, state: Arc<AnalysisState>, config: AnalyserConfig) {
    let mut analyser = Analyser::new(config);
    let hop = (config.fft_size / 2).max(1);
    let mut since_publish = 0usize;
    let mut drain_buf = vec![0.0f32; DRAIN_CHUNK];

    debug!(fft_size = config.fft_size, hop, "analysis thread started");

    while state.is_running() {
        let mut read = 0;
        while read < drain_buf.len() {
            match tap.pop() {
                Ok(sample) => {
                    drain_buf[read] = sample;
                    read += 1;
                }
                Err(_) => break,
            }
        }

        if read == 0 {
            if tap.is_abandoned() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
            continue;
        }

        analyser.push_samples(&drain_buf[..read]);
        since_publish += read;
        if since_publish >= hop {
            since_publish %= hop;
            state.latest.store(Arc::new(analyser.analyse()));
        }
    }

    debug!("analysis thread stopped");
}

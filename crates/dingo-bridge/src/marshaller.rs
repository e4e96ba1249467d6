// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Thread marshaller. Every handler body and every callback delivery runs on
// one designated host thread.
//
// The engine may call in on any thread. Work is posted to an unbounded FIFO
// queue drained by a single named worker, so units submitted from the same
// thread run in submission order. Units from different threads interleave in
// arrival order. Nothing here blocks on the engine, and nothing is ever
// cancelled once queued.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread::{JoinHandle, ThreadId};

use dingo_core::error::{BridgeError, Result};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

/// A unit of work for the host thread.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Work),
    Stop,
}

/// Owner of the host thread. Dropping it stops the worker after the
/// already-queued work has run.
pub struct HostThread {
    handle: HostHandle,
    join: Option<JoinHandle<()>>,
}

impl HostThread {
    /// Start the worker thread.
    pub fn spawn(name: &str) -> Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

        let join = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                debug!("host thread running");
                while let Some(message) = rx.blocking_recv() {
                    match message {
                        Message::Run(work) => {
                            if let Err(panic) = catch_unwind(AssertUnwindSafe(work)) {
                                error!(reason = panic_reason(&*panic), "unit of work panicked");
                            }
                        }
                        Message::Stop => break,
                    }
                }
                debug!("host thread exiting");
            })?;

        info!(thread = name, "host thread started");
        let thread_id = join.thread().id();
        Ok(Self {
            handle: HostHandle { tx, thread_id },
            join: Some(join),
        })
    }

    /// A handle for scheduling work; pass clones to every component.
    pub fn handle(&self) -> HostHandle {
        self.handle.clone()
    }

    /// Run everything queued so far, then stop the worker and join it.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop_and_join()
    }

    fn stop_and_join(&mut self) -> Result<()> {
        let Some(join) = self.join.take() else {
            return Ok(());
        };
        // The worker may already be gone; joining still reports its fate.
        let _ = self.handle.tx.send(Message::Stop);
        if self.handle.is_host_thread() {
            // Joining ourselves would deadlock; the loop ends on its own.
            return Ok(());
        }
        join.join()
            .map_err(|_| BridgeError::Programming("host thread panicked outside a unit of work".into()))?;
        info!("host thread stopped");
        Ok(())
    }
}

impl Drop for HostThread {
    fn drop(&mut self) {
        if let Err(e) = self.stop_and_join() {
            error!(error = %e, "host thread shutdown failed");
        }
    }
}

/// Cloneable handle to the host thread's queue.
#[derive(Clone)]
pub struct HostHandle {
    tx: mpsc::UnboundedSender<Message>,
    thread_id: ThreadId,
}

impl std::fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostHandle")
            .field("thread_id", &self.thread_id)
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl HostHandle {
    /// Queue `work` for the host thread. Never runs it inline, even when
    /// called from the host thread itself.
    pub fn schedule(&self, work: impl FnOnce() + Send + 'static) -> Result<()> {
        self.tx
            .send(Message::Run(Box::new(work)))
            .map_err(|_| BridgeError::HostThreadGone)
    }

    /// Whether the caller is running on the host thread.
    pub fn is_host_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Block until everything queued before this call has run.
    ///
    /// Must not be called from the host thread or from inside an async
    /// runtime.
    pub fn sync(&self) -> Result<()> {
        if self.is_host_thread() {
            return Err(BridgeError::Programming(
                "HostHandle::sync called on the host thread".into(),
            ));
        }
        let (done_tx, done_rx) = oneshot::channel();
        self.schedule(move || {
            let _ = done_tx.send(());
        })?;
        done_rx.blocking_recv().map_err(|_| BridgeError::HostThreadGone)
    }
}

fn panic_reason(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown"
    }
}

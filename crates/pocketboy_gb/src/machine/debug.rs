use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

/// How often a parked [`DebugLink::wait`] looks at the stop flag.
const STOP_POLL: Duration = Duration::from_millis(20);

/// What a debugger asks the emulation loop to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugRequest {
    /// Run exactly one step.
    Next,
    /// Leave the loop.
    Stop,
}

/// What ended a [`DebugLink::wait`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    Request(DebugRequest),
    /// The stop flag was raised while no request was pending.
    Cancelled,
    /// The client is gone.
    Closed,
}

/// Debugger side of the step handshake. Each call blocks until the loop has
/// acted on the request.
#[derive(Debug)]
pub struct DebugClient {
    requests: Sender<DebugRequest>,
    acks: Receiver<()>,
}

/// Loop side of the step handshake, installed with
/// [`Emulator::attach_debugger`](super::Emulator::attach_debugger).
#[derive(Debug)]
pub struct DebugLink {
    requests: Receiver<DebugRequest>,
    acks: Sender<()>,
}

pub fn debug_channel() -> (DebugClient, DebugLink) {
    let (request_tx, request_rx) = bounded(0);
    let (ack_tx, ack_rx) = bounded(1);
    (
        DebugClient {
            requests: request_tx,
            acks: ack_rx,
        },
        DebugLink {
            requests: request_rx,
            acks: ack_tx,
        },
    )
}

impl DebugClient {
    /// Advance one step. Returns false once the loop has gone away.
    pub fn next(&self) -> bool {
        self.send(DebugRequest::Next)
    }

    /// Ask the loop to finish. Returns false if it had already gone away.
    pub fn stop(&self) -> bool {
        self.send(DebugRequest::Stop)
    }

    fn send(&self, request: DebugRequest) -> bool {
        self.requests.send(request).is_ok() && self.acks.recv().is_ok()
    }
}

impl DebugLink {
    /// Block for the next request, giving up once `stop` is raised.
    pub fn wait(&self, stop: &AtomicBool) -> LinkEvent {
        loop {
            if stop.load(Ordering::Relaxed) {
                return LinkEvent::Cancelled;
            }
            match self.requests.recv_timeout(STOP_POLL) {
                Ok(request) => return LinkEvent::Request(request),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return LinkEvent::Closed,
            }
        }
    }

    pub fn acknowledge(&self) {
        let _ = self.acks.send(());
    }
}

//! Test doubles for the transport and observer contracts.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{
    ClientCallback, RegistrationListener, ServiceHandle, ServiceIdentity, SharedService,
    StrongRefCount,
};
use crate::error::NotifyError;

/// Binder node with a settable strong count.
#[derive(Debug)]
pub struct FakeBinder {
    remote: bool,
    count: AtomicUsize,
    unsupported: AtomicBool,
}

impl FakeBinder {
    pub fn remote(count: usize) -> Arc<Self> {
        Arc::new(Self {
            remote: true,
            count: AtomicUsize::new(count),
            unsupported: AtomicBool::new(false),
        })
    }

    pub fn local() -> Arc<Self> {
        Arc::new(Self {
            remote: false,
            count: AtomicUsize::new(0),
            unsupported: AtomicBool::new(false),
        })
    }

    pub fn set_count(&self, count: usize) {
        self.count.store(count, Ordering::SeqCst);
    }

    pub fn set_unsupported(&self) {
        self.unsupported.store(true, Ordering::SeqCst);
    }
}

impl ServiceHandle for FakeBinder {
    fn is_remote(&self) -> bool {
        self.remote
    }

    fn strong_ref_count(&self) -> StrongRefCount {
        if self.unsupported.load(Ordering::SeqCst) {
            StrongRefCount::Unsupported
        } else {
            StrongRefCount::Known(self.count.load(Ordering::SeqCst))
        }
    }
}

pub fn shared(binder: &Arc<FakeBinder>) -> SharedService {
    Arc::clone(binder) as SharedService
}

/// Listener recording every delivered `(identity, preexisting)` pair.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<(String, bool)>>,
    failing: AtomicBool,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let listener = Self::default();
        listener.failing.store(true, Ordering::SeqCst);
        Arc::new(listener)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<(String, bool)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl RegistrationListener for RecordingListener {
    fn on_registration_changed(
        &self,
        identity: &ServiceIdentity,
        preexisting: bool,
    ) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::DeadObject);
        }
        if let Ok(mut events) = self.events.lock() {
            events.push((identity.to_string(), preexisting));
        }
        Ok(())
    }
}

/// Client callback recording every delivered presence value.
#[derive(Debug, Default)]
pub struct RecordingCallback {
    values: Mutex<Vec<bool>>,
    failing: AtomicBool,
}

impl RecordingCallback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let callback = Self::default();
        callback.failing.store(true, Ordering::SeqCst);
        Arc::new(callback)
    }

    pub fn values(&self) -> Vec<bool> {
        self.values.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl ClientCallback for RecordingCallback {
    fn on_clients_changed(
        &self,
        _service: &SharedService,
        has_clients: bool,
    ) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Transport("broken pipe".to_string()));
        }
        if let Ok(mut values) = self.values.lock() {
            values.push(has_clients);
        }
        Ok(())
    }
}

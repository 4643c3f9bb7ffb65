use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::ComparisonError;
use crate::types::ExternalMatch;

/// A grammar and spelling checker reached outside this crate, such as a
/// LanguageTool server.
pub trait CorrectionService: Send + Sync {
    fn check(&self, text: &str) -> Result<Vec<ExternalMatch>, ComparisonError>;
}

type ServiceFactory =
    Box<dyn Fn() -> Result<Arc<dyn CorrectionService>, ComparisonError> + Send + Sync>;

/// Lazily constructed, process-wide correction service.
///
/// The factory runs at most once, even when many threads ask for the service
/// at the same time. A failed construction is kept: the handle then reports
/// the service as unavailable for the rest of its life.
pub struct ServiceHandle {
    factory: Option<ServiceFactory>,
    service: OnceLock<Option<Arc<dyn CorrectionService>>>,
}

impl ServiceHandle {
    pub fn lazy<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn CorrectionService>, ComparisonError> + Send + Sync + 'static,
    {
        Self {
            factory: Some(Box::new(factory)),
            service: OnceLock::new(),
        }
    }

    pub fn ready(service: Arc<dyn CorrectionService>) -> Self {
        Self {
            factory: None,
            service: OnceLock::from(Some(service)),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            factory: None,
            service: OnceLock::from(None),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.service.get().is_some()
    }

    pub fn get(&self) -> Option<Arc<dyn CorrectionService>> {
        self.service
            .get_or_init(|| {
                let factory = self.factory.as_ref()?;
                let started = Instant::now();
                match factory() {
                    Ok(service) => {
                        tracing::debug!(
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "correction service initialized"
                        );
                        Some(service)
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "correction service failed to initialize");
                        None
                    }
                }
            })
            .clone()
    }

    /// Runs one check on a worker thread and waits at most `timeout`.
    ///
    /// A check that overruns keeps running in the background; its result is
    /// discarded.
    pub fn check_with_timeout(
        &self,
        text: &str,
        timeout: Duration,
    ) -> Result<Vec<ExternalMatch>, ComparisonError> {
        let service = self
            .get()
            .ok_or_else(|| ComparisonError::service("unavailable", "service could not be initialized"))?;

        let (tx, rx) = mpsc::channel();
        let text = text.to_string();
        thread::Builder::new()
            .name("correction-service".to_string())
            .spawn(move || {
                let _ = tx.send(service.check(&text));
            })
            .map_err(|e| ComparisonError::service("worker spawn", e))?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                Err(ComparisonError::timeout(timeout.as_millis() as u64))
            }
            Err(RecvTimeoutError::Disconnected) => Err(ComparisonError::service(
                "worker",
                "check ended without a result",
            )),
        }
    }
}

impl fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.service.get() {
            None => "uninitialized",
            Some(Some(_)) => "available",
            Some(None) => "unavailable",
        };
        f.debug_struct("ServiceHandle").field("state", &state).finish()
    }
}

//! Shared context handed to every view: API handle, query cache, notifier.
//!
//! `publish` is the only path by which a mutation affects the cache.

use tracing::{info, warn};

use crate::cache::{ChangeEvent, QueryCache};
use crate::envelope::Ack;
use crate::error::ApiError;
use crate::notify::Notifier;
use crate::services::Api;
use crate::transport::Transport;

type Observer = Box<dyn FnMut(&ChangeEvent)>;

pub struct Session<T, N> {
    api: Api<T>,
    cache: QueryCache,
    notifier: N,
    observers: Vec<Observer>,
}

impl<T: Transport, N: Notifier> Session<T, N> {
    pub fn new(api: Api<T>, notifier: N) -> Self {
        Self {
            api,
            cache: QueryCache::new(),
            notifier,
            observers: Vec::new(),
        }
    }

    pub fn api(&self) -> &Api<T> {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub(crate) fn cache_mut(&mut self) -> &mut QueryCache {
        &mut self.cache
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Register an extra listener for change events. The cache always
    /// handles an event before any observer sees it.
    pub fn subscribe(&mut self, observer: impl FnMut(&ChangeEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn publish(&mut self, event: ChangeEvent) {
        info!(?event, "change published");
        self.cache.handle(&event);
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    /// Home-screen health check: the server's greeting on success, its
    /// message on failure.
    pub fn check_health(&mut self) -> Result<Ack, ApiError> {
        match self.api.global().init_api() {
            Ok(ack) => {
                self.announce(&ack.message);
                Ok(ack)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Surface a failed call to the user, verbatim.
    pub(crate) fn report(&mut self, err: &ApiError) {
        warn!(error = %err, "request failed");
        self.notifier.error(&err.to_string());
    }

    pub(crate) fn announce(&mut self, message: &str) {
        self.notifier.success(message);
    }
}

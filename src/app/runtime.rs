use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::app::{App, Effect, Msg};
use crate::error::CoreResult;
use crate::model::language::{LanguageKind, LanguageOptions};
use crate::model::state::AppState;
use crate::services::debounce::Debounced;
use crate::services::deepl::{status_is_auth_failure, TranslationApi};
use crate::services::fingerprint::key_fingerprint;
use crate::services::store::{KeyStore, API_KEY_ENTRY};

/// Runs the state machine: executes effects and collects their results.
///
/// Fetch tasks only ever talk back through `inbox`; the state itself is
/// touched on the caller's task alone.
pub struct Runtime {
    app: App,
    api: Arc<dyn TranslationApi>,
    store: KeyStore,
    query: Debounced<String>,
    stable: watch::Receiver<String>,
    inbox_tx: mpsc::UnboundedSender<Msg>,
    inbox_rx: mpsc::UnboundedReceiver<Msg>,
}

impl Runtime {
    pub fn new(api: Arc<dyn TranslationApi>, store: KeyStore, debounce: Duration) -> Self {
        let (query, stable) = Debounced::new(String::new(), debounce);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Runtime {
            app: App::new(),
            api,
            store,
            query,
            stable,
            inbox_tx,
            inbox_rx,
        }
    }

    pub fn state(&self) -> &AppState {
        self.app.state()
    }

    /// Picks up a previously persisted key and starts validating it.
    pub fn restore(&mut self) -> CoreResult<bool> {
        let Some(key) = self.store.get(API_KEY_ENTRY).map(str::to_string) else {
            return Ok(false);
        };

        debug!(key = %key_fingerprint(&key), "restoring persisted API key");
        self.dispatch(Msg::ApiKeyChanged(key))?;
        self.dispatch(Msg::ApiKeySubmitted)?;
        Ok(true)
    }

    pub fn dispatch(&mut self, msg: Msg) -> CoreResult<()> {
        let effects = self.app.update(msg)?;
        for effect in effects {
            self.run(effect);
        }
        Ok(())
    }

    /// Waits for the next fetch result or stabilized query.
    ///
    /// Cancel safe, so it can sit in a `select!` next to the input reader.
    pub async fn next_message(&mut self) -> Option<Msg> {
        tokio::select! {
            msg = self.inbox_rx.recv() => msg,
            changed = self.stable.changed() => match changed {
                Ok(()) => Some(Msg::QueryStabilized(self.stable.borrow_and_update().clone())),
                Err(_) => None,
            },
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::FetchLanguages { api_key } => {
                let api = Arc::clone(&self.api);
                let tx = self.inbox_tx.clone();

                tokio::spawn(async move {
                    let result = tokio::try_join!(
                        api.languages(&api_key, LanguageKind::Source),
                        api.languages(&api_key, LanguageKind::Target),
                    )
                    .map(|(source, target)| LanguageOptions { source, target });

                    if let Err(e) = &result {
                        if status_is_auth_failure(e) {
                            debug!(key = %key_fingerprint(&api_key), "key refused by API");
                        } else {
                            warn!(error = %e, "language list request failed");
                        }
                    }

                    let _ = tx.send(Msg::LanguagesLoaded { api_key, result });
                });
            }

            Effect::Debounce(text) => self.query.set(text),

            Effect::Translate {
                api_key,
                text,
                languages,
            } => {
                let api = Arc::clone(&self.api);
                let tx = self.inbox_tx.clone();

                tokio::spawn(async move {
                    let result = api.translate(&api_key, &text, &languages).await;
                    if let Err(e) = &result {
                        warn!(error = %e, "translation request failed");
                    }
                    let _ = tx.send(Msg::TranslationResolved(result));
                });
            }

            Effect::PersistApiKey(key) => {
                if let Err(e) = self.store.set(API_KEY_ENTRY, &key) {
                    warn!(path = %self.store.path().display(), error = %e, "failed to persist API key");
                }
            }

            Effect::ForgetApiKey => {
                if let Err(e) = self.store.remove(API_KEY_ENTRY) {
                    warn!(path = %self.store.path().display(), error = %e, "failed to remove API key");
                }
            }
        }
    }
}

//! Application state container
//!
//! Owns the session controller, the bookmark store and the proxy bridge, and
//! sequences the proxy readiness handshake before proxied navigations.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

use evadion_navigation::HistoryEntry;
use evadion_proxy::{PrefixBridge, ServiceRegistrar};
use evadion_session::{
    ActionOutcome, ContentFrame, ControllerOptions, ReconcileOutcome, SessionAction,
    SessionController, ViewRenderer,
};
use evadion_storage::{Database, KeyValueStore, MemoryStore};

use crate::bookmarks::{Bookmark, BookmarkStore};
use crate::config::Config;
use crate::Result;

pub struct Browser {
    config: Config,
    bridge: Arc<PrefixBridge>,
    registrar: Arc<dyn ServiceRegistrar>,
    session: Mutex<SessionController>,
    bookmarks: RwLock<BookmarkStore>,
}

impl Browser {
    /// Validate `config`, open the configured store and wire up the session.
    pub fn new(
        config: Config,
        frame: Box<dyn ContentFrame>,
        renderer: Box<dyn ViewRenderer>,
        registrar: Arc<dyn ServiceRegistrar>,
    ) -> Result<Self> {
        config.validate()?;

        let store: Arc<dyn KeyValueStore> = match &config.storage_path {
            Some(path) => Arc::new(Database::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        Ok(Self::with_store(config, store, frame, renderer, registrar))
    }

    pub fn with_store(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        frame: Box<dyn ContentFrame>,
        renderer: Box<dyn ViewRenderer>,
        registrar: Arc<dyn ServiceRegistrar>,
    ) -> Self {
        let bridge = Arc::new(PrefixBridge::with_xor(config.proxy.clone(), store.clone()));
        let options = ControllerOptions {
            classifier: config.classifier(),
            history: config.history,
            ..ControllerOptions::default()
        };
        let session = SessionController::new(store.clone(), bridge.clone(), frame, renderer, options);

        Self {
            config,
            bridge,
            registrar,
            session: Mutex::new(session),
            bookmarks: RwLock::new(BookmarkStore::new(store)),
        }
    }

    /// Startup: adopt cached proxy readiness, register the intermediary,
    /// then load bookmarks, history and the last session.
    ///
    /// Returns the number of restored tabs.
    pub async fn boot(&self) -> usize {
        self.bridge.restore_cached_readiness();
        self.bridge.ensure_ready(self.registrar.as_ref()).await;

        let bookmarks = self.bookmarks.write().load();
        let tabs = self.session.lock().restore();

        tracing::info!(
            tabs,
            bookmarks,
            proxy_ready = self.bridge.is_ready(),
            "Browser booted"
        );
        tabs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_proxy_ready(&self) -> bool {
        self.bridge.is_ready()
    }

    // === Session operations ===

    /// Open `url` (normalized) in a new tab. Returns the tab id.
    pub async fn open_tab(&self, url: &str) -> String {
        self.ensure_proxy().await;
        self.session.lock().create_tab(url)
    }

    /// New tab showing the home page.
    pub async fn new_tab(&self) -> String {
        self.open_tab(&self.config.home_url).await
    }

    /// Submit address bar input for the active tab.
    pub async fn go(&self, input: &str) -> bool {
        if self.session.lock().active_tab().is_none() {
            return false;
        }
        self.ensure_proxy().await;
        self.session.lock().navigate_input(input)
    }

    pub async fn dispatch(&self, action: SessionAction) -> ActionOutcome {
        if matches!(
            action,
            SessionAction::CreateTab { .. } | SessionAction::SubmitAddress { .. }
        ) {
            self.ensure_proxy().await;
        }
        self.session.lock().dispatch(action)
    }

    pub fn on_frame_load(&self) -> Option<ReconcileOutcome> {
        self.session.lock().reconcile_from_frame()
    }

    /// Close every tab and show the start page.
    pub fn go_home(&self) {
        self.session.lock().close_all();
    }

    /// Run `f` with exclusive access to the session.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut SessionController) -> R) -> R {
        f(&mut self.session.lock())
    }

    // === History operations ===

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.session.lock().history().entries().to_vec()
    }

    pub fn search_history(&self, query: &str) -> Vec<HistoryEntry> {
        self.session
            .lock()
            .history()
            .search(query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn remove_history_entry(&self, entry: &HistoryEntry) -> bool {
        self.session.lock().history_mut().remove(entry)
    }

    pub fn clear_history(&self) {
        self.session.lock().history_mut().clear();
    }

    pub fn export_history_json(&self) -> Result<String> {
        Ok(self.session.lock().history().export_json()?)
    }

    pub fn import_history_json(&self, text: &str) -> Result<usize> {
        Ok(self.session.lock().history_mut().import_json(text)?)
    }

    // === Bookmark operations ===

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.bookmarks.read().list().to_vec()
    }

    pub fn save_bookmark(
        &self,
        editing_id: Option<&str>,
        name: &str,
        url: &str,
        icon: &str,
    ) -> Option<Bookmark> {
        self.bookmarks.write().upsert(editing_id, name, url, icon)
    }

    pub fn remove_bookmark(&self, id: &str) -> bool {
        self.bookmarks.write().remove(id)
    }

    /// Open a bookmark in a new tab. `None` for unknown ids.
    pub async fn open_bookmark(&self, id: &str) -> Option<String> {
        let target = {
            let bookmarks = self.bookmarks.read();
            let bookmark = bookmarks.get(id)?;
            bookmark.target_url(&self.config.home_url).to_string()
        };
        Some(self.open_tab(&target).await)
    }

    pub fn export_bookmarks_json(&self) -> Result<String> {
        self.bookmarks.read().export_json()
    }

    pub fn import_bookmarks_json(&self, text: &str) -> Result<usize> {
        self.bookmarks.write().import_json(text)
    }

    async fn ensure_proxy(&self) -> bool {
        self.bridge.ensure_ready(self.registrar.as_ref()).await
    }
}

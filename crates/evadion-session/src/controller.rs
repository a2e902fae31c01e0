//! Session controller
//!
//! Owns the tab list and drives the frame and the view. Mutations follow the
//! same order everywhere: change state, persist, redraw, then load the frame
//! and record history. Storage failures are logged and otherwise ignored, so
//! no operation here is fatal.

use std::sync::Arc;

use evadion_navigation::{BrandIcons, HistoryLimits, HistoryManager, IconSet, InputClassifier};
use evadion_proxy::ProxyBridge;
use evadion_storage::KeyValueStore;
use evadion_tabs::{CloseOutcome, Tab, TabList, ViewMode};

use crate::action::{ActionOutcome, SessionAction};
use crate::frame::{ContentFrame, ViewRenderer};
use crate::reconcile::{self, ReconcileOutcome};
use crate::session::SessionSnapshot;

/// Loaded into the frame when no tab is open.
pub const BLANK_PAGE: &str = "about:blank";

#[derive(Clone)]
pub struct ControllerOptions {
    pub classifier: InputClassifier,
    pub icons: Arc<dyn IconSet>,
    pub history: HistoryLimits,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            classifier: InputClassifier::default(),
            icons: Arc::new(BrandIcons::new()),
            history: HistoryLimits::default(),
        }
    }
}

pub struct SessionController {
    tabs: TabList,
    view: ViewMode,
    /// Address last handed to the frame, after proxy rewriting
    last_target: Option<String>,
    store: Arc<dyn KeyValueStore>,
    bridge: Arc<dyn ProxyBridge>,
    frame: Box<dyn ContentFrame>,
    renderer: Box<dyn ViewRenderer>,
    history: HistoryManager,
    classifier: InputClassifier,
    icons: Arc<dyn IconSet>,
}

impl SessionController {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        bridge: Arc<dyn ProxyBridge>,
        frame: Box<dyn ContentFrame>,
        renderer: Box<dyn ViewRenderer>,
        options: ControllerOptions,
    ) -> Self {
        Self {
            tabs: TabList::new(),
            view: ViewMode::Home,
            last_target: None,
            history: HistoryManager::new(store.clone(), options.history),
            store,
            bridge,
            frame,
            renderer,
            classifier: options.classifier,
            icons: options.icons,
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        self.tabs.tabs()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.tabs.active_id()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.active()
    }

    pub fn dragging_id(&self) -> Option<&str> {
        self.tabs.dragging_id()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    pub fn last_target(&self) -> Option<&str> {
        self.last_target.as_deref()
    }

    pub fn classifier(&self) -> &InputClassifier {
        &self.classifier
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryManager {
        &mut self.history
    }

    /// Load history and the persisted session.
    ///
    /// Returns the number of restored tabs. A non-empty session enters the
    /// browser view and silently reloads the active tab.
    pub fn restore(&mut self) -> usize {
        self.history.load();

        let snapshot = SessionSnapshot::load(self.store.as_ref()).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Session unavailable, starting empty");
            SessionSnapshot::default()
        });

        if self.tabs.restore(snapshot.tabs, snapshot.active_id) {
            tracing::debug!("Active tab missing from session, using the first tab");
        }

        if self.tabs.is_empty() {
            return 0;
        }

        self.render();
        self.set_view(ViewMode::Browser);
        if let Some(url) = self.tabs.active().map(|t| t.url.clone()) {
            self.navigate_active(&url, true);
        }

        tracing::info!(
            tabs = self.tabs.len(),
            active_id = ?self.tabs.active_id(),
            "Restored session"
        );
        self.tabs.len()
    }

    /// Open a new active tab. Returns its id.
    pub fn create_tab(&mut self, url: &str) -> String {
        let url = self.classifier.normalize(url);
        let tab = Tab::new(url.clone(), self.icons.as_ref());
        let id = tab.id.clone();

        self.tabs.push_active(tab);
        self.persist();
        self.render();
        self.navigate_active(&url, false);
        self.set_view(ViewMode::Browser);

        tracing::info!(tab_id = %id, url = %url, "Created tab");
        id
    }

    /// Close a tab. `None` for unknown ids.
    pub fn close_tab(&mut self, id: &str) -> Option<CloseOutcome> {
        let Some(outcome) = self.tabs.remove(id) else {
            tracing::debug!(tab_id = %id, "Close ignored, unknown tab");
            return None;
        };

        self.persist();
        self.render();

        match &outcome {
            CloseOutcome::Emptied => {
                self.load_frame_direct(BLANK_PAGE);
                self.set_view(ViewMode::Home);
            }
            CloseOutcome::ActivatedNeighbor { id: next } => {
                if let Some(url) = self.tabs.get(next).map(|t| t.url.clone()) {
                    self.navigate_active(&url, true);
                }
            }
            CloseOutcome::Background => {}
        }

        tracing::info!(tab_id = %id, remaining = self.tabs.len(), "Closed tab");
        Some(outcome)
    }

    pub fn set_active(&mut self, id: &str) -> bool {
        if let Err(e) = self.tabs.activate(id) {
            tracing::debug!(error = %e, "Activation ignored");
            return false;
        }

        self.persist();
        self.render();
        if let Some(url) = self.tabs.active().map(|t| t.url.clone()) {
            self.navigate_active(&url, true);
        }
        true
    }

    /// Move `from_id` to the position held by `to_id`.
    pub fn move_tab(&mut self, from_id: &str, to_id: &str) -> bool {
        match self.tabs.move_tab(from_id, to_id) {
            Ok(true) => {
                self.persist();
                self.render();
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::debug!(error = %e, "Move ignored");
                false
            }
        }
    }

    /// Point the active tab at `url` and load it.
    ///
    /// Silent navigation keeps the tab's current title, icons and favicon and
    /// leaves the address field alone. It is used when re-showing a known tab
    /// (activation, close, restore), where the stored label is still the best
    /// one; reconciliation refreshes it after the load. Returns `false`
    /// without an active tab.
    pub fn navigate_active(&mut self, url: &str, silent: bool) -> bool {
        let Some(tab) = self.tabs.active_mut() else {
            return false;
        };

        if silent {
            tab.url = url.to_string();
        } else {
            tab.relabel(url.to_string(), self.icons.as_ref());
        }
        let title = tab.title.clone();

        if !silent {
            self.renderer.set_address(url);
        }

        self.persist();
        self.render();
        self.load_frame(url);
        self.history.record(url, &title);
        true
    }

    /// Address bar submission for the active tab.
    pub fn navigate_input(&mut self, input: &str) -> bool {
        if self.tabs.active().is_none() {
            return false;
        }
        let url = self.classifier.normalize(input);
        self.navigate_active(&url, false)
    }

    /// Fold the frame's finished load back into the active tab.
    pub fn reconcile_from_frame(&mut self) -> Option<ReconcileOutcome> {
        let tab = self.tabs.active_mut()?;

        let address = reconcile::address_stage(
            tab,
            self.frame.as_ref(),
            self.bridge.as_ref(),
            self.icons.as_ref(),
        );
        let metadata = reconcile::metadata_stage(tab, self.frame.as_ref(), self.icons.as_ref());
        let (url, title) = (tab.url.clone(), tab.title.clone());

        let changed = address.changed() || metadata.changed();
        if changed {
            self.persist();
            self.render();
        } else {
            self.renderer.show_hint();
        }

        let history = self.history.record(&url, &title);
        Some(ReconcileOutcome {
            address,
            metadata,
            history,
        })
    }

    /// Drop every tab and return to the start page.
    pub fn close_all(&mut self) {
        let closed = self.tabs.len();
        self.tabs.clear();

        if let Err(e) = SessionSnapshot::clear(self.store.as_ref()) {
            tracing::debug!(error = %e, "Session record not removed");
        }

        self.render();
        self.load_frame_direct(BLANK_PAGE);
        self.set_view(ViewMode::Home);

        tracing::info!(closed, "Closed all tabs");
    }

    pub fn go_back(&mut self) {
        if let Err(e) = self.frame.go_back() {
            tracing::debug!(error = %e, "Back ignored");
        }
    }

    pub fn go_forward(&mut self) {
        if let Err(e) = self.frame.go_forward() {
            tracing::debug!(error = %e, "Forward ignored");
        }
    }

    /// Reload in place, or re-issue the last load when the frame refuses.
    pub fn reload(&mut self) {
        if let Err(e) = self.frame.reload() {
            tracing::debug!(error = %e, "Reload refused, reloading last target");
            if let Some(target) = self.last_target.clone() {
                self.frame.load(&target);
            }
        }
    }

    pub fn begin_drag(&mut self, id: &str) -> bool {
        self.tabs.begin_drag(id)
    }

    /// Drop the dragged tab onto `target_id`.
    pub fn drop_on(&mut self, target_id: &str) -> bool {
        match self.tabs.take_dragging() {
            Some(from) => self.move_tab(&from, target_id),
            None => false,
        }
    }

    pub fn end_drag(&mut self) {
        self.tabs.end_drag();
    }

    pub fn dispatch(&mut self, action: SessionAction) -> ActionOutcome {
        tracing::debug!(?action, "Dispatching session action");

        match action {
            SessionAction::CreateTab { url } => ActionOutcome::Created {
                id: self.create_tab(&url),
            },
            SessionAction::CloseTab { id } => self
                .close_tab(&id)
                .map(ActionOutcome::Closed)
                .unwrap_or(ActionOutcome::Ignored),
            SessionAction::Activate { id } => {
                outcome_if(self.set_active(&id), ActionOutcome::Activated)
            }
            SessionAction::MoveTab { from, to } => {
                outcome_if(self.move_tab(&from, &to), ActionOutcome::Moved)
            }
            SessionAction::Navigate { url, silent } => {
                outcome_if(self.navigate_active(&url, silent), ActionOutcome::Navigated)
            }
            SessionAction::SubmitAddress { input } => {
                outcome_if(self.navigate_input(&input), ActionOutcome::Navigated)
            }
            SessionAction::FrameLoaded => self
                .reconcile_from_frame()
                .map(ActionOutcome::Reconciled)
                .unwrap_or(ActionOutcome::Ignored),
            SessionAction::CloseAll => {
                self.close_all();
                ActionOutcome::ClearedAll
            }
            SessionAction::Back => {
                self.go_back();
                ActionOutcome::FrameCommand
            }
            SessionAction::Forward => {
                self.go_forward();
                ActionOutcome::FrameCommand
            }
            SessionAction::Reload => {
                self.reload();
                ActionOutcome::FrameCommand
            }
            SessionAction::BeginDrag { id } => {
                outcome_if(self.begin_drag(&id), ActionOutcome::DragStarted)
            }
            SessionAction::DropOn { target } => {
                outcome_if(self.drop_on(&target), ActionOutcome::Moved)
            }
            SessionAction::EndDrag => {
                self.end_drag();
                ActionOutcome::DragEnded
            }
        }
    }

    fn persist(&self) {
        if let Err(e) = SessionSnapshot::capture(&self.tabs).save(self.store.as_ref()) {
            tracing::debug!(error = %e, "Session not persisted");
        }
    }

    fn render(&mut self) {
        self.renderer
            .render_tabs(self.tabs.tabs(), self.tabs.active_id());
    }

    fn set_view(&mut self, mode: ViewMode) {
        self.view = mode;
        self.renderer.set_view_mode(mode);
    }

    fn load_frame(&mut self, url: &str) {
        let target = self.bridge.prepare_for_load(url);
        self.load_frame_direct(&target);
    }

    fn load_frame_direct(&mut self, target: &str) {
        self.frame.load(target);
        self.last_target = Some(target.to_string());
    }
}

fn outcome_if(done: bool, outcome: ActionOutcome) -> ActionOutcome {
    if done {
        outcome
    } else {
        ActionOutcome::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameAccessError;
    use crate::frame::DocumentMeta;
    use crate::reconcile::{AddressStage, MetadataStage};
    use crate::session::SESSION_KEY;
    use evadion_navigation::{RecordOutcome, HISTORY_KEY};
    use evadion_proxy::{DirectBridge, PrefixBridge, ProxyConfig, READY_KEY};
    use evadion_storage::{MemoryStore, StorageError};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FrameState {
        loads: Vec<String>,
        /// `None` simulates a cross-origin location
        address: Option<String>,
        /// `None` simulates a cross-origin document
        metadata: Option<Option<DocumentMeta>>,
        history_blocked: bool,
        backs: usize,
        forwards: usize,
        reloads: usize,
    }

    struct RecordingFrame(Arc<Mutex<FrameState>>);

    impl ContentFrame for RecordingFrame {
        fn load(&mut self, target: &str) {
            let mut state = self.0.lock();
            state.loads.push(target.to_string());
            state.address = Some(target.to_string());
        }

        fn current_address(&self) -> Result<String, FrameAccessError> {
            self.0
                .lock()
                .address
                .clone()
                .ok_or_else(|| FrameAccessError("cross-origin".to_string()))
        }

        fn document_metadata(&self) -> Result<Option<DocumentMeta>, FrameAccessError> {
            self.0
                .lock()
                .metadata
                .clone()
                .ok_or_else(|| FrameAccessError("cross-origin".to_string()))
        }

        fn go_back(&mut self) -> Result<(), FrameAccessError> {
            let mut state = self.0.lock();
            if state.history_blocked {
                return Err(FrameAccessError("cross-origin".to_string()));
            }
            state.backs += 1;
            Ok(())
        }

        fn go_forward(&mut self) -> Result<(), FrameAccessError> {
            let mut state = self.0.lock();
            if state.history_blocked {
                return Err(FrameAccessError("cross-origin".to_string()));
            }
            state.forwards += 1;
            Ok(())
        }

        fn reload(&mut self) -> Result<(), FrameAccessError> {
            let mut state = self.0.lock();
            if state.history_blocked {
                return Err(FrameAccessError("cross-origin".to_string()));
            }
            state.reloads += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RenderState {
        renders: usize,
        tab_ids: Vec<String>,
        active_id: Option<String>,
        modes: Vec<ViewMode>,
        addresses: Vec<String>,
        hints: usize,
    }

    struct RecordingRenderer(Arc<Mutex<RenderState>>);

    impl ViewRenderer for RecordingRenderer {
        fn render_tabs(&mut self, tabs: &[Tab], active_id: Option<&str>) {
            let mut state = self.0.lock();
            state.renders += 1;
            state.tab_ids = tabs.iter().map(|t| t.id.clone()).collect();
            state.active_id = active_id.map(str::to_string);
        }

        fn set_view_mode(&mut self, mode: ViewMode) {
            self.0.lock().modes.push(mode);
        }

        fn set_address(&mut self, url: &str) {
            self.0.lock().addresses.push(url.to_string());
        }

        fn show_hint(&mut self) {
            self.0.lock().hints += 1;
        }
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> evadion_storage::Result<Option<String>> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> evadion_storage::Result<()> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn remove(&self, _key: &str) -> evadion_storage::Result<()> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }
    }

    struct Harness {
        controller: SessionController,
        frame: Arc<Mutex<FrameState>>,
        view: Arc<Mutex<RenderState>>,
        store: Arc<MemoryStore>,
    }

    fn harness_with(store: Arc<MemoryStore>, bridge: Arc<dyn ProxyBridge>) -> Harness {
        let frame = Arc::new(Mutex::new(FrameState::default()));
        let view = Arc::new(Mutex::new(RenderState::default()));
        let controller = SessionController::new(
            store.clone(),
            bridge,
            Box::new(RecordingFrame(frame.clone())),
            Box::new(RecordingRenderer(view.clone())),
            ControllerOptions::default(),
        );
        Harness {
            controller,
            frame,
            view,
            store,
        }
    }

    fn harness() -> Harness {
        harness_with(Arc::new(MemoryStore::new()), Arc::new(DirectBridge))
    }

    fn ids(controller: &SessionController) -> Vec<String> {
        controller.tabs().iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_create_tab_end_to_end() {
        let mut h = harness();
        let id = h.controller.create_tab("example.com");

        let tab = h.controller.active_tab().unwrap();
        assert_eq!(tab.id, id);
        assert_eq!(tab.url, "https://example.com");
        assert_eq!(tab.title, "example.com");
        assert_eq!(h.controller.view_mode(), ViewMode::Browser);
        assert_eq!(h.controller.history().entries().len(), 1);
        assert_eq!(h.controller.history().entries()[0].url, "https://example.com");

        assert_eq!(h.frame.lock().loads, vec!["https://example.com".to_string()]);
        assert_eq!(h.view.lock().modes, vec![ViewMode::Browser]);
        assert_eq!(h.view.lock().addresses, vec!["https://example.com".to_string()]);
        assert!(h.store.get(SESSION_KEY).unwrap().unwrap().contains(&id));
        assert!(h.store.get(HISTORY_KEY).unwrap().is_some());
    }

    #[test]
    fn test_create_keeps_single_active() {
        let mut h = harness();
        h.controller.create_tab("a.com");
        h.controller.create_tab("b.com");
        let third = h.controller.create_tab("games.html");

        assert_eq!(h.controller.tabs().len(), 3);
        assert_eq!(h.controller.active_id(), Some(third.as_str()));
        assert_eq!(h.controller.active_tab().unwrap().title, "Games");
        assert_eq!(h.view.lock().active_id.as_deref(), Some(third.as_str()));
    }

    #[test]
    fn test_close_only_tab_goes_home() {
        let mut h = harness();
        let id = h.controller.create_tab("example.com");

        assert_eq!(h.controller.close_tab(&id), Some(CloseOutcome::Emptied));
        assert!(h.controller.tabs().is_empty());
        assert!(h.controller.active_id().is_none());
        assert_eq!(h.controller.view_mode(), ViewMode::Home);
        assert_eq!(h.frame.lock().loads.last().map(String::as_str), Some(BLANK_PAGE));
    }

    #[test]
    fn test_close_active_activates_neighbor_silently() {
        let mut h = harness();
        let a = h.controller.create_tab("a.com");
        let b = h.controller.create_tab("b.com");
        let c = h.controller.create_tab("c.com");
        h.controller.set_active(&b);
        let addresses_before = h.view.lock().addresses.len();

        let outcome = h.controller.close_tab(&b).unwrap();
        assert_eq!(outcome, CloseOutcome::ActivatedNeighbor { id: c.clone() });
        assert_eq!(h.controller.active_id(), Some(c.as_str()));
        assert_eq!(h.frame.lock().loads.last().map(String::as_str), Some("https://c.com"));
        assert_eq!(h.view.lock().addresses.len(), addresses_before);

        h.controller.close_tab(&c);
        assert_eq!(h.controller.active_id(), Some(a.as_str()));
    }

    #[test]
    fn test_close_background_and_unknown() {
        let mut h = harness();
        let a = h.controller.create_tab("a.com");
        let b = h.controller.create_tab("b.com");
        let loads = h.frame.lock().loads.len();

        assert_eq!(h.controller.close_tab(&a), Some(CloseOutcome::Background));
        assert_eq!(h.controller.active_id(), Some(b.as_str()));
        assert_eq!(h.frame.lock().loads.len(), loads);

        assert_eq!(h.controller.close_tab("ghost"), None);
    }

    #[test]
    fn test_set_active_reloads_silently() {
        let mut h = harness();
        let a = h.controller.create_tab("github.com");
        h.controller.create_tab("b.com");

        assert!(h.controller.set_active(&a));
        assert_eq!(h.controller.active_id(), Some(a.as_str()));
        assert_eq!(h.frame.lock().loads.last().map(String::as_str), Some("https://github.com"));
        assert!(!h.controller.set_active("ghost"));
    }

    #[test]
    fn test_move_tab() {
        let mut h = harness();
        let a = h.controller.create_tab("a.com");
        let b = h.controller.create_tab("b.com");
        let c = h.controller.create_tab("c.com");

        assert!(h.controller.move_tab(&c, &a));
        assert_eq!(ids(&h.controller), vec![c.clone(), a.clone(), b.clone()]);
        assert_eq!(h.view.lock().tab_ids, ids(&h.controller));

        let renders = h.view.lock().renders;
        assert!(!h.controller.move_tab(&a, &a));
        assert!(!h.controller.move_tab(&a, "ghost"));
        assert_eq!(h.view.lock().renders, renders);
    }

    #[test]
    fn test_silent_navigation_keeps_labels() {
        let mut h = harness();
        h.controller.create_tab("github.com");
        h.frame.lock().metadata = Some(Some(DocumentMeta {
            title: Some("GitHub".to_string()),
            icon_href: Some("https://github.com/favicon.ico".to_string()),
        }));
        h.controller.reconcile_from_frame();

        assert!(h.controller.navigate_active("https://github.com/rust-lang", true));
        let tab = h.controller.active_tab().unwrap();
        assert_eq!(tab.url, "https://github.com/rust-lang");
        assert_eq!(tab.title, "GitHub");
        assert!(tab.favicon.is_some());

        assert!(h.controller.navigate_active("https://example.com", false));
        let tab = h.controller.active_tab().unwrap();
        assert_eq!(tab.title, "example.com");
        assert!(tab.favicon.is_none());
        assert!(tab.fa_icon.is_none());
    }

    #[test]
    fn test_navigate_without_active_tab() {
        let mut h = harness();
        assert!(!h.controller.navigate_active("https://a.com", false));
        assert!(!h.controller.navigate_input("a.com"));
        assert!(h.frame.lock().loads.is_empty());
    }

    #[test]
    fn test_navigate_input_normalizes() {
        let mut h = harness();
        h.controller.create_tab("a.com");

        assert!(h.controller.navigate_input("rust lang"));
        assert_eq!(
            h.controller.active_tab().unwrap().url,
            "https://www.google.com/search?q=rust%20lang"
        );
        assert_eq!(h.controller.history().entries().len(), 2);
    }

    #[test]
    fn test_reconcile_follows_in_frame_navigation() {
        let mut h = harness();
        h.controller.create_tab("github.com");
        h.frame.lock().address = Some("https://example.com/next".to_string());
        h.frame.lock().metadata = Some(None);

        let outcome = h.controller.reconcile_from_frame().unwrap();
        assert_eq!(
            outcome.address,
            AddressStage::Relabeled {
                url: "https://example.com/next".to_string()
            }
        );
        assert_eq!(outcome.metadata, MetadataStage::NoDocument);
        assert!(outcome.changed());
        assert_eq!(outcome.history, RecordOutcome::Appended);

        let tab = h.controller.active_tab().unwrap();
        assert_eq!(tab.title, "example.com");
        assert_eq!(tab.fa_icon.as_deref(), Some("fa-brands fa-github"));
        assert_eq!(h.view.lock().hints, 0);
    }

    #[test]
    fn test_reconcile_unreadable_shows_hint() {
        let mut h = harness();
        h.controller.create_tab("example.com");
        h.frame.lock().address = None;
        h.frame.lock().metadata = None;

        let outcome = h.controller.reconcile_from_frame().unwrap();
        assert_eq!(outcome.address, AddressStage::Unreadable);
        assert_eq!(outcome.metadata, MetadataStage::Fallback { changed: false });
        assert!(!outcome.changed());
        assert_eq!(outcome.history, RecordOutcome::Merged);
        assert_eq!(h.view.lock().hints, 1);
        assert_eq!(h.controller.history().entries().len(), 1);
    }

    #[test]
    fn test_reconcile_without_active_tab() {
        let mut h = harness();
        assert!(h.controller.reconcile_from_frame().is_none());
        assert_eq!(h.controller.dispatch(SessionAction::FrameLoaded), ActionOutcome::Ignored);
    }

    #[test]
    fn test_proxied_load_resolves_back() {
        let store = Arc::new(MemoryStore::new());
        store.set(READY_KEY, "1").unwrap();
        let bridge = Arc::new(PrefixBridge::with_xor(ProxyConfig::default(), store.clone()));
        assert!(bridge.restore_cached_readiness());

        let mut h = harness_with(store, bridge);
        h.controller.create_tab("example.com");

        let loaded = h.frame.lock().loads[0].clone();
        assert!(loaded.starts_with("/service/"));
        assert_eq!(h.controller.last_target(), Some(loaded.as_str()));

        // The frame reports the rewritten address; the tab keeps the original
        h.frame.lock().metadata = Some(None);
        let outcome = h.controller.reconcile_from_frame().unwrap();
        assert_eq!(outcome.address, AddressStage::Unchanged);
        assert_eq!(h.controller.active_tab().unwrap().url, "https://example.com");

        h.controller.create_tab("games.html");
        assert_eq!(h.frame.lock().loads.last().map(String::as_str), Some("games.html"));
    }

    #[test]
    fn test_close_all() {
        let mut h = harness();
        h.controller.create_tab("a.com");
        h.controller.create_tab("b.com");

        assert_eq!(h.controller.dispatch(SessionAction::CloseAll), ActionOutcome::ClearedAll);
        assert!(h.controller.tabs().is_empty());
        assert_eq!(h.controller.view_mode(), ViewMode::Home);
        assert!(h.store.get(SESSION_KEY).unwrap().is_none());
        assert_eq!(h.frame.lock().loads.last().map(String::as_str), Some(BLANK_PAGE));
        assert!(h.view.lock().tab_ids.is_empty());
    }

    #[test]
    fn test_restore_session() {
        let store = Arc::new(MemoryStore::new());
        let (first, second) = {
            let mut h = harness_with(store.clone(), Arc::new(DirectBridge));
            let first = h.controller.create_tab("github.com");
            let second = h.controller.create_tab("example.com");
            h.controller.set_active(&first);
            (first, second)
        };

        let mut h = harness_with(store, Arc::new(DirectBridge));
        assert_eq!(h.controller.restore(), 2);
        assert_eq!(h.controller.active_id(), Some(first.as_str()));
        assert_eq!(ids(&h.controller), vec![first, second]);
        assert_eq!(h.controller.view_mode(), ViewMode::Browser);
        assert_eq!(h.frame.lock().loads, vec!["https://github.com".to_string()]);
        assert!(h.view.lock().addresses.is_empty());
        // Silent reload of the restored tab merges into the last visit
        assert_eq!(h.controller.history().entries().len(), 3);
    }

    #[test]
    fn test_restore_repairs_stale_active_id() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                SESSION_KEY,
                r#"{"tabs": [{"id": "t1", "url": "https://a.com", "title": "a.com"},
                             {"id": "t2", "url": "https://b.com", "title": "b.com"}],
                    "activeId": "gone"}"#,
            )
            .unwrap();

        let mut h = harness_with(store.clone(), Arc::new(DirectBridge));
        assert_eq!(h.controller.restore(), 2);
        assert_eq!(h.controller.active_id(), Some("t1"));
        assert!(store.get(SESSION_KEY).unwrap().unwrap().contains("\"activeId\":\"t1\""));
    }

    #[test]
    fn test_restore_empty_stays_home() {
        let mut h = harness();
        assert_eq!(h.controller.restore(), 0);
        assert_eq!(h.controller.view_mode(), ViewMode::Home);
        assert!(h.frame.lock().loads.is_empty());
        assert_eq!(h.view.lock().renders, 0);
    }

    #[test]
    fn test_frame_controls() {
        let mut h = harness();
        h.controller.create_tab("a.com");

        h.controller.go_back();
        h.controller.go_forward();
        h.controller.reload();
        {
            let frame = h.frame.lock();
            assert_eq!((frame.backs, frame.forwards, frame.reloads), (1, 1, 1));
        }

        h.frame.lock().history_blocked = true;
        h.controller.go_back();
        h.controller.reload();
        let frame = h.frame.lock();
        assert_eq!(frame.backs, 1);
        assert_eq!(
            frame.loads,
            vec!["https://a.com".to_string(), "https://a.com".to_string()]
        );
    }

    #[test]
    fn test_drag_and_drop() {
        let mut h = harness();
        let a = h.controller.create_tab("a.com");
        let b = h.controller.create_tab("b.com");

        assert!(h.controller.begin_drag(&b));
        assert_eq!(h.controller.dragging_id(), Some(b.as_str()));
        assert!(h.controller.drop_on(&a));
        assert_eq!(ids(&h.controller), vec![b.clone(), a.clone()]);
        assert!(h.controller.dragging_id().is_none());

        assert!(!h.controller.drop_on(&a));

        h.controller.begin_drag(&a);
        h.controller.end_drag();
        assert!(h.controller.dragging_id().is_none());
        assert!(!h.store.get(SESSION_KEY).unwrap().unwrap().contains("dragging"));
    }

    #[test]
    fn test_dispatch_routes_actions() {
        let mut h = harness();
        let ActionOutcome::Created { id: a } = h.controller.dispatch(SessionAction::CreateTab {
            url: "a.com".to_string(),
        }) else {
            panic!("expected a created tab");
        };
        let b = h.controller.create_tab("b.com");

        assert_eq!(
            h.controller.dispatch(SessionAction::Activate { id: a.clone() }),
            ActionOutcome::Activated
        );
        assert_eq!(
            h.controller.dispatch(SessionAction::MoveTab {
                from: b.clone(),
                to: a.clone()
            }),
            ActionOutcome::Moved
        );
        assert_eq!(
            h.controller.dispatch(SessionAction::SubmitAddress {
                input: "example.org".to_string()
            }),
            ActionOutcome::Navigated
        );
        assert_eq!(h.controller.active_tab().unwrap().url, "https://example.org");
        assert_eq!(h.controller.dispatch(SessionAction::Reload), ActionOutcome::FrameCommand);
        assert!(matches!(
            h.controller.dispatch(SessionAction::FrameLoaded),
            ActionOutcome::Reconciled(_)
        ));
        assert_eq!(
            h.controller.dispatch(SessionAction::BeginDrag { id: "ghost".to_string() }),
            ActionOutcome::Ignored
        );
        assert_eq!(
            h.controller.dispatch(SessionAction::CloseTab { id: b }),
            ActionOutcome::Closed(CloseOutcome::Background)
        );
        assert_eq!(
            h.controller.dispatch(SessionAction::CloseTab { id: "ghost".to_string() }),
            ActionOutcome::Ignored
        );
    }

    #[test]
    fn test_storage_failures_do_not_break_session() {
        let frame = Arc::new(Mutex::new(FrameState::default()));
        let view = Arc::new(Mutex::new(RenderState::default()));
        let mut controller = SessionController::new(
            Arc::new(FailingStore),
            Arc::new(DirectBridge),
            Box::new(RecordingFrame(frame.clone())),
            Box::new(RecordingRenderer(view)),
            ControllerOptions::default(),
        );

        assert_eq!(controller.restore(), 0);
        let id = controller.create_tab("example.com");
        assert_eq!(controller.active_id(), Some(id.as_str()));
        assert_eq!(controller.history().entries().len(), 1);

        controller.close_all();
        assert!(controller.tabs().is_empty());
        assert_eq!(frame.lock().loads.len(), 2);
    }
}

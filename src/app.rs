//! Application state.
//!
//! `App` owns the message list, its overlays, the preview pipeline and the
//! collaborators behind the citation hooks. All mutation happens on the UI
//! loop in [`App::run`]; background work reports back over channels.

use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc::{Receiver, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::event::{
    init_app_eventsource, init_user_event, messages as messages_event, mouse as mouse_event,
    overlay as overlay_event, AppEvent, KeyAction, UserEvent,
};
use crate::library::{CorpusStore, JsonLibrary, NoteStore};
use crate::model::{Message, OtherDetail, Source};
use crate::navigate::{Navigator, SystemNavigator};
use crate::policy::TrustedDomains;
use crate::preview::{
    ContentFetcher, DirectFetcher, HttpBackend, PreviewPipeline, PreviewUpdate, ReadabilitySummarizer,
    Summarizer,
};
use crate::render::{Activation, CitationHandler};
use crate::ui::layout::AppLayout;
use crate::ui::messages::TuiMessages;
use crate::ui::preview::TuiPreview;
use crate::ui::detail::TuiDetail;
use crate::ui::scroll::ScrollView;
use crate::ui::viewer::{Document, TuiViewer};
use crate::utils::clipboard::copy_to_clipboard;

pub const NOTE_NOT_FOUND: &str = "Note not found";
pub const CORPUS_NOT_FOUND: &str = "Knowledgebase entry not found";

/// The services behind fetch, summarize, lookups and navigation.
pub struct Collaborators {
    pub fetcher: Arc<dyn ContentFetcher>,
    pub summarizer: Arc<dyn Summarizer>,
    pub notes: Arc<dyn NoteStore>,
    pub corpus: Arc<dyn CorpusStore>,
    pub navigator: Arc<dyn Navigator>,
}

impl Collaborators {
    /// With a backend configured it serves fetch, summarize and the
    /// knowledgebase; otherwise pages are downloaded and summarized locally
    /// and the knowledgebase comes from the notes library.
    pub fn from_config(config: &Config) -> Result<Self> {
        let library = Arc::new(match &config.notes_path {
            Some(path) => JsonLibrary::load(path)?,
            None => JsonLibrary::empty(),
        });
        let navigator = Arc::new(SystemNavigator);

        match config.backend_url.as_deref() {
            Some(base) => {
                let backend = Arc::new(
                    HttpBackend::new(base, config.timeout(), &config.user_agent)
                        .context("Failed to set up the backend client")?,
                );
                info!(backend = %backend.base_url(), "using remote backend");
                Ok(Self {
                    fetcher: backend.clone(),
                    summarizer: backend.clone(),
                    notes: library,
                    corpus: backend,
                    navigator,
                })
            }
            None => {
                info!("no backend configured, fetching pages directly");
                let fetcher = DirectFetcher::new(config.timeout(), &config.user_agent)
                    .context("Failed to set up the page fetcher")?;
                Ok(Self {
                    fetcher: Arc::new(fetcher),
                    summarizer: Arc::new(ReadabilitySummarizer),
                    notes: library.clone(),
                    corpus: library,
                    navigator,
                })
            }
        }
    }
}

/// Which surface receives input: the topmost one that is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Messages,
    Detail,
    Preview,
    Viewer,
}

pub struct App {
    // backend
    pipeline: PreviewPipeline,
    notes: Arc<dyn NoteStore>,
    corpus: Arc<dyn CorpusStore>,
    navigator: Arc<dyn Navigator>,

    // frontend widgets, read by the ui module
    pub(crate) tui_messages: TuiMessages,
    pub(crate) tui_preview: TuiPreview,
    pub(crate) tui_detail: TuiDetail,
    pub(crate) tui_viewer: TuiViewer,

    // App State
    status: Option<String>,
    /// Knowledgebase id whose lookup is in flight; older results are dropped.
    pending_corpus: Option<String>,
    layout: AppLayout,
    exit: bool,

    // events sources
    event_sink: UnboundedSender<AppEvent>,
    user_events: Receiver<std::io::Result<UserEvent>>,
    app_events: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(messages: Vec<Message>, trusted: TrustedDomains, collaborators: Collaborators) -> Self {
        Self::with_parts(messages, trusted, collaborators, init_user_event())
    }

    /// Build with an explicit input stream instead of the terminal's.
    pub fn with_parts(
        messages: Vec<Message>,
        trusted: TrustedDomains,
        collaborators: Collaborators,
        user_events: Receiver<std::io::Result<UserEvent>>,
    ) -> Self {
        let (event_sink, app_events) = init_app_eventsource();
        let Collaborators {
            fetcher,
            summarizer,
            notes,
            corpus,
            navigator,
        } = collaborators;
        Self {
            pipeline: PreviewPipeline::new(fetcher, summarizer),
            notes,
            corpus,
            navigator,
            tui_messages: TuiMessages::new(messages, trusted),
            tui_preview: TuiPreview::new(),
            tui_detail: TuiDetail::new(),
            tui_viewer: TuiViewer::new(),
            status: None,
            pending_corpus: None,
            layout: AppLayout::default(),
            exit: false,
            event_sink,
            user_events,
            app_events,
        }
    }

    pub fn layout(&self) -> &AppLayout {
        &self.layout
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    pub fn top_surface(&self) -> Surface {
        if self.tui_viewer.is_open() {
            Surface::Viewer
        } else if self.tui_preview.is_open() {
            Surface::Preview
        } else if self.tui_detail.is_open() {
            Surface::Detail
        } else {
            Surface::Messages
        }
    }

    fn top_view(&self) -> &ScrollView {
        match self.top_surface() {
            Surface::Messages => self.tui_messages.view(),
            Surface::Detail => self.tui_detail.view(),
            Surface::Preview => self.tui_preview.body(),
            Surface::Viewer => self.tui_viewer.view(),
        }
    }

    fn top_view_mut(&mut self) -> &mut ScrollView {
        match self.top_surface() {
            Surface::Messages => self.tui_messages.view_mut(),
            Surface::Detail => self.tui_detail.view_mut(),
            Surface::Preview => self.tui_preview.body_mut(),
            Surface::Viewer => self.tui_viewer.view_mut(),
        }
    }

    /// What Enter would do on the top surface.
    pub fn focused_description(&self) -> Option<String> {
        self.top_view().focused_activation().map(Activation::describe)
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            if self.exit {
                break Ok(());
            }
            tokio::select! {
                res = self.user_events.recv() => {
                    let usr_evt = res.context("User event stream is ended.")?;
                    self.handle_user_event(usr_evt?);
                }
                res = self.app_events.recv() => {
                    let app_evt = res.context("App event stream is ended")?;
                    self.handle_app_event(app_evt);
                }
                Some(update) = self.pipeline.recv_update() => {
                    self.apply_preview_update(update);
                }
            }
            self.draw(terminal)?;
        }
    }

    pub fn draw(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            self.layout_pass(area);

            use ratatui::widgets::Widget;
            (&*self).render(area, frame.buffer_mut());
        })?;
        Ok(())
    }

    /// Settle every surface's size before rendering.
    fn layout_pass(&mut self, area: ratatui::layout::Rect) {
        if self.layout.full_area != area {
            self.layout = AppLayout::build(area);
        }
        let layout = self.layout;
        self.tui_messages.layout(layout.messages_inner);
        self.tui_detail.layout(layout.detail_area);
        self.tui_preview.layout(layout.preview_area);
        self.tui_viewer.layout(layout.viewer_area);
    }

    fn sync_preview(&mut self) {
        self.tui_preview.sync(self.pipeline.state());
    }

    fn apply_preview_update(&mut self, update: PreviewUpdate) {
        if self.pipeline.apply(update) {
            self.sync_preview();
        }
    }

    /// Close the preview, dropping the selection and any in-flight request.
    fn close_preview(&mut self) {
        self.pipeline.close();
        self.tui_messages.clear_selection();
        self.sync_preview();
    }
}

impl App {
    fn handle_user_event(&mut self, event: UserEvent) {
        match event {
            UserEvent::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
            UserEvent::Mouse(mouse) => self.handle_mouse_event(mouse),
            _ => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        // Ctrl + C quits from anywhere
        if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c' | 'C')) {
            self.exit = true;
            return;
        }
        self.status = None;

        let surface = self.top_surface();
        let action = match surface {
            Surface::Messages => messages_event::handle_key_event(self.tui_messages.view_mut(), key),
            _ => overlay_event::handle_key_event(self.top_view_mut(), key),
        };
        self.perform(surface, action);
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if let Some(activation) = mouse_event::handle_mouse_event(mouse, self.top_view_mut()) {
            self.status = None;
            self.activate(activation);
        }
    }

    fn activate(&mut self, activation: Activation) {
        debug!(action = %activation.describe(), "activating target");
        activation.dispatch(self);
    }

    fn perform(&mut self, surface: Surface, action: KeyAction) {
        match action {
            KeyAction::Consumed | KeyAction::NotConsumed => {}
            KeyAction::Activate(activation) => self.activate(activation),
            KeyAction::Quit => self.exit = true,
            KeyAction::Close => match surface {
                Surface::Messages => {}
                Surface::Detail => self.tui_detail.close(),
                Surface::Preview => self.close_preview(),
                Surface::Viewer => self.tui_viewer.close(),
            },
            KeyAction::OpenPage => {
                if surface == Surface::Preview
                    && let Some(url) = self.preview_url()
                {
                    self.navigate(&url);
                }
            }
            KeyAction::CopyUrl => {
                if surface == Surface::Preview
                    && let Some(url) = self.preview_url()
                {
                    self.status = Some(if copy_to_clipboard(&url) {
                        format!("Copied {url}")
                    } else {
                        "Clipboard unavailable".to_string()
                    });
                }
            }
        }
    }

    fn preview_url(&self) -> Option<String> {
        self.tui_preview
            .source()
            .and_then(Source::actionable_url)
            .map(str::to_string)
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CorpusLoaded { id, result } => {
                if self.pending_corpus.as_deref() != Some(id.as_str()) {
                    debug!(id, "discarding superseded knowledgebase lookup");
                    return;
                }
                self.pending_corpus = None;
                match result {
                    Ok(Some(record)) => {
                        self.status = None;
                        self.tui_viewer.open(Document::Corpus(record));
                    }
                    Ok(None) => {
                        info!(id, "knowledgebase entry not found");
                        self.status = Some(CORPUS_NOT_FOUND.to_string());
                    }
                    Err(message) => {
                        warn!(id, error = %message, "knowledgebase lookup failed");
                        self.status = Some(format!("Knowledgebase lookup failed: {message}"));
                    }
                }
            }
        }
    }
}

impl CitationHandler for App {
    fn open_source(&mut self, source: Source) {
        if !source.is_actionable() {
            self.status = Some("This source has no link".to_string());
            return;
        }
        if self.tui_messages.select_source(&source) && self.pipeline.select(source) {
            self.sync_preview();
        }
    }

    fn open_note(&mut self, id: &str) {
        match self.notes.note(id) {
            Some(note) => {
                info!(id, "opening note");
                self.tui_viewer.open(Document::Note(note));
            }
            None => {
                info!(id, "note not found");
                self.status = Some(NOTE_NOT_FOUND.to_string());
            }
        }
    }

    fn open_corpus(&mut self, id: &str) {
        info!(id, "looking up knowledgebase entry");
        self.pending_corpus = Some(id.to_string());
        self.status = Some("Loading knowledgebase entry…".to_string());

        let store = Arc::clone(&self.corpus);
        let sink = self.event_sink.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            let result = store.corpus_entry(&id).await.map_err(|e| e.to_string());
            if sink.send(AppEvent::CorpusLoaded { id, result }).is_err() {
                debug!("app event receiver dropped");
            }
        });
    }

    fn navigate(&mut self, url: &str) {
        match self.navigator.open(url) {
            Ok(()) => self.status = Some(format!("Opened {url}")),
            Err(e) => {
                error!("Navigation failed: {:#}", e);
                self.status = Some(format!("{e:#}"));
            }
        }
    }

    fn show_detail(&mut self, detail: OtherDetail) {
        if detail.is_empty() {
            return;
        }
        self.tui_detail.open(detail);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use serde_json::json;
    use tokio::sync::mpsc;

    use super::*;
    use crate::library::{CorpusRecord, Note};
    use crate::model::AnswerSection;
    use crate::navigate::testing::RecordingNavigator;
    use crate::preview::{FetchError, FetchedContent};
    use crate::ui::preview::Presentation;

    struct PageFetcher;

    #[async_trait]
    impl ContentFetcher for PageFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedContent, FetchError> {
            Ok(FetchedContent {
                html: Some(format!("<article><h2>Page</h2><p>Content of {url}</p></article>")),
                description: None,
            })
        }
    }

    struct Harness {
        app: App,
        navigator: RecordingNavigator,
    }

    fn app(sections: Vec<serde_json::Value>) -> Harness {
        let navigator = RecordingNavigator::default();
        let library = Arc::new(
            JsonLibrary::empty()
                .with_note(Note {
                    id: "n1".into(),
                    title: Some("Deploy notes".into()),
                    body: "<p>Run make.</p>".into(),
                })
                .with_corpus_entry(CorpusRecord {
                    id: "c1".into(),
                    title: Some("Runbook".into()),
                    body: "<p>Page the on-call.</p>".into(),
                    knowledgebase_name: Some("Ops".into()),
                    keywords: vec!["oncall".into()],
                }),
        );
        let collaborators = Collaborators {
            fetcher: Arc::new(PageFetcher),
            summarizer: Arc::new(ReadabilitySummarizer),
            notes: library.clone(),
            corpus: library,
            navigator: Arc::new(navigator.clone()),
        };
        let (_tx, rx) = mpsc::channel(1);
        let messages = vec![
            Message::Human("question".into()),
            Message::Ai(sections.iter().map(AnswerSection::classify).collect()),
        ];
        Harness {
            app: App::with_parts(messages, TrustedDomains::default(), collaborators, rx),
            navigator,
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_user_event(UserEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[tokio::test]
    async fn test_source_preview_round_trip() {
        let Harness { mut app, .. } = app(vec![json!({
            "response": "See the docs.",
            "sources": [{"title": "Tokio", "url": "https://tokio.rs/tutorial"}]
        })]);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.top_surface(), Surface::Preview);
        assert_eq!(app.tui_preview.presentation(), Presentation::Loading);
        assert!(app.tui_messages.selected_source().is_some());

        let update = app.pipeline.recv_update().await.unwrap();
        app.apply_preview_update(update);
        assert_eq!(app.tui_preview.presentation(), Presentation::Blocks);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.top_surface(), Surface::Messages);
        assert!(app.tui_messages.selected_source().is_none());
    }

    #[tokio::test]
    async fn test_closing_preview_drops_late_result() {
        let Harness { mut app, .. } = app(vec![json!({
            "sources": [{"title": "Tokio", "url": "https://tokio.rs"}]
        })]);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        // The superseded run never reports back.
        let late = tokio::time::timeout(Duration::from_millis(200), app.pipeline.recv_update()).await;
        assert!(late.is_err());
        assert!(!app.tui_preview.is_open());
        assert_eq!(app.top_surface(), Surface::Messages);
    }

    #[tokio::test]
    async fn test_trusted_hit_navigates_directly() {
        let Harness { mut app, navigator } = app(vec![json!({
            "type": "others",
            "data": [{"title": "foo/bar", "link": "https://github.com/foo/bar", "data": {"texts": ["A repo"]}}]
        })]);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(navigator.opened(), vec!["https://github.com/foo/bar".to_string()]);
        assert_eq!(app.top_surface(), Surface::Messages);
        assert_eq!(app.status(), Some("Opened https://github.com/foo/bar"));
    }

    #[tokio::test]
    async fn test_detail_modal_then_preview_on_top() {
        let Harness { mut app, navigator } = app(vec![json!({
            "type": "others",
            "data": [{
                "title": "Example",
                "link": "https://example.com/page",
                "data": {"texts": ["Details"], "links": [{"title": "Ref", "url": "https://example.com/ref"}]}
            }]
        })]);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.top_surface(), Surface::Detail);
        assert!(navigator.opened().is_empty());

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.top_surface(), Surface::Preview);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.top_surface(), Surface::Detail);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.top_surface(), Surface::Messages);
    }

    #[tokio::test]
    async fn test_note_citation_opens_viewer_or_reports_missing() {
        let Harness { mut app, .. } = app(vec![json!({
            "response": "From your notes",
            "notes": [
                {"id": "n1", "title": "Deploy notes", "body": "Run make.", "similarity": 0.9},
                {"id": "gone", "title": "Deleted", "body": "x", "similarity": 0.5}
            ]
        })]);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.top_surface(), Surface::Viewer);
        assert_eq!(app.tui_viewer.document().map(Document::title), Some("Deploy notes"));

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.top_surface(), Surface::Messages);
        assert_eq!(app.status(), Some(NOTE_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_corpus_lookup_is_async() {
        let Harness { mut app, .. } = app(Vec::new());
        app.open_corpus("c1");
        assert_eq!(app.top_surface(), Surface::Messages);
        let event = app.app_events.recv().await.unwrap();
        app.handle_app_event(event);
        assert_eq!(app.top_surface(), Surface::Viewer);
        assert_eq!(app.tui_viewer.document().map(Document::title), Some("Runbook"));

        press(&mut app, KeyCode::Esc);
        app.open_corpus("missing");
        let event = app.app_events.recv().await.unwrap();
        app.handle_app_event(event);
        assert_eq!(app.status(), Some(CORPUS_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_superseded_corpus_lookup_is_dropped() {
        let Harness { mut app, .. } = app(Vec::new());
        app.pending_corpus = Some("newer".into());
        app.handle_app_event(AppEvent::CorpusLoaded {
            id: "older".into(),
            result: Ok(None),
        });
        assert_eq!(app.status(), None);
        assert_eq!(app.pending_corpus.as_deref(), Some("newer"));
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_overlay() {
        let Harness { mut app, .. } = app(Vec::new());
        app.show_detail(OtherDetail {
            texts: vec!["x".into()],
            ..OtherDetail::default()
        });
        assert_eq!(app.top_surface(), Surface::Detail);
        app.handle_user_event(UserEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(app.should_exit());
    }

    #[tokio::test]
    async fn test_source_without_link_is_inert() {
        let Harness { mut app, .. } = app(Vec::new());
        app.open_source(Source::default().with_title("No link"));
        assert_eq!(app.top_surface(), Surface::Messages);
        assert!(app.status().is_some());
    }
}

//! Application state and event loop
//!
//! One `tokio::select!` loop over terminal input (forwarded from a
//! reader thread) and settled remote work. Fetches run in spawned
//! tasks and come back as [`AppEvent`]s; in-flight requests are never
//! cancelled when the view changes, so the list controller's
//! generation stamping is what keeps late responses from clobbering
//! fresher state.

use std::time::Duration;

use anyhow::Result;
use catalog_client::{
    ApiGateway, AssetFile, ClientResult, FetchTicket, FormMode, FormPhase, ListQuery,
    ListResponse, Product, ProductForm, ProductList, ProductPayload, UploadGateway,
};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

/// Which view is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Form,
}

/// Form field focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Price,
    Asset,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Price,
            Self::Price => Self::Asset,
            Self::Asset => Self::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Title => Self::Asset,
            Self::Description => Self::Title,
            Self::Price => Self::Description,
            Self::Asset => Self::Price,
        }
    }
}

/// Everything the event loop reacts to
pub enum AppEvent {
    Input(Event),
    ListSettled(FetchTicket, ClientResult<ListResponse>),
    ProductLoaded(ClientResult<Product>),
    UploadSettled(ClientResult<Option<String>>),
    SubmitSettled(ClientResult<serde_json::Value>),
    DeleteSettled(ClientResult<serde_json::Value>),
}

pub struct App {
    api: ApiGateway,
    uploads: UploadGateway,

    pub screen: Screen,
    pub list: ProductList,
    pub form: Option<ProductForm>,

    pub selected: usize,
    pub search: Input,
    pub search_focused: bool,

    pub focus: FormField,
    pub field_input: Input,

    pub status: Option<String>,

    tx: mpsc::UnboundedSender<AppEvent>,
    rx: mpsc::UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(api: ApiGateway, uploads: UploadGateway) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        spawn_input_reader(tx.clone());
        Self {
            api,
            uploads,
            screen: Screen::List,
            list: ProductList::new(),
            form: None,
            selected: 0,
            search: Input::default(),
            search_focused: false,
            focus: FormField::Title,
            field_input: Input::default(),
            status: None,
            tx,
            rx,
            should_quit: false,
        }
    }

    /// True while any remote call is unsettled
    pub fn is_busy(&self) -> bool {
        self.api.tracker().is_busy()
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        // Initial mount of the list view.
        let (ticket, query) = self.list.refresh();
        self.spawn_list_fetch(ticket, query);

        let mut tick = tokio::time::interval(Duration::from_millis(200));
        loop {
            terminal.draw(|frame| crate::ui::draw(frame, &self))?;
            tokio::select! {
                maybe = self.rx.recv() => {
                    let Some(event) = maybe else { break };
                    self.handle(event);
                }
                // Periodic redraw keeps the busy indicator honest.
                _ = tick.tick() => {}
            }
            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                match self.screen {
                    Screen::List => self.handle_list_key(key),
                    Screen::Form => self.handle_form_key(key),
                }
            }
            AppEvent::Input(_) => {}
            AppEvent::ListSettled(ticket, outcome) => match outcome {
                Ok(response) => {
                    if self.list.apply(ticket, response) {
                        let last = self.list.items().len().saturating_sub(1);
                        self.selected = self.selected.min(last);
                    }
                }
                Err(error) => {
                    if self.list.apply_error(ticket, &error) {
                        self.status = Some("Something went wrong!".to_string());
                    }
                }
            },
            AppEvent::ProductLoaded(outcome) => {
                if let Some(form) = &mut self.form {
                    if form.apply_load(outcome).is_err() {
                        self.status = Some("Something went wrong!".to_string());
                    }
                    self.sync_field_input();
                }
            }
            AppEvent::UploadSettled(outcome) => {
                if let Some(form) = &mut self.form {
                    match form.apply_upload(outcome) {
                        Ok(()) => self.status = None,
                        Err(error) => {
                            self.status = Some(format!("Error uploading file: {error}"));
                        }
                    }
                }
            }
            AppEvent::SubmitSettled(outcome) => {
                if let Some(form) = &mut self.form {
                    let _ = form.apply_submit(outcome);
                    if form.phase() == FormPhase::Success {
                        // Navigate back to the list view and refetch.
                        self.close_form();
                    }
                }
            }
            AppEvent::DeleteSettled(outcome) => {
                // Success and failure alike: refetch the current page.
                if outcome.is_err() {
                    self.status = Some("Something went wrong!".to_string());
                }
                let (ticket, query) = self.list.refresh();
                self.spawn_list_fetch(ticket, query);
            }
        }
    }

    // ---- list view ----

    fn handle_list_key(&mut self, key: KeyEvent) {
        if self.search_focused {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.search_focused = false,
                _ => {
                    self.search.handle_event(&Event::Key(key));
                    if self.search.value() != self.list.keyword() {
                        let (ticket, query) = self.list.set_keyword(self.search.value());
                        self.selected = 0;
                        self.spawn_list_fetch(ticket, query);
                    }
                }
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.search_focused = true,
            KeyCode::Char('r') => {
                let (ticket, query) = self.list.refresh();
                self.spawn_list_fetch(ticket, query);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.list.items().len().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::PageDown => {
                if self.list.page() + 1 < self.list.total_pages() {
                    let (ticket, query) = self.list.set_page(self.list.page() + 1);
                    self.spawn_list_fetch(ticket, query);
                }
            }
            KeyCode::Left | KeyCode::PageUp => {
                if self.list.page() > 0 {
                    let (ticket, query) = self.list.set_page(self.list.page() - 1);
                    self.spawn_list_fetch(ticket, query);
                }
            }
            KeyCode::Char('a') => self.open_form(ProductForm::create()),
            KeyCode::Char('e') => {
                if let Some(product) = self.list.items().get(self.selected) {
                    let id = product.id.clone();
                    self.open_form(ProductForm::edit(&id));
                    self.spawn_product_load(id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(product) = self.list.items().get(self.selected) {
                    self.spawn_delete(product.id.clone());
                }
            }
            _ => {}
        }
    }

    // ---- form view ----

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_form(),
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                self.sync_field_input();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                self.sync_field_input();
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.submit_form();
            }
            KeyCode::Enter if self.focus == FormField::Asset => {
                self.start_upload();
            }
            _ => {
                self.field_input.handle_event(&Event::Key(key));
                self.commit_field();
            }
        }
    }

    /// Seed the input box from the focused field's current value
    fn sync_field_input(&mut self) {
        let Some(form) = &self.form else { return };
        self.field_input = match self.focus {
            FormField::Title => Input::from(form.title().to_string()),
            FormField::Description => Input::from(form.description().to_string()),
            FormField::Price => {
                if form.price() > 0.0 {
                    Input::from(form.price().to_string())
                } else {
                    Input::default()
                }
            }
            // The asset box takes a file path, not the current URL.
            FormField::Asset => Input::default(),
        };
    }

    /// Every keystroke lands in the controller (re-entrant `Editing`)
    fn commit_field(&mut self) {
        let Some(form) = &mut self.form else { return };
        let value = self.field_input.value();
        match self.focus {
            FormField::Title => form.set_title(value),
            FormField::Description => form.set_description(value),
            FormField::Price => form.set_price(value.parse().unwrap_or(0.0)),
            FormField::Asset => {}
        }
    }

    fn open_form(&mut self, form: ProductForm) {
        self.form = Some(form);
        self.focus = FormField::Title;
        self.status = None;
        self.sync_field_input();
        self.screen = Screen::Form;
    }

    /// Back to the list view; the list re-mounts with a fresh fetch
    fn close_form(&mut self) {
        self.form = None;
        self.screen = Screen::List;
        self.status = None;
        let (ticket, query) = self.list.refresh();
        self.spawn_list_fetch(ticket, query);
    }

    fn submit_form(&mut self) {
        let Some(form) = &mut self.form else { return };
        if matches!(
            form.phase(),
            FormPhase::Uploading | FormPhase::Submitting | FormPhase::Loading
        ) {
            return;
        }
        let mode = form.mode().clone();
        match form.begin_submit() {
            Ok(payload) => self.spawn_submit(mode, payload),
            Err(_) => {
                // Field errors are rendered in place; nothing remote ran.
                self.status = Some("Fix the highlighted fields".to_string());
            }
        }
    }

    fn start_upload(&mut self) {
        let path = self.field_input.value().trim().to_string();
        if path.is_empty() {
            return;
        }
        let Some(form) = &mut self.form else { return };
        if form.phase() == FormPhase::Uploading {
            return;
        }
        form.begin_upload();
        self.field_input = Input::default();

        let uploads = self.uploads.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = read_asset(&path).await;
            let outcome = match outcome {
                Ok(file) => uploads.upload(file).await,
                Err(error) => Err(catalog_client::ClientError::Upload(error.to_string())),
            };
            let _ = tx.send(AppEvent::UploadSettled(outcome));
        });
    }

    // ---- spawned remote work ----

    fn spawn_list_fetch(&self, ticket: FetchTicket, query: ListQuery) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = api
                .get::<ListResponse>("/product", false, &query.params())
                .await;
            let _ = tx.send(AppEvent::ListSettled(ticket, outcome));
        });
    }

    fn spawn_product_load(&self, id: String) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = api.get::<Product>(&format!("/product/{id}"), false, &[]).await;
            let _ = tx.send(AppEvent::ProductLoaded(outcome));
        });
    }

    fn spawn_submit(&self, mode: FormMode, payload: ProductPayload) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = match &mode {
                FormMode::Create => api.post("/product", &payload).await,
                FormMode::Edit { id } => api.put(&format!("/product/{id}"), &payload).await,
            };
            let _ = tx.send(AppEvent::SubmitSettled(outcome));
        });
    }

    fn spawn_delete(&self, id: String) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = api.delete(&format!("/product/{id}"), false).await;
            let _ = tx.send(AppEvent::DeleteSettled(outcome));
        });
    }
}

/// Read a picked file and tag its media type from the extension
async fn read_asset(path: &str) -> std::io::Result<AssetFile> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string();
    let content_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string();
    Ok(AssetFile::new(file_name, content_type, bytes))
}

/// Forward terminal events into the app channel from a reader thread
fn spawn_input_reader(tx: mpsc::UnboundedSender<AppEvent>) {
    std::thread::spawn(move || {
        loop {
            match crossterm::event::read() {
                Ok(event) => {
                    if tx.send(AppEvent::Input(event)).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    tracing::error!(error = %error, "terminal input read failed");
                    break;
                }
            }
        }
    });
}

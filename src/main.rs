use clap::Parser;
use iced::widget::{column, container, image, scrollable, text, Column};
use iced::{event, window, Alignment, Element, Event, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod emoji;
mod photo;
mod state;
mod ui;

use api::{RawFailure, TransformClient, TransformSuccess};
use config::Config;
use emoji::{EmojiSymbol, RecentEmojis};
use photo::output::{self, ImageInfo, SaveError};
use photo::{ImagePayload, ValidationError};
use state::store::Store;
use state::workflow::{TransformTicket, WorkflowController, WorkflowState};
use ui::result_view::{CompareMode, DEFAULT_BLEND};

/// Main application state
struct EmojiFace {
    /// Client for the remote transform service
    client: TransformClient,
    /// The five-state transformation workflow
    workflow: WorkflowController,
    /// Persisted "Recently Used" emoji
    recent: RecentEmojis,
    /// Current emoji search text
    query: String,
    /// Preview of the selected image
    preview: Option<image::Handle>,
    /// Decoded transformed image, only in the Result state
    result_preview: Option<image::Handle>,
    result_info: Option<ImageInfo>,
    compare: CompareMode,
    /// Slider position in the fade comparison, percent
    blend: f32,
    /// Feedback from the last download attempt
    save_status: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Browse..."
    PickImage,
    /// A file was dropped onto the window
    ImageDropped(PathBuf),
    /// Background read and validation finished
    ImageLoaded(Result<ImagePayload, ValidationError>),
    /// Emoji search text changed
    SearchChanged(String),
    /// User picked an emoji from the grid or the recents row
    EmojiChosen(EmojiSymbol),
    /// The transform request with this token resolved
    TransformFinished(u64, Result<TransformSuccess, RawFailure>),
    /// User asked to re-run the failed request
    Retry,
    /// "Start Over" / "Transform Another"
    Reset,
    /// User clicked "Download Result"
    SaveResult,
    /// Background save finished
    ResultSaved(Result<PathBuf, SaveError>),
    /// Switch between side-by-side and slider comparison
    CompareModeChanged(CompareMode),
    /// Slider comparison moved
    BlendChanged(f32),
}

impl EmojiFace {
    /// Create a new instance of the application
    fn new(config: Config) -> (Self, Task<Message>) {
        let store = open_store(&config);
        match store.path() {
            Some(path) => info!("Recent emojis stored in {}", path.display()),
            None => info!("Recent emojis kept in memory"),
        }
        let recent = RecentEmojis::load(store);
        let client = TransformClient::new(&config.api_url);

        info!("🎨 Emoji Face ready, transform endpoint: {}", client.endpoint());

        (
            EmojiFace {
                client,
                workflow: WorkflowController::new(),
                recent,
                query: String::new(),
                preview: None,
                result_preview: None,
                result_info: None,
                compare: CompareMode::default(),
                blend: DEFAULT_BLEND,
                save_status: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => {
                // Show the native file picker
                let file = FileDialog::new()
                    .set_title("Select a Photo")
                    .add_filter("Images", &["jpg", "jpeg", "png", "gif", "webp"])
                    .pick_file();

                match file {
                    Some(path) => self.load(path),
                    None => Task::none(),
                }
            }
            Message::ImageDropped(path) => self.load(path),
            Message::ImageLoaded(selection) => {
                let preview = selection.as_ref().ok().map(|payload| {
                    info!("Selected {} ({})", payload.name(), payload.media_type());
                    image::Handle::from_bytes(payload.bytes().to_vec())
                });

                if self.workflow.image_selected(selection) {
                    self.preview = preview;
                }
                Task::none()
            }
            Message::SearchChanged(query) => {
                self.query = query;
                Task::none()
            }
            Message::EmojiChosen(symbol) => {
                let Some(ticket) = self.workflow.emoji_chosen(symbol) else {
                    return Task::none();
                };
                self.recent.record_use(symbol);
                self.run(ticket)
            }
            Message::TransformFinished(token, outcome) => {
                if self.workflow.complete(token, outcome) {
                    self.show_result();
                }
                Task::none()
            }
            Message::Retry => match self.workflow.retry() {
                Some(ticket) => self.run(ticket),
                None => Task::none(),
            },
            Message::Reset => {
                self.workflow.reset();
                self.query.clear();
                self.preview = None;
                self.result_preview = None;
                self.result_info = None;
                self.save_status = None;
                Task::none()
            }
            Message::SaveResult => {
                let WorkflowState::Result { transformed_image, .. } = self.workflow.state() else {
                    return Task::none();
                };

                let mut dialog = FileDialog::new()
                    .set_title("Save Transformed Image")
                    .set_file_name(output::default_file_name());
                if let Some(dir) = output::default_output_dir() {
                    dialog = dialog.set_directory(dir);
                }

                match dialog.save_file() {
                    Some(path) => Task::perform(
                        output::save_transformed(transformed_image.clone(), path),
                        Message::ResultSaved,
                    ),
                    None => Task::none(),
                }
            }
            Message::CompareModeChanged(mode) => {
                self.compare = mode;
                Task::none()
            }
            Message::BlendChanged(blend) => {
                self.blend = blend;
                Task::none()
            }
            Message::ResultSaved(result) => {
                self.save_status = Some(match result {
                    Ok(path) => format!("✅ Saved to {}", path.display()),
                    Err(e) => {
                        error!("Failed to save transformed image: {}", e);
                        format!("⚠️  Could not save: {}", e)
                    }
                });
                Task::none()
            }
        }
    }

    /// Read and validate a file in the background, if an image is wanted now
    fn load(&mut self, path: PathBuf) -> Task<Message> {
        if !self.workflow.begin_image_load() {
            return Task::none();
        }
        info!("Loading image {}", path.display());
        Task::perform(photo::load_image(path), Message::ImageLoaded)
    }

    /// Launch the transform request for `ticket`
    fn run(&self, ticket: TransformTicket) -> Task<Message> {
        let client = self.client.clone();
        let TransformTicket { token, request } = ticket;
        Task::perform(
            async move { client.transform(request).await },
            move |outcome| Message::TransformFinished(token, outcome),
        )
    }

    /// Prepare the result images after a completed request
    fn show_result(&mut self) {
        self.save_status = None;
        self.compare = CompareMode::default();
        self.blend = DEFAULT_BLEND;
        let state = self.workflow.state();
        if let (Some(image), Some(emoji)) = (state.image(), state.emoji()) {
            info!("✨ {} transformed with {}", image.name(), emoji.name());
        }
        if let WorkflowState::Result { transformed_image, .. } = state {
            self.result_info = match output::inspect(transformed_image) {
                Ok(info) => Some(info),
                Err(e) => {
                    warn!("⚠️  Transformed image could not be probed: {}", e);
                    None
                }
            };
            self.result_preview = Some(image::Handle::from_bytes(transformed_image.clone()));
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let body: Element<Message> = match self.workflow.state() {
            WorkflowState::SelectingImage => ui::upload(self.workflow.validation_error()),
            WorkflowState::SelectingEmoji { .. } => {
                let mut picker: Column<Message> = column![].spacing(24).align_x(Alignment::Center);
                if let Some(preview) = &self.preview {
                    picker = picker.push(image(preview.clone()).height(Length::Fixed(256.0)));
                }
                picker
                    .push(text("Choose an emoji expression").size(26))
                    .push(
                        text("Select the emotion you want to apply to the face")
                            .style(text::secondary),
                    )
                    .push(ui::emoji_grid::view(&self.query, self.recent.list()))
                    .into()
            }
            WorkflowState::Processing { emoji, .. } => ui::processing(*emoji),
            WorkflowState::Result { processing_time_ms, .. } => {
                match (&self.preview, &self.result_preview) {
                    (Some(original), Some(transformed)) => ui::result_view::view(
                        original,
                        transformed,
                        self.compare,
                        self.blend,
                        *processing_time_ms,
                        self.result_info.as_ref(),
                        self.save_status.as_deref(),
                    ),
                    _ => text("Result unavailable").into(),
                }
            }
            WorkflowState::Failed { error, .. } => {
                ui::error_panel::view(error, self.workflow.can_retry())
            }
        };

        let content: Column<Message> = column![
            text("Emoji Face").size(48),
            text("Transform facial expressions with emoji magic ✨")
                .size(18)
                .style(text::secondary),
            ui::steps(self.workflow.state()),
        ]
        .push_maybe(self.workflow.quota_exhausted().then(ui::quota_banner))
        .push(body)
        .spacing(24)
        .padding(40)
        .max_width(1100)
        .align_x(Alignment::Center);

        scrollable(
            container(content)
                .width(Length::Fill)
                .center_x(Length::Fill),
        )
        .into()
    }

    /// Window events: dropped files feed the image loader
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::ImageDropped(path)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Open the on-disk settings store, falling back to an in-memory one
fn open_store(config: &Config) -> Store {
    if let Some(path) = config.store_path() {
        match Store::open(&path) {
            Ok(store) => return store,
            Err(e) => warn!("⚠️  Settings store unavailable at {}: {}", path.display(), e),
        }
    } else {
        warn!("⚠️  No data directory found for the settings store");
    }

    warn!("Recent emojis will not be remembered after this session");
    match Store::in_memory() {
        Ok(store) => store,
        Err(e) => {
            error!("In-memory settings store failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    iced::application("Emoji Face", EmojiFace::update, EmojiFace::view)
        .subscription(EmojiFace::subscription)
        .theme(EmojiFace::theme)
        .centered()
        .run_with(move || EmojiFace::new(config))
}

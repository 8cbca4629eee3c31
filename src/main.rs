// src/main.rs
use iced::widget::{button, column, container, text};
use iced::{
    executor, font, subscription, window, Alignment, Application, Command, Element, Event, Font,
    Length, Settings, Subscription, Theme,
};
use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageLevel};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use csv2pdf::converter::{self, ConversionSummary};
use csv2pdf::selection::{display_name, normalize_dropped_path};
use csv2pdf::{ReportStyle, Selection, TableData};

mod ui;

use ui::{ButtonStyle, ContainerStyle, StatusKind, PALETTE};

const WINDOW_TITLE: &str = "CSV to PDF Converter";
const ICON_FILE: &str = "icon.ico";
const BOLD: Font = Font {
    weight: font::Weight::Bold,
    ..Font::DEFAULT
};

pub fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("csv2pdf=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    CsvToPdf::run(Settings {
        window: window::Settings {
            size: (600, 450),
            resizable: true,
            icon: load_icon(),
            ..Default::default()
        },
        ..Settings::default()
    })
}

/// Look for the icon next to the executable, then in the working directory.
fn load_icon() -> Option<window::Icon> {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(ICON_FILE)));

    for path in beside_exe.into_iter().chain([PathBuf::from(ICON_FILE)]) {
        if !path.exists() {
            continue;
        }
        match window::icon::from_file(&path) {
            Ok(icon) => return Some(icon),
            Err(err) => warn!(path = %path.display(), error = %err, "cannot load window icon"),
        }
    }

    info!("Icon not found. Skipping.");
    None
}

struct CsvToPdf {
    selection: Selection,
    status: String,
    status_kind: StatusKind,
    /// Source of the conversion currently running, if any.
    in_flight: Option<PathBuf>,
    style: ReportStyle,
}

#[derive(Debug, Clone)]
enum Message {
    FileDropped(PathBuf),
    BrowseFile,
    FileSelected(Option<PathBuf>),
    Convert,
    TableLoaded(Result<TableData, String>),
    Converted(Result<ConversionSummary, String>),
    DialogClosed,
}

impl Application for CsvToPdf {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: ()) -> (Self, Command<Message>) {
        (
            CsvToPdf {
                selection: Selection::new(),
                status: "Ready".to_string(),
                status_kind: StatusKind::Info,
                in_flight: None,
                style: ReportStyle::default(),
            },
            Command::none(),
        )
    }

    fn title(&self) -> String {
        WINDOW_TITLE.to_string()
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::FileDropped(path) => {
                self.accept_file(normalize_dropped_path(path), "Please drop a .csv file.")
            }

            Message::BrowseFile => Command::perform(
                async {
                    AsyncFileDialog::new()
                        .add_filter("CSV Files", &["csv"])
                        .add_filter("All files", &["*"])
                        .pick_file()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::FileSelected,
            ),

            Message::FileSelected(Some(path)) => {
                self.accept_file(path, "Please select a .csv file.")
            }

            Message::FileSelected(None) => Command::none(),

            Message::Convert => {
                if self.in_flight.is_some() {
                    return Command::none();
                }
                let Some(path) = self.selection.path().map(|path| path.to_path_buf()) else {
                    return show_dialog(MessageLevel::Error, "Error", "No file selected.".to_string());
                };

                info!(source = %path.display(), "starting conversion");
                self.set_status("Reading CSV file...", StatusKind::Working);
                self.in_flight = Some(path.clone());
                Command::perform(converter::load_table(path), Message::TableLoaded)
            }

            Message::TableLoaded(Ok(table)) => {
                let Some(source) = self.in_flight.clone() else {
                    return Command::none();
                };

                self.set_status("Generating PDF...", StatusKind::Working);
                Command::perform(
                    converter::render_and_write(source, table, self.style.clone()),
                    Message::Converted,
                )
            }

            Message::Converted(Ok(summary)) => {
                self.in_flight = None;
                self.set_status(
                    format!("Successfully converted to {}", display_name(&summary.output_path)),
                    StatusKind::Success,
                );
                show_dialog(
                    MessageLevel::Info,
                    "Success",
                    format!("PDF created successfully at:\n{}", summary.output_path.display()),
                )
            }

            Message::TableLoaded(Err(error)) | Message::Converted(Err(error)) => {
                self.in_flight = None;
                self.set_status(format!("An error occurred: {error}"), StatusKind::Error);
                show_dialog(
                    MessageLevel::Error,
                    "Conversion Error",
                    format!("An error occurred during conversion:\n{error}"),
                )
            }

            Message::DialogClosed => Command::none(),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        subscription::events_with(|event, _status| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    fn view(&self) -> Element<Message> {
        let palette = &*PALETTE;

        let drop_zone = container(
            text("Drag & Drop CSV File Here")
                .size(22)
                .font(BOLD)
                .style(palette.text),
        )
        .width(Length::Fill)
        .padding([60, 0])
        .center_x()
        .style(iced::theme::Container::Custom(Box::new(ContainerStyle {
            bg: palette.drop_zone_bg,
            border: Some(palette.text),
        })));

        let separator = text("OR").size(16).style(palette.muted);

        let browse = button(text("Browse for CSV File").size(16).font(BOLD))
            .padding([10, 20])
            .on_press(Message::BrowseFile)
            .style(iced::theme::Button::Custom(Box::new(ButtonStyle::browse())));

        let file_info = text(match self.selection.path() {
            Some(path) => format!("Selected: {}", display_name(path)),
            None => "No file selected".to_string(),
        })
        .size(14)
        .style(palette.text);

        let mut convert = button(text("Convert to PDF").size(18).font(BOLD))
            .padding([15, 30])
            .style(iced::theme::Button::Custom(Box::new(ButtonStyle::convert())));
        if self.selection.is_ready() && self.in_flight.is_none() {
            convert = convert.on_press(Message::Convert);
        }

        let main_content = column![drop_zone, separator, browse, file_info, convert]
            .spacing(14)
            .padding(20)
            .align_items(Alignment::Center)
            .width(Length::Fill)
            .height(Length::Fill);

        let status_bar = container(text(&self.status).size(14).style(self.status_kind.color()))
            .width(Length::Fill)
            .padding([4, 10])
            .style(iced::theme::Container::Custom(Box::new(ContainerStyle::plain(
                palette.status_bg,
            ))));

        container(column![main_content, status_bar])
            .width(Length::Fill)
            .height(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(ContainerStyle::plain(
                palette.window_bg,
            ))))
            .into()
    }
}

impl CsvToPdf {
    /// Store a candidate from either input source, or explain why not.
    fn accept_file(&mut self, path: PathBuf, rejection: &str) -> Command<Message> {
        match self.selection.select(path) {
            Ok(()) => {
                let name = self.selection.path().map(display_name).unwrap_or_default();
                self.set_status(format!("File '{name}' loaded."), StatusKind::Info);
                Command::none()
            }
            Err(err) => {
                info!(error = %err, "selection rejected");
                self.set_status("Error: Invalid file type.", StatusKind::Error);
                show_dialog(MessageLevel::Error, "Invalid File", rejection.to_string())
            }
        }
    }

    fn set_status(&mut self, message: impl Into<String>, kind: StatusKind) {
        self.status = message.into();
        self.status_kind = kind;
    }
}

fn show_dialog(level: MessageLevel, title: &'static str, description: String) -> Command<Message> {
    Command::perform(
        async move {
            let _ = AsyncMessageDialog::new()
                .set_level(level)
                .set_title(title)
                .set_description(description.as_str())
                .set_buttons(MessageButtons::Ok)
                .show()
                .await;
        },
        |_| Message::DialogClosed,
    )
}

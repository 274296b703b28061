mod picker;
mod preview;
mod result_view;

use anyhow::{Context, Result};
use eframe::{App, Frame, egui};
use leaf_core::{
    AcquireError, ClientConfig, HttpTransport, InFlight, Notice, Phase, PickerOptions,
    PredictError, PredictionResult, Session, Ticket, UploadClient, pick_image,
};
use picker::RfdPicker;
use preview::{PREVIEW_SIZE, Preview};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tempfile::TempDir;

const APP_VERSION: &str = env!("LEAFSCAN_VERSION");

type Outcome = std::result::Result<PredictionResult, PredictError>;

/// Upload running on the worker thread.
struct Request {
    ticket: Ticket,
    rx: Receiver<Outcome>,
}

pub struct UiApp {
    client: Arc<UploadClient<HttpTransport>>,
    session: Session,
    picker: RfdPicker,
    picker_options: PickerOptions,
    // recompressed picks live here until exit
    scratch: TempDir,
    request: Option<Request>,
    preview: Preview,
    notice: Option<Notice>,
}

impl UiApp {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let scratch = tempfile::Builder::new()
            .prefix("leafscan-")
            .tempdir()
            .context("cannot create scratch directory")?;
        let notice = config.advisory();
        let in_flight = InFlight::new();
        let client = UploadClient::with_in_flight(config, HttpTransport::new(), in_flight.clone());
        Ok(Self {
            client: Arc::new(client),
            session: Session::new(in_flight),
            picker: RfdPicker::default(),
            picker_options: PickerOptions::default(),
            scratch,
            request: None,
            preview: Preview::default(),
            notice,
        })
    }

    fn pick(&mut self) {
        match pick_image(
            &mut self.picker,
            &self.picker_options,
            self.scratch.path(),
        ) {
            Ok(image) => {
                self.session.image_selected(image);
                self.preview = Preview::NotLoaded;
            }
            Err(AcquireError::Cancelled) => tracing::debug!("image selection cancelled"),
            Err(err) => {
                tracing::warn!("Error picking image: {err}");
                self.notice = err.notice();
            }
        }
    }

    fn start_prediction(&mut self, ctx: &egui::Context) {
        if let Err(err) = self.client.config().endpoint_url() {
            self.notice = Some(err.notice());
            return;
        }
        let pending = match self.session.begin_prediction() {
            Ok(pending) => pending,
            Err(err) => {
                self.notice = err.notice();
                return;
            }
        };

        let ticket = pending.ticket;
        let (tx, rx) = mpsc::channel();
        let client = Arc::clone(&self.client);
        let ctx = ctx.clone();
        let spawned = thread::Builder::new()
            .name("leaf-upload".into())
            .spawn(move || {
                let outcome = client.predict_in_flight(&pending.flight, Some(&pending.image));
                // receiver may be gone after teardown
                let _ = tx.send(outcome);
                drop(pending);
                ctx.request_repaint();
            });
        match spawned {
            Ok(_) => self.request = Some(Request { ticket, rx }),
            Err(e) => {
                let err = PredictError::Unknown(format!("cannot start upload: {e}"));
                self.notice = self.session.complete_prediction(ticket, Err(err));
            }
        }
    }

    fn poll_request(&mut self) {
        let Some(request) = &self.request else {
            return;
        };
        let outcome = match request.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(PredictError::Unknown(
                "upload stopped unexpectedly".to_string(),
            )),
        };
        let ticket = request.ticket;
        self.request = None;
        if let Some(notice) = self.session.complete_prediction(ticket, outcome) {
            self.notice = Some(notice);
        }
    }

    fn reset(&mut self) {
        self.session.reset();
        self.preview = Preview::NotLoaded;
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(notice.message.as_str());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.notice = None;
        }
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_request();
        let modal_open = self.notice.is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.add_enabled_ui(!modal_open, |ui| {
                        ui.vertical_centered(|ui| self.render_screen(ui, ctx));
                    });
                });
        });

        self.render_notice(ctx);
    }
}

impl UiApp {
    fn render_screen(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.add_space(24.0);
        ui.heading(egui::RichText::new("Potato Leaf Detector").size(28.0).strong());
        ui.add_space(16.0);

        if ui
            .add_enabled(
                self.session.can_pick(),
                egui::Button::new("Select a Leaf Image"),
            )
            .clicked()
        {
            self.pick();
        }

        if let Some(image) = self.session.selected().cloned() {
            ui.add_space(16.0);
            let max = egui::Vec2::splat(PREVIEW_SIZE as f32);
            match self.preview.texture(ctx, image.path()) {
                Some(tex) => {
                    ui.add(egui::Image::new(tex).max_size(max).corner_radius(12.0));
                }
                None => {
                    ui.label(image.file_name());
                }
            }
            ui.add_space(16.0);

            let phase = self.session.phase();
            let label = if phase == Phase::Predicting {
                "Analyzing..."
            } else {
                "Get Prediction"
            };
            if ui
                .add_enabled(self.session.can_predict(), egui::Button::new(label))
                .clicked()
            {
                self.start_prediction(ctx);
            }
        }

        match self.session.phase() {
            Phase::Predicting => {
                ui.add_space(24.0);
                ui.add(egui::Spinner::new().size(32.0));
                ui.label("Analyzing your leaf...");
            }
            Phase::Resulted => {
                if let Some(result) = self.session.prediction() {
                    ui.add_space(24.0);
                    result_view::render(ui, result);
                }
            }
            Phase::Idle | Phase::ImageSelected => {}
        }

        if self.session.can_reset() {
            ui.add_space(16.0);
            if ui.button("Delete Image").clicked() {
                self.reset();
            }
        }

        ui.add_space(24.0);
        ui.small(format!("Version {APP_VERSION}"));
    }
}

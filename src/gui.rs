use crate::libgeoguess::session::{Event, Round, Session, SessionState, Summary, Verdict};
use crate::Error;
use eframe::egui;
use eframe::egui::Button;
use eframe::egui::Color32;
use eframe::egui::Grid;
use eframe::egui::Image;
use eframe::egui::RichText;
use eframe::egui::Stroke;
use eframe::egui::Ui;
use eframe::egui::Vec2;
use log::{debug, warn};
use rand::Rng;
use std::path::PathBuf;

const CYAN: Color32 = Color32::from_rgb(0, 255, 255);
const MAGENTA: Color32 = Color32::from_rgb(255, 0, 255);
const ORANGE: Color32 = Color32::from_rgb(255, 69, 0);
const GREEN: Color32 = Color32::from_rgb(0, 255, 0);
const RED: Color32 = Color32::from_rgb(255, 0, 0);

struct GuiState<R> {
    session: Session<R>,
    assets: PathBuf,
    error: Option<String>,
}

impl<R: Rng> GuiState<R> {
    fn new(ctx: &eframe::CreationContext, session: Session<R>, assets: PathBuf) -> Self {
        egui_extras::install_image_loaders(&ctx.egui_ctx);
        ctx.egui_ctx.set_visuals(egui::Visuals::dark());

        Self {
            session,
            assets,
            error: None,
        }
    }

    fn draw_round(&self, ui: &mut Ui, round: &Round, verdict: Option<&Verdict>) -> Option<Event> {
        let mut event = None;
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(format!("Score: {}", round.score()))
                    .monospace()
                    .size(24.0)
                    .color(MAGENTA),
            );
            ui.label(RichText::new(format!("{}/{}", round.number(), round.total())).monospace());

            let uri = format!("file://{}", round.item().image_path(&self.assets).display());
            ui.add(Image::new(uri).max_size(Vec2::new(800.0, 400.0)));
            ui.label(
                RichText::new("Where is this place?")
                    .monospace()
                    .size(36.0)
                    .color(CYAN),
            );
            ui.add_space(15.0);

            Grid::new("choices")
                .num_columns(2)
                .spacing([15.0, 15.0])
                .show(ui, |ui| {
                    for (idx, label) in round.options().labels().iter().enumerate() {
                        let color = if verdict.is_some() && idx == round.options().correct_index() {
                            GREEN
                        } else {
                            CYAN
                        };
                        let button = neon_button(label, color).min_size(Vec2::new(320.0, 40.0));
                        if ui.add_enabled(verdict.is_none(), button).clicked() {
                            event = Some(Event::Select(label.clone()));
                        }
                        if idx % 2 == 1 {
                            ui.end_row();
                        }
                    }
                });

            if let Some(verdict) = verdict {
                ui.add_space(10.0);
                let (text, color) = if verdict.correct {
                    ("You are correct! Well done!".to_string(), GREEN)
                } else {
                    (
                        format!(
                            "Oops! The correct answer was: {}. Better luck next time!",
                            verdict.correct_label
                        ),
                        RED,
                    )
                };
                ui.label(RichText::new(text).monospace().size(24.0).color(color));
            }

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(verdict.is_some(), neon_button("Next", MAGENTA))
                    .clicked()
                {
                    event = Some(Event::Advance);
                }
                if ui.add(neon_button("Stop Game", ORANGE)).clicked() {
                    event = Some(Event::StopEarly);
                }
            });
        });
        event
    }

    fn dispatch(&mut self, ctx: &egui::Context, event: Event) {
        debug!("[GUI] event: {:?}", event);
        match self.session.handle(event) {
            Ok(SessionState::Exited) => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            Ok(_) => self.error = None,
            Err(err) => {
                warn!("[GUI] {}", err);
                self.error = Some(err.to_string());
            }
        }
    }
}

fn neon_button(text: &str, color: Color32) -> Button<'static> {
    Button::new(RichText::new(text).monospace().size(18.0).color(color))
        .fill(Color32::BLACK)
        .stroke(Stroke::new(2.0, color))
        .min_size(Vec2::new(240.0, 40.0))
}

fn draw_menu(ui: &mut Ui) -> Option<Event> {
    let mut event = None;
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(
            RichText::new("Welcome to GeoGuess Game")
                .monospace()
                .size(36.0)
                .color(CYAN),
        );
        ui.add_space(30.0);
        if ui.add(neon_button("Start Game", CYAN)).clicked() {
            event = Some(Event::Start);
        }
        ui.add_space(15.0);
        if ui.add(neon_button("Exit", MAGENTA)).clicked() {
            event = Some(Event::Exit);
        }
    });
    event
}

fn draw_game_over(ui: &mut Ui, summary: &Summary) -> Option<Event> {
    let mut event = None;
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(
            RichText::new(format!("Game Over! Your final score is: {}", summary.score))
                .monospace()
                .size(36.0)
                .color(CYAN),
        );
        if summary.stopped_early {
            ui.label(
                RichText::new(format!(
                    "Stopped after {} of {} places",
                    summary.answered, summary.total
                ))
                .monospace(),
            );
        }
        ui.add_space(30.0);
        if ui.add(neon_button("Restart Game", CYAN)).clicked() {
            event = Some(Event::Restart);
        }
        ui.add_space(15.0);
        if ui.add(neon_button("Exit", MAGENTA)).clicked() {
            event = Some(Event::Exit);
        }
    });
    event
}

impl<R: Rng> eframe::App for GuiState<R> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut event = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            event = match self.session.state() {
                SessionState::NotStarted => draw_menu(ui),
                SessionState::AwaitingChoice(round) => self.draw_round(ui, round, None),
                SessionState::Answered(round, verdict) => self.draw_round(ui, round, Some(verdict)),
                SessionState::Finished(summary) => draw_game_over(ui, summary),
                SessionState::Exited => None,
            };
            if let Some(error) = &self.error {
                ui.colored_label(RED, error.as_str());
            }
        });

        if let Some(event) = event {
            self.dispatch(ctx, event);
        }
    }
}

pub fn init_gui<R: Rng + 'static>(session: Session<R>, assets: PathBuf) -> Result<(), Error> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_maximized(true),
        ..Default::default()
    };
    eframe::run_native(
        "GeoGuess Game",
        native_options,
        Box::new(move |cc| Ok(Box::new(GuiState::new(cc, session, assets)))),
    )?;

    Ok(())
}

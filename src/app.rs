use std::time::Instant;

use eframe::egui;
use log::{info, warn};

use crate::audio::{AudioEngine, WaveShape};
use crate::game::{Feedback, GameSession, GuessOutcome};
use crate::messaging::{MessageBus, TrainerMessage};
use crate::settings::AppSettings;
use crate::theory::{ClefKind, Note};
use crate::ui::{KeyboardView, StaffView};

/// Length of the tone played for a tapped or target note.
const NOTE_TONE_SECONDS: f32 = 0.5;

// Main app state
pub struct TrainerApp {
    session: GameSession,
    bus: MessageBus,
    audio: Option<AudioEngine>,
    _midi_connection: Option<midir::MidiInputConnection<()>>,
    midi_ports: Vec<String>,
    selected_midi_port: usize,
    last_midi_message: Option<String>,
    settings: AppSettings,
    current_tab: Tab,
    should_exit: bool,
}

#[derive(PartialEq)]
enum Tab {
    Practice,
    Settings,
    Midi,
}

impl eframe::App for TrainerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain input events collected since the last frame.
        self.process_messages();

        // The frame loop doubles as the feedback timer: the session clears
        // its own feedback once the deadline passes.
        let mut rng = rand::rng();
        self.session.tick(Instant::now(), &mut rng);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("SightRead");
                ui.label("🎵");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("❌ Exit").clicked() {
                        self.should_exit = true;
                    }
                    self.render_stats(ui);
                });
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.current_tab, Tab::Practice, "Practice");
                ui.selectable_value(&mut self.current_tab, Tab::Settings, "Settings");
                ui.selectable_value(&mut self.current_tab, Tab::Midi, "MIDI Settings");
            });

            ui.separator();

            match self.current_tab {
                Tab::Practice => self.render_practice(ui),
                Tab::Settings => self.render_settings(ui),
                Tab::Midi => self.render_midi_settings(ui),
            }
        });

        if self.should_exit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        // Keep repainting so the feedback timer advances without input.
        ctx.request_repaint();
    }
}

impl TrainerApp {
    pub fn new() -> Self {
        let settings = AppSettings::load();
        let session = GameSession::new(settings.clef);

        let mut app = TrainerApp {
            session,
            bus: MessageBus::new(),
            audio: None,
            _midi_connection: None,
            midi_ports: Vec::new(),
            selected_midi_port: 0,
            last_midi_message: None,
            settings,
            current_tab: Tab::Practice,
            should_exit: false,
        };

        app.refresh_midi_ports();

        // Reconnect the port used last time, if it is still around.
        if let Some(ref port_name) = app.settings.midi_port {
            if let Some(port_idx) = app.midi_ports.iter().position(|p| p == port_name) {
                app.selected_midi_port = port_idx;
                app.connect_midi_port(port_idx);
            }
        }

        app
    }

    fn process_messages(&mut self) {
        while let Ok(msg) = self.bus.try_receive() {
            match msg {
                TrainerMessage::KeyPressed(note) => {
                    self.handle_guess(note);
                }
                TrainerMessage::MidiNoteOn(key) => {
                    self.last_midi_message = Some(format!("note on {}", key));
                    if let Some(note) = Note::from_midi(key) {
                        self.handle_guess(note);
                    }
                }
                TrainerMessage::SetVolume(volume) => {
                    if let Some(audio) = &self.audio {
                        audio.set_volume(volume);
                    }
                }
            }
        }
    }

    /// Score one tapped note and fire the matching sounds. Sound is
    /// best-effort: with no audio engine the session still advances.
    fn handle_guess(&mut self, note: Note) {
        let target = self.session.target();
        match self.session.guess(note, Instant::now()) {
            GuessOutcome::Correct => {
                if let (Some(audio), Some(target)) = (&self.audio, target) {
                    audio.play_tone(target.frequency(), WaveShape::Sine, NOTE_TONE_SECONDS);
                    audio.play_success_chime();
                }
            }
            GuessOutcome::Wrong => {
                if let Some(audio) = &self.audio {
                    audio.play_tone(note.frequency(), WaveShape::Sine, NOTE_TONE_SECONDS);
                }
            }
            GuessOutcome::Ignored => {}
        }
    }

    /// The audio device is only claimed once the user actually starts
    /// practicing; a refusal leaves the app silent but fully playable.
    fn ensure_audio(&mut self) {
        if self.audio.is_some() {
            return;
        }
        match AudioEngine::new() {
            Ok(engine) => {
                engine.set_volume(self.settings.volume);
                self.audio = Some(engine);
            }
            Err(e) => warn!("audio unavailable, running silent: {}", e),
        }
    }

    fn render_stats(&self, ui: &mut egui::Ui) {
        if self.session.is_running() {
            ui.label(format!("Streak: {}", self.session.streak()));
            ui.separator();
            ui.label(format!(
                "Score: {}/{}",
                self.session.score(),
                self.session.total()
            ));
        }
    }

    fn render_practice(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.session.is_running() {
                if ui.button("⏹ Stop").clicked() {
                    self.session.stop();
                }
            } else if ui.button("▶ Start").clicked() {
                self.ensure_audio();
                let mut rng = rand::rng();
                self.session.start(&mut rng);
            }
            ui.label(format!("Clef: {}", self.session.clef().name()));
        });

        ui.add_space(6.0);

        if !self.session.is_running() {
            ui.label("Press Start, then tap the key matching the note on the staff.");
            return;
        }

        StaffView::new(self.session.clef())
            .target(self.session.target())
            .guessed(self.session.guessed())
            .feedback(self.session.feedback())
            .show(ui);

        ui.add_space(10.0);

        let config = self.session.clef().config();
        let pressed = ui
            .vertical_centered(|ui| {
                KeyboardView::new(config.min, config.max)
                    .target(self.session.target())
                    .guessed(self.session.guessed())
                    .feedback(self.session.feedback())
                    .show(ui)
            })
            .inner;
        if let Some(note) = pressed {
            self.bus.send(TrainerMessage::KeyPressed(note));
        }

        if self.session.feedback() == Feedback::Wrong {
            if let Some(target) = self.session.target() {
                ui.label(format!("Not quite — the note is {}", target));
            }
        }
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");

        ui.group(|ui| {
            ui.label("Clef mode (switching resets the session):");
            for kind in ClefKind::ALL {
                let config = kind.config();
                let text = format!("{} ({}–{})", config.name, config.min, config.max);
                if ui
                    .radio(self.session.clef() == kind, text)
                    .clicked()
                    && self.session.clef() != kind
                {
                    self.session.set_clef(kind);
                    self.settings.clef = kind;
                    self.settings.save().ok();
                }
            }
        });

        ui.horizontal(|ui| {
            ui.label("Volume:");
            let mut volume = self.settings.volume;
            if ui.add(egui::Slider::new(&mut volume, 0.0..=1.0)).changed() {
                self.settings.volume = volume;
                self.bus.send(TrainerMessage::SetVolume(volume));
                self.settings.save().ok();
            }
        });

        if ui.button("Reset progress").clicked() {
            self.session.stop();
        }
    }

    fn render_midi_settings(&mut self, ui: &mut egui::Ui) {
        ui.heading("MIDI Settings");
        ui.label("Answer on a connected keyboard instead of tapping keys.");

        ui.horizontal(|ui| {
            ui.label("MIDI Input Device:");
            if ui.button("Refresh MIDI Ports").clicked() {
                self.refresh_midi_ports();
            }
        });

        for i in 0..self.midi_ports.len() {
            let port_name = self.midi_ports[i].clone();
            let is_selected = i == self.selected_midi_port;

            if ui.radio(is_selected, &port_name).clicked() && !is_selected {
                self.selected_midi_port = i;
                self.connect_midi_port(i);
                self.settings.midi_port = Some(port_name);
                self.settings.save().ok();
            }
        }

        if let Some(msg) = &self.last_midi_message {
            ui.label(format!("Last MIDI message: {}", msg));
        }
    }

    fn refresh_midi_ports(&mut self) {
        self.midi_ports.clear();

        if let Ok(midi_in) = midir::MidiInput::new("sightread-input") {
            for port in midi_in.ports() {
                if let Ok(port_name) = midi_in.port_name(&port) {
                    self.midi_ports.push(port_name);
                }
            }
        }
    }

    fn connect_midi_port(&mut self, port_idx: usize) {
        // Disconnect existing connection if any
        self._midi_connection = None;

        let midi_in = match midir::MidiInput::new("sightread-input") {
            Ok(midi_in) => midi_in,
            Err(e) => {
                warn!("error creating MIDI input: {}", e);
                return;
            }
        };

        let ports = midi_in.ports();
        if port_idx >= ports.len() {
            warn!("invalid MIDI port index");
            return;
        }

        let port = &ports[port_idx];
        let sender = self.bus.sender();

        match midi_in.connect(
            port,
            "sightread-connection",
            move |_stamp, message, _| {
                // Only note-on with actual velocity counts as an answer.
                if message.len() >= 3 {
                    let status = message[0];
                    let key = message[1];
                    let velocity = message[2];
                    if status & 0xF0 == 0x90 && velocity > 0 {
                        sender.send(TrainerMessage::MidiNoteOn(key)).ok();
                    }
                }
            },
            (),
        ) {
            Ok(conn) => {
                info!("connected to MIDI device");
                self._midi_connection = Some(conn);
                self.last_midi_message = Some("Connected".to_string());
            }
            Err(err) => {
                warn!("failed to connect to MIDI device: {}", err);
            }
        }
    }
}

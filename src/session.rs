//! Menu and game flow
//!
//! `Session` owns the current screen and is the only place screens change.
//! Input arrives as DOM key strings and canvas-space pointer positions; the
//! side effects the browser has to perform (network, audio, storage) come
//! back out as `Effect`s so the state machine stays synchronous and testable.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::MAX_NAME_LEN;
use crate::leaderboard::{LeaderboardEntry, ScoreSubmission};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, Viewport, tick};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    MainMenu,
    NameInput,
    Playing,
    GameOver,
    ProfileChoice,
    Leaderboard,
}

/// Main menu entries, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Leaderboard,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Start, MenuItem::Leaderboard, MenuItem::Exit];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Start => "Start Game",
            MenuItem::Leaderboard => "Leaderboard",
            MenuItem::Exit => "Exit",
        }
    }
}

/// Work the host must do on the session's behalf
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Record a finished run (fire and forget)
    SubmitScore(ScoreSubmission),
    /// Fetch entries for the leaderboard screen
    LoadLeaderboard,
    PlayGunshot,
    /// Settings changed and should be persisted
    SettingsChanged,
    /// Player chose Exit
    Exit,
}

/// What the leaderboard screen shows
#[derive(Debug, Clone, Default)]
pub struct LeaderboardView {
    pub entries: Vec<LeaderboardEntry>,
    pub loading: bool,
}

/// Session state across runs
#[derive(Debug, Clone)]
pub struct Session {
    pub screen: Screen,
    /// Cursor on the main menu
    pub menu_index: usize,
    pub player_name: String,
    /// Current or last finished run
    pub game: Option<GameState>,
    /// Highest level reached by any run this session
    pub max_level: u32,
    pub leaderboard: LeaderboardView,
    pub settings: Settings,
    viewport: Viewport,
    rng: Pcg32,
    input: TickInput,
}

impl Session {
    pub fn new(seed: u64, viewport: Viewport, settings: Settings) -> Self {
        Self {
            screen: Screen::MainMenu,
            menu_index: 0,
            player_name: String::new(),
            game: None,
            max_level: 1,
            leaderboard: LeaderboardView::default(),
            settings,
            viewport,
            rng: Pcg32::seed_from_u64(seed),
            input: TickInput::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn selected_item(&self) -> MenuItem {
        MenuItem::ALL[self.menu_index.min(MenuItem::ALL.len() - 1)]
    }

    /// Canvas was resized
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        if let Some(game) = self.game.as_mut() {
            game.viewport = self.viewport;
        }
    }

    /// Handle a `KeyboardEvent.key` value
    pub fn handle_key(&mut self, key: &str) -> Vec<Effect> {
        match self.screen {
            Screen::MainMenu => self.main_menu_key(key),
            Screen::NameInput => {
                self.name_input_key(key);
                Vec::new()
            }
            Screen::Playing => self.playing_key(key),
            Screen::GameOver => {
                if is_confirm(key) {
                    self.screen = Screen::ProfileChoice;
                }
                Vec::new()
            }
            Screen::ProfileChoice => {
                self.profile_choice_key(key);
                Vec::new()
            }
            Screen::Leaderboard => {
                if is_confirm(key) || key == "Escape" {
                    self.screen = Screen::MainMenu;
                }
                Vec::new()
            }
        }
    }

    fn main_menu_key(&mut self, key: &str) -> Vec<Effect> {
        match key {
            "ArrowUp" => self.menu_index = self.menu_index.saturating_sub(1),
            "ArrowDown" => self.menu_index = (self.menu_index + 1).min(MenuItem::ALL.len() - 1),
            k if is_confirm(k) => match self.selected_item() {
                MenuItem::Start => self.screen = Screen::NameInput,
                MenuItem::Leaderboard => {
                    self.screen = Screen::Leaderboard;
                    self.leaderboard.loading = true;
                    return vec![Effect::LoadLeaderboard];
                }
                MenuItem::Exit => {
                    log::info!("Exit requested");
                    return vec![Effect::Exit];
                }
            },
            _ => {}
        }
        Vec::new()
    }

    fn name_input_key(&mut self, key: &str) {
        match key {
            "Enter" => {
                let name = self.player_name.trim();
                if name.is_empty() {
                    return;
                }
                self.player_name = name.to_string();
                self.start_run();
            }
            "Backspace" => {
                self.player_name.pop();
            }
            "Escape" => self.screen = Screen::MainMenu,
            _ => {
                let mut chars = key.chars();
                let (Some(c), None) = (chars.next(), chars.next()) else {
                    return;
                };
                if !c.is_control() && self.player_name.chars().count() < MAX_NAME_LEN {
                    self.player_name.push(c);
                }
            }
        }
    }

    fn playing_key(&mut self, key: &str) -> Vec<Effect> {
        match key {
            "Escape" => self.input.pause = !self.input.pause,
            "r" | "R" => {
                log::info!("Restarting run for '{}'", self.player_name);
                self.start_run();
            }
            "m" | "M" => {
                self.settings.toggle_mute();
                log::info!("Sound {}", if self.settings.muted { "muted" } else { "on" });
                return vec![Effect::SettingsChanged];
            }
            "+" | "=" => {
                self.settings.adjust_volume(1);
                return vec![Effect::SettingsChanged];
            }
            "-" => {
                self.settings.adjust_volume(-1);
                return vec![Effect::SettingsChanged];
            }
            _ => {}
        }
        Vec::new()
    }

    fn profile_choice_key(&mut self, key: &str) {
        match key {
            "1" => self.start_run(),
            "2" => {
                self.game = None;
                self.player_name.clear();
                self.max_level = 1;
                self.screen = Screen::NameInput;
            }
            "3" => {
                self.game = None;
                self.player_name.clear();
                self.max_level = 1;
                self.menu_index = 0;
                self.screen = Screen::MainMenu;
            }
            _ => {}
        }
    }

    /// Begin a fresh run for the current player
    pub fn start_run(&mut self) {
        let seed: u64 = self.rng.random();
        log::info!("Starting run for '{}' (seed {})", self.player_name, seed);
        self.game = Some(GameState::new(seed, self.viewport));
        self.input = TickInput::default();
        self.screen = Screen::Playing;
    }

    /// Pointer moved to `pos` (canvas pixels)
    pub fn pointer_move(&mut self, pos: Vec2) {
        if self.screen == Screen::Playing {
            self.input.aim = Some(pos);
        }
    }

    /// Pointer clicked at `pos` (canvas pixels)
    pub fn click(&mut self, pos: Vec2) {
        if self.screen == Screen::Playing {
            self.input.aim = Some(pos);
            self.input.fire = Some(pos);
        }
    }

    /// Run one simulation tick when a run is live
    pub fn update(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.screen != Screen::Playing {
            return effects;
        }
        let Some(game) = self.game.as_mut() else {
            return effects;
        };

        tick(game, &self.input);
        // One-shot inputs are consumed by the first tick that sees them
        self.input = TickInput::default();

        for event in game.drain_events() {
            match event {
                GameEvent::Fired { .. } => effects.push(Effect::PlayGunshot),
                GameEvent::LevelAdvanced { level } => {
                    self.max_level = self.max_level.max(level);
                }
                GameEvent::RunOver { score, accuracy } => {
                    log::info!(
                        "Game over for '{}': score {}, max level {}",
                        self.player_name,
                        score,
                        self.max_level
                    );
                    self.screen = Screen::GameOver;
                    effects.push(Effect::SubmitScore(ScoreSubmission {
                        name: self.player_name.clone(),
                        score,
                        max_level: self.max_level,
                        accuracy,
                    }));
                }
                _ => {}
            }
        }
        effects
    }

    /// Leaderboard fetch finished
    pub fn leaderboard_loaded(&mut self, entries: Vec<LeaderboardEntry>) {
        log::info!("Leaderboard loaded ({} entries)", entries.len());
        self.leaderboard.entries = entries;
        self.leaderboard.loading = false;
    }
}

fn is_confirm(key: &str) -> bool {
    key == "Enter" || key == " "
}

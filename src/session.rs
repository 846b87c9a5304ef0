//! Session state: which screen is active, the grid it owns, and the menu
//! state machine driving transitions between them.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::grid::{Grid, GRID_SIZE_DEFAULT};
use crate::save;

const SAVE_FILE_NAME: &str = "save/grid.txt";

/// UI screens. One is active at a time; keyboard commands and the egui
/// menus both drive the same transitions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    MainMenu,
    NewMenu,
    LoadMenu,
    Sim { running: bool },
    SimMenu,
    Settings,
    SaveMenu,
}

/// A keyboard command, decoupled from the raw winit key event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    /// Escape: back out of the current screen.
    Back,
    /// Space: the screen's primary action.
    Confirm,
    Up,
    Down,
    Left,
    Right,
    /// Q: abandon the simulation and return to the main menu.
    Abandon,
}

pub struct Settings {
    pub step_interval: Duration,
    pub show_ghosts: bool,
    /// Paint brush radius in cells; 0 paints a single cell.
    pub brush_radius: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            step_interval: Duration::from_millis(100),
            show_ghosts: true,
            brush_radius: 0,
        }
    }
}

/// Everything the running application owns besides the gpu/window plumbing.
/// The grid lives here: exactly one exists at a time, created when a
/// simulation starts and dropped when the user abandons it.
pub struct Session {
    pub screen: Screen,
    pub grid: Option<Grid>,
    pub settings: Settings,
    pub generation: u64,
    /// Pending dimensions edited in the new-simulation menu.
    pub new_width: u32,
    pub new_height: u32,
    pub save_path: PathBuf,
    /// Error or confirmation line shown on the current screen.
    pub status: Option<String>,
    last_step: Instant,
}

impl Session {
    pub fn new() -> Self {
        Self {
            screen: Screen::MainMenu,
            grid: None,
            settings: Settings::default(),
            generation: 0,
            new_width: GRID_SIZE_DEFAULT,
            new_height: GRID_SIZE_DEFAULT,
            save_path: PathBuf::from(SAVE_FILE_NAME),
            status: None,
            last_step: Instant::now(),
        }
    }

    pub fn is_in_sim(&self) -> bool {
        matches!(self.screen, Screen::Sim { .. })
    }

    /// Advances the running simulation if the tick interval has elapsed.
    /// Called once per frame.
    pub fn tick(&mut self) {
        if self.screen == (Screen::Sim { running: true })
            && self.last_step.elapsed() >= self.settings.step_interval
        {
            self.step_once();
        }
    }

    pub fn step_once(&mut self) {
        if let Some(grid) = &mut self.grid {
            grid.step();
            self.generation += 1;
            self.last_step = Instant::now();
        }
    }

    /// Creates the grid for a new simulation and enters it paused. On
    /// allocation failure the screen does not change and the error is shown.
    pub fn start_new_sim(&mut self) {
        match Grid::new(self.new_width as i32, self.new_height as i32) {
            Ok(grid) => {
                self.grid = Some(grid);
                self.generation = 0;
                self.status = None;
                self.screen = Screen::Sim { running: false };
            }
            Err(err) => {
                log::error!("could not create grid: {err}");
                self.status = Some(format!("Could not create grid: {err}"));
            }
        }
    }

    /// Loads the save file into a fresh grid and enters the simulation
    /// paused. Load failures are shown on the load menu, not fatal.
    pub fn load_sim(&mut self) {
        match save::load_from_path(&self.save_path) {
            Ok(grid) => {
                self.grid = Some(grid);
                self.generation = 0;
                self.status = None;
                self.screen = Screen::Sim { running: false };
            }
            Err(err) => {
                log::error!("could not load save: {err}");
                self.status = Some(format!("Could not load save: {err}"));
            }
        }
    }

    pub fn save_sim(&mut self) {
        let Some(grid) = &self.grid else {
            return;
        };
        match save::save_to_path(&self.save_path, grid) {
            Ok(()) => self.status = Some("Simulation saved.".to_owned()),
            Err(err) => {
                log::error!("could not save: {err}");
                self.status = Some(format!("Could not save: {err}"));
            }
        }
    }

    /// Drops the grid and returns to the main menu.
    pub fn abandon_sim(&mut self) {
        self.grid = None;
        self.generation = 0;
        self.status = None;
        self.screen = Screen::MainMenu;
    }

    /// Applies a keyboard command to the active screen. Returns true when
    /// the application should exit.
    pub fn handle_command(&mut self, cmd: Command) -> bool {
        match self.screen {
            Screen::MainMenu => match cmd {
                Command::Back => return true,
                Command::Confirm => {
                    self.new_width = GRID_SIZE_DEFAULT;
                    self.new_height = GRID_SIZE_DEFAULT;
                    self.status = None;
                    self.screen = Screen::NewMenu;
                }
                Command::Down => {
                    self.status = None;
                    self.screen = Screen::LoadMenu;
                }
                _ => {}
            },
            Screen::NewMenu => match cmd {
                Command::Back => self.screen = Screen::MainMenu,
                Command::Confirm => self.start_new_sim(),
                Command::Up => self.new_height += 1,
                Command::Down => self.new_height = self.new_height.saturating_sub(1).max(1),
                Command::Right => self.new_width += 1,
                Command::Left => self.new_width = self.new_width.saturating_sub(1).max(1),
                Command::Abandon => {}
            },
            Screen::LoadMenu => match cmd {
                Command::Back => self.screen = Screen::MainMenu,
                Command::Confirm => self.load_sim(),
                _ => {}
            },
            Screen::Sim { running } => match cmd {
                Command::Back => self.screen = Screen::SimMenu,
                Command::Confirm => self.screen = Screen::Sim { running: !running },
                Command::Right if !running => self.step_once(),
                _ => {}
            },
            Screen::SimMenu => match cmd {
                Command::Back => self.screen = Screen::Sim { running: false },
                Command::Up => self.screen = Screen::Settings,
                Command::Down => {
                    self.status = None;
                    self.screen = Screen::SaveMenu;
                }
                Command::Abandon => self.abandon_sim(),
                _ => {}
            },
            Screen::Settings => {
                if cmd == Command::Back {
                    self.screen = Screen::SimMenu;
                }
            }
            Screen::SaveMenu => match cmd {
                Command::Back => self.screen = Screen::SimMenu,
                Command::Confirm => self.save_sim(),
                _ => {}
            },
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, Screen, Session};

    #[test]
    fn new_menu_creates_a_grid_and_enters_paused_sim() {
        let mut session = Session::new();
        assert!(!session.handle_command(Command::Confirm));
        assert_eq!(session.screen, Screen::NewMenu);
        session.new_width = 32;
        session.new_height = 24;
        session.handle_command(Command::Confirm);
        assert_eq!(session.screen, Screen::Sim { running: false });
        let grid = session.grid.as_ref().unwrap();
        assert_eq!(grid.size_x(), 32);
        assert_eq!(grid.size_y(), 24);
    }

    #[test]
    fn new_menu_size_adjustment_clamps_at_one() {
        let mut session = Session::new();
        session.screen = Screen::NewMenu;
        session.new_width = 1;
        session.new_height = 2;
        session.handle_command(Command::Left);
        assert_eq!(session.new_width, 1);
        session.handle_command(Command::Down);
        session.handle_command(Command::Down);
        assert_eq!(session.new_height, 1);
        session.handle_command(Command::Up);
        session.handle_command(Command::Right);
        assert_eq!((session.new_width, session.new_height), (2, 2));
    }

    #[test]
    fn abandoning_the_sim_frees_the_grid() {
        let mut session = Session::new();
        session.screen = Screen::NewMenu;
        session.handle_command(Command::Confirm);
        assert!(session.grid.is_some());
        session.screen = Screen::SimMenu;
        session.handle_command(Command::Abandon);
        assert_eq!(session.screen, Screen::MainMenu);
        assert!(session.grid.is_none());
    }

    #[test]
    fn space_toggles_running_and_right_steps_while_paused() {
        let mut session = Session::new();
        session.screen = Screen::NewMenu;
        session.new_width = 16;
        session.new_height = 16;
        session.handle_command(Command::Confirm);
        session.handle_command(Command::Confirm);
        assert_eq!(session.screen, Screen::Sim { running: true });
        session.handle_command(Command::Confirm);
        assert_eq!(session.screen, Screen::Sim { running: false });
        session.handle_command(Command::Right);
        assert_eq!(session.generation, 1);
    }

    #[test]
    fn escape_exits_only_from_the_main_menu() {
        let mut session = Session::new();
        session.screen = Screen::SimMenu;
        assert!(!session.handle_command(Command::Back));
        assert_eq!(session.screen, Screen::Sim { running: false });
        session.screen = Screen::MainMenu;
        assert!(session.handle_command(Command::Back));
    }
}

mod agent;
mod app;
mod canvas;
mod celebration;
mod config;
mod effects;
mod engine;
mod game;
mod graph;
mod presets;
mod scheduler;
mod settings;
mod steering;
mod ui;
mod vec2;

use app::App;
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use presets::{Preset, PresetManager};
use ratatui::{backend::CrosstermBackend, layout::Position, layout::Rect, Terminal};
use settings::EngineSettings;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "dotfield")]
#[command(about = "Interactive particle-field capture game in the terminal")]
struct Args {
    // === Field Parameters ===
    /// Number of agents in the field (10-400, capped to grid capacity)
    #[arg(short = 'n', long)]
    agents: Option<usize>,

    /// Rest grid columns (2-40)
    #[arg(long)]
    cols: Option<usize>,

    /// Rest grid rows (2-40)
    #[arg(long)]
    rows: Option<usize>,

    // === Pointer Parameters ===
    /// Capture radius around the pointer (20-120)
    #[arg(long = "capture-radius")]
    capture_radius: Option<f32>,

    /// Inner pointer band: repulsion applies below this distance (40-160)
    #[arg(long)]
    near: Option<f32>,

    /// Outer pointer band: attraction applies below this distance (160-320)
    #[arg(long)]
    far: Option<f32>,

    /// Repulsion gain (0.01-0.2)
    #[arg(long)]
    repulse: Option<f32>,

    /// Attraction gain (0.0-0.05)
    #[arg(long)]
    attract: Option<f32>,

    /// Chase speed multiplier for captured agents (1.0-4.0)
    #[arg(long)]
    follow: Option<f32>,

    // === Visual Parameters ===
    /// Connection line radius (40-200)
    #[arg(long = "connect-radius")]
    connect_radius: Option<f32>,

    // === Presets & Config ===
    /// Start from a named preset (built-in or user)
    #[arg(long)]
    preset: Option<String>,

    /// Load settings from a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save the resolved settings as a user preset and exit
    #[arg(long = "save-preset")]
    save_preset: Option<String>,

    /// Delete a user preset and exit
    #[arg(long = "delete-preset")]
    delete_preset: Option<String>,
}

/// Resolve settings from defaults, config file, preset, then CLI overrides
fn resolve_settings(args: &Args) -> Result<EngineSettings, String> {
    let mut settings = EngineSettings::default();

    if let Some(path) = &args.config {
        settings = AppConfig::load_from_file(path)?.settings;
    }

    if let Some(name) = &args.preset {
        let manager = PresetManager::new();
        match manager.find(name) {
            Some(preset) => settings = preset.settings.clone(),
            None => return Err(format!("Unknown preset: {}", name)),
        }
    }

    if let Some(v) = args.agents {
        settings.agent_count = v.clamp(10, 400);
    }
    if let Some(v) = args.cols {
        settings.grid_cols = v.clamp(2, 40);
    }
    if let Some(v) = args.rows {
        settings.grid_rows = v.clamp(2, 40);
    }
    if let Some(v) = args.capture_radius {
        settings.capture_radius = v.clamp(20.0, 120.0);
    }
    if let Some(v) = args.near {
        settings.near_threshold = v.clamp(40.0, 160.0);
    }
    if let Some(v) = args.far {
        settings.far_threshold = v.clamp(160.0, 320.0);
    }
    if let Some(v) = args.repulse {
        settings.repulse_gain = v.clamp(0.01, 0.2);
    }
    if let Some(v) = args.attract {
        settings.attract_gain = v.clamp(0.0, 0.05);
    }
    if let Some(v) = args.follow {
        settings.follow_gain = v.clamp(1.0, 4.0);
    }
    if let Some(v) = args.connect_radius {
        settings.connection_radius = v.clamp(40.0, 200.0);
    }

    Ok(settings)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let settings = resolve_settings(&args)?;

    // Preset maintenance runs without entering the UI
    if let Some(name) = &args.save_preset {
        let mut manager = PresetManager::new();
        manager.save_preset(Preset::new(
            name.clone(),
            "saved from the command line",
            settings,
        ))?;
        println!("Saved preset '{}'", name);
        return Ok(());
    }
    if let Some(name) = &args.delete_preset {
        let mut manager = PresetManager::new();
        manager.delete_preset(name)?;
        println!("Deleted preset '{}'", name);
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Get initial terminal size and create app
    let size = terminal.size()?;
    let frame_rect = Rect {
        x: 0,
        y: 0,
        width: size.width,
        height: size.height,
    };
    let (canvas_width, canvas_height) = ui::get_canvas_size(frame_rect, false);
    let mut app = App::new(canvas_width, canvas_height, settings);

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~30fps; the engine is tick-based, so late frames just coast
    const FRAME_DURATION: Duration = Duration::from_millis(33);

    let start = Instant::now();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        let timeout = FRAME_DURATION.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }

                    match key.code {
                        // System controls
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.reset_round(),
                        KeyCode::Char('t') | KeyCode::Char('T') => {
                            app.trigger_celebration(start.elapsed().as_millis() as u64);
                        }
                        KeyCode::Char('v') | KeyCode::Char('V') => {
                            app.toggle_fullscreen();
                            let size = terminal.size()?;
                            let frame_rect = Rect::new(0, 0, size.width, size.height);
                            let (w, h) = ui::get_canvas_size(frame_rect, app.fullscreen_mode);
                            app.resize(w, h);
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                            app.toggle_help();
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => app.cycle_preset(1),
                        KeyCode::Char('o') | KeyCode::Char('O') => app.cycle_preset(-1),
                        KeyCode::Char('x') | KeyCode::Char('X') => {
                            let config = AppConfig {
                                version: 1,
                                settings: app.engine.settings.clone(),
                            };
                            match config.save_default() {
                                Ok(path) => {
                                    app.set_notice(format!("saved {}", path.display()));
                                }
                                Err(err) => app.set_notice(err),
                            }
                        }

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up => {
                            if !app.show_help && app.focus.is_param() {
                                app.adjust_focused_up();
                            }
                        }
                        KeyCode::Down => {
                            if !app.show_help && app.focus.is_param() {
                                app.adjust_focused_down();
                            }
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') => {
                            if app.show_help {
                                app.scroll_help_down(ui::HELP_CONTENT_LINES);
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else if app.focus.is_param() {
                                app.focus = app::Focus::Controls;
                            }
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        let size = terminal.size()?;
                        let area = Rect::new(0, 0, size.width, size.height);
                        let position = Position::new(mouse.column, mouse.row);

                        let over_sidebar = ui::layout_rects(area, app.fullscreen_mode)
                            .0
                            .is_some_and(|rect| rect.contains(position));
                        let over_help = app.show_help
                            && ui::help_rect(area, app.fullscreen_mode).contains(position);
                        app.hovering_blocked = over_sidebar || over_help;

                        // Terminal cell to surface-dot coordinates (cell center)
                        let inner = ui::canvas_inner(area, app.fullscreen_mode);
                        let dot_x = (mouse.column as i32 - inner.x as i32) * 2 + 1;
                        let dot_y = (mouse.row as i32 - inner.y as i32) * 4 + 2;
                        app.set_pointer(dot_x as f32, dot_y as f32);
                    }
                    _ => {}
                },
                Event::Resize(width, height) => {
                    let frame_rect = Rect::new(0, 0, width, height);
                    let (w, h) = ui::get_canvas_size(frame_rect, app.fullscreen_mode);
                    app.resize(w, h);
                }
                Event::FocusLost => app.pointer_leave(),
                _ => {}
            }
        }

        // Run simulation tick at the frame cadence
        if last_tick.elapsed() >= FRAME_DURATION {
            app.tick(start.elapsed().as_millis() as u64);
            last_tick = Instant::now();
        }
    }
}

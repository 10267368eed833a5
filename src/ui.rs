use crate::app::{App, Focus};
use crate::canvas::{self, BrailleCanvas, LAYER_AGENT, LAYER_CAPTURED, LAYER_LINE, LAYER_SPARK};
use crate::celebration::Phase;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Captured agents render in the first palette color
const CAPTURED_COLOR: Color = Color::Rgb(0x9b, 0x87, 0xf5);
const CAPTURED_DIM_COLOR: Color = Color::Rgb(0x4e, 0x44, 0x7b);

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Sidebar and canvas-block rectangles for the current layout
pub fn layout_rects(area: Rect, fullscreen: bool) -> (Option<Rect>, Rect) {
    if fullscreen {
        (None, area)
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);
        (Some(layout[0]), layout[1])
    }
}

/// The canvas drawing area inside its borders
pub fn canvas_inner(area: Rect, fullscreen: bool) -> Rect {
    let (_, block) = layout_rects(area, fullscreen);
    Rect {
        x: block.x.saturating_add(1),
        y: block.y.saturating_add(1),
        width: block.width.saturating_sub(2),
        height: block.height.saturating_sub(2),
    }
}

/// Calculate the canvas size (excluding borders)
pub fn get_canvas_size(frame_area: Rect, fullscreen: bool) -> (u16, u16) {
    let inner = canvas_inner(frame_area, fullscreen);
    (inner.width, inner.height)
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),  // Status
            Constraint::Length(10), // Parameters
            Constraint::Min(10),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" dotfield ");

    let captured = app.game.capture_count();
    let total = app.game.total().max(1);
    let progress = captured as f32 / total as f32;
    let progress_width = (area.width.saturating_sub(4)) as usize;
    let filled = (progress * progress_width as f32) as usize;
    let empty = progress_width.saturating_sub(filled);

    let status_text = if app.paused {
        "PAUSED"
    } else {
        match app.celebration.phase() {
            Phase::Bursting => "CELEBRATION",
            Phase::FadingOut => "FADING",
            Phase::Idle => "ROUND",
        }
    };

    let status_color = if app.paused {
        HIGHLIGHT_COLOR
    } else if app.celebration.phase() != Phase::Idle {
        Color::Green
    } else {
        BORDER_COLOR
    };

    let mut content = vec![
        Line::from(Span::styled(
            format!("{} / {} captured", captured, app.game.total()),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(Color::Green)),
            Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(status_text, Style::default().fg(status_color))),
    ];

    if let Some((notice, _)) = &app.notice {
        content.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(DIM_TEXT_COLOR),
        )));
    }

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let s = &app.engine.settings;

    let content = vec![
        make_line(
            "Agents",
            format!("{}", s.agent_count),
            app.focus == Focus::Agents,
        ),
        make_line(
            "Attract",
            format!("{:.3}", s.attract_gain),
            app.focus == Focus::Attract,
        ),
        make_line(
            "Capture",
            format!("{:.0}", s.capture_radius),
            app.focus == Focus::Capture,
        ),
        make_line(
            "Connect",
            format!("{:.0}", s.connection_radius),
            app.focus == Focus::Connect,
        ),
        make_line(
            "Far",
            format!("{:.0}", s.far_threshold),
            app.focus == Focus::Far,
        ),
        make_line(
            "Follow",
            format!("{:.2}", s.follow_gain),
            app.focus == Focus::Follow,
        ),
        make_line(
            "Near",
            format!("{:.0}", s.near_threshold),
            app.focus == Focus::Near,
        ),
        make_line(
            "Repulse",
            format!("{:.2}", s.repulse_gain),
            app.focus == Focus::Repulse,
        ),
    ];

    // Calculate scroll to keep focused item visible based on actual area
    let focus_line = app.focus.line_index();
    let visible_height = area.height.saturating_sub(2); // minus borders
    let content_height = content.len() as u16;

    let scroll = if visible_height == 0 || visible_height >= content_height {
        0
    } else if focus_line >= visible_height {
        focus_line.saturating_sub(visible_height - 1)
    } else {
        0
    };

    let paragraph = Paragraph::new(content).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &str, desc: String| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "pause/resume".to_string()),
        make_control("H/?", "help".to_string()),
        make_control("R", "reset round".to_string()),
        make_control("T", "celebrate now".to_string()),
        make_control("P", "next preset".to_string()),
        make_control("O", "prev preset".to_string()),
        make_control("X", "export config".to_string()),
        make_control("V", "fullscreen".to_string()),
        make_control("Tab", "select param".to_string()),
        make_control("↑/↓", "adjust param".to_string()),
        make_control("Q", "quit".to_string()),
        Line::from(Span::styled(
            format!("  phase: {}", app.celebration.phase().name()),
            desc_style,
        )),
    ];

    let block = styled_block(" Controls ");
    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let mut canvas = BrailleCanvas::new(inner.width, inner.height);
    let opacity = app.celebration.grid_opacity;
    let s = &app.engine.settings;

    // Connections first (layering)
    for conn in &app.connections {
        canvas.line(
            conn.a_pos,
            conn.b_pos,
            LAYER_LINE,
            canvas::shade(conn.alpha * opacity),
        );
    }

    // Agents over the web
    let size_multiplier = app.game.size_multiplier();
    for agent in &app.engine.agents {
        if agent.captured && app.celebration.round_active {
            let color = if app.hovering_blocked || app.fade_opacity < 0.3 {
                CAPTURED_DIM_COLOR
            } else {
                CAPTURED_COLOR
            };
            let radius = agent.radius * 1.25 * size_multiplier;
            canvas.disc(agent.pos, radius, LAYER_CAPTURED, color);
        } else {
            // Near home renders brighter, far drifters dim out
            let drift = agent.pos.distance_to(agent.rest_target);
            let t = (drift / s.arrival_radius.max(1.0)).clamp(0.0, 1.0);
            let intensity = (0.35 + (0.16 - 0.35) * t) * opacity;
            canvas.disc(agent.pos, agent.radius, LAYER_AGENT, canvas::shade(intensity));
        }
    }

    // Celebration sparks on top
    for spark in app.sparks.sparks() {
        canvas.dot(spark.pos.x, spark.pos.y, LAYER_SPARK, spark.color);
    }

    for cell in canvas.cells() {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            let cell_rect = Rect {
                x,
                y,
                width: 1,
                height: 1,
            };
            let span = Span::styled(cell.char.to_string(), Style::default().fg(cell.color));
            frame.render_widget(Paragraph::new(Line::from(span)), cell_rect);
        }
    }

    render_counter_caption(frame, inner, app);
}

/// Capture counter caption, anchored near the first-captured agent
fn render_counter_caption(frame: &mut Frame, inner: Rect, app: &App) {
    let anchor = match app.counter_anchor {
        Some(anchor) if app.game.capture_count() > 0 => anchor,
        _ => return,
    };
    if app.fade_opacity <= 0.05 {
        return;
    }

    let label = format!(" {} / {} ", app.game.capture_count(), app.game.total());
    let width = label.len() as u16;
    if width > inner.width || inner.height < 2 {
        return;
    }

    // Surface dots back to cells, nudged below the anchor
    let cell_x = (anchor.x / 2.0) as u16;
    let cell_y = (anchor.y / 4.0) as u16 + 1;
    let x = (inner.x + cell_x).min(inner.x + inner.width - width);
    let y = (inner.y + cell_y).min(inner.y + inner.height - 1);

    let caption_rect = Rect {
        x,
        y,
        width,
        height: 1,
    };
    let span = Span::styled(
        label,
        Style::default().fg(canvas::shade(app.fade_opacity)),
    );
    frame.render_widget(Paragraph::new(Line::from(span)), caption_rect);
}

/// Help dialog rectangle, centered within the canvas area
pub fn help_rect(area: Rect, fullscreen: bool) -> Rect {
    let canvas_x = if fullscreen { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if fullscreen {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(32);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let help_area = help_rect(area, app.fullscreen_mode);

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "DOTFIELD",
            Style::default().fg(BORDER_COLOR),
        )),
        Line::from(""),
        Line::from("A grid of agents drifts home under steering forces. The mouse pointer repels agents up close, pulls gently at medium range, and captures any agent it touches."),
        Line::from(""),
        Line::from(Span::styled("THE GAME:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Captured agents chase the pointer and swell as your haul grows. Capture every agent to win: the field dims, four bursts fire, and the round resets itself."),
        Line::from(""),
        Line::from(Span::styled("DEAD ZONES:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("The sidebar and this help dialog block the pointer: no captures happen there and captured agents freeze until the pointer returns to the field."),
        Line::from(""),
        Line::from(Span::styled("PARAMETERS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from(""),
        Line::from(Span::styled("Near / Far", Style::default().fg(TEXT_COLOR))),
        Line::from("Pointer force bands: repulsion inside Near, weak attraction between Near and Far."),
        Line::from(""),
        Line::from(Span::styled("Capture", Style::default().fg(TEXT_COLOR))),
        Line::from("How close the pointer must get to claim an agent."),
        Line::from(""),
        Line::from(Span::styled("Connect", Style::default().fg(TEXT_COLOR))),
        Line::from("Agents closer than this are joined by a line; nearer pairs draw brighter."),
        Line::from(""),
        Line::from(Span::styled("Follow", Style::default().fg(TEXT_COLOR))),
        Line::from("Chase speed multiplier for captured agents."),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Pause, R=Reset, T=Celebrate, P/O=Presets, X=Export, V=Fullscreen, Tab/Arrows=Adjust, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_area.height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}

use crate::render::{MAX_ZOOM, MIN_ZOOM, ZOOM_FACTOR_STEP};
use crate::session::Command;
use crate::state::State;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton},
    keyboard::{KeyCode, PhysicalKey},
};

/// Maps a raw key press to a menu command. Key releases and unbound keys
/// produce nothing.
pub fn parse_key(event: &KeyEvent) -> Option<Command> {
    if event.state != ElementState::Pressed {
        return None;
    }
    match event.physical_key {
        PhysicalKey::Code(KeyCode::Escape) => Some(Command::Back),
        PhysicalKey::Code(KeyCode::Space) => Some(Command::Confirm),
        PhysicalKey::Code(KeyCode::ArrowUp) => Some(Command::Up),
        PhysicalKey::Code(KeyCode::ArrowDown) => Some(Command::Down),
        PhysicalKey::Code(KeyCode::ArrowLeft) => Some(Command::Left),
        PhysicalKey::Code(KeyCode::ArrowRight) => Some(Command::Right),
        PhysicalKey::Code(KeyCode::KeyQ) => Some(Command::Abandon),
        _ => None,
    }
}

pub fn handle_zoom(state: &mut State, delta: f32) {
    let old_zoom = state.zoom;
    let zoom_factor = if delta > 0.0 {
        ZOOM_FACTOR_STEP
    } else {
        1.0 / ZOOM_FACTOR_STEP
    };
    let mut new_zoom = old_zoom * zoom_factor;
    new_zoom = new_zoom.clamp(MIN_ZOOM, MAX_ZOOM);

    if (new_zoom - old_zoom).abs() < f32::EPSILON {
        return;
    }

    let mut new_offset = state.view_offset;

    if let Some(cursor_pos) = state.cursor_pos {
        let cursor_screen_x = cursor_pos.x as f32;
        let cursor_screen_y = cursor_pos.y as f32;

        // Keep the grid point under the cursor fixed across the zoom
        let world_x = (cursor_screen_x + state.view_offset[0]) / old_zoom;
        let world_y = (cursor_screen_y + state.view_offset[1]) / old_zoom;
        new_offset[0] = world_x * new_zoom - cursor_screen_x;
        new_offset[1] = world_y * new_zoom - cursor_screen_y;
    }

    state.zoom = new_zoom;
    state.view_offset = new_offset;
    clamp_offset(state);

    log::debug!(
        "Zoom: {:.2}, Offset: [{:.1}, {:.1}]",
        state.zoom,
        state.view_offset[0],
        state.view_offset[1]
    );
}

/// Left paints cells alive, right kills them, middle drags the view.
pub fn handle_mouse_input(state: &mut State, button: MouseButton, element_state: ElementState) {
    let is_pressed = element_state == ElementState::Pressed;
    match button {
        MouseButton::Left => {
            state.is_left_mouse_pressed = is_pressed;
            if is_pressed {
                if let Some(pos) = state.cursor_pos {
                    state.paint_cells(pos, true);
                }
            }
        }
        MouseButton::Right => {
            state.is_right_mouse_pressed = is_pressed;
            if is_pressed {
                if let Some(pos) = state.cursor_pos {
                    state.paint_cells(pos, false);
                }
            }
        }
        MouseButton::Middle => {
            state.is_middle_mouse_pressed = is_pressed;
            if !is_pressed {
                state.last_mouse_pos = None;
            }
        }
        _ => {}
    }
}

pub fn handle_cursor_move(state: &mut State, position: PhysicalPosition<f64>) {
    state.cursor_pos = Some(position);

    if state.is_middle_mouse_pressed {
        if let Some(last_pos) = state.last_mouse_pos {
            let dx_screen = position.x - last_pos.x;
            let dy_screen = position.y - last_pos.y;

            // Map mouse movement (screen delta) directly to view offset for
            // consistent panning speed.
            state.view_offset[0] -= dx_screen as f32;
            state.view_offset[1] -= dy_screen as f32;

            clamp_offset(state);
        }
        state.last_mouse_pos = Some(position);
    } else {
        state.last_mouse_pos = None;
    }

    // Dragging with a paint button held keeps painting
    if state.is_left_mouse_pressed {
        state.paint_cells(position, true);
    } else if state.is_right_mouse_pressed {
        state.paint_cells(position, false);
    }
}

pub fn handle_cursor_left(state: &mut State) {
    state.cursor_pos = None;
    // Keep the pressed flags so a drag can continue if the cursor
    // momentarily leaves and re-enters the window.
    state.last_mouse_pos = None;
}

// Clamp view_offset so the visible area never moves outside the grid
fn clamp_offset(state: &mut State) {
    let (grid_w, grid_h) = match &state.session.grid {
        Some(grid) => (grid.size_x() as f32, grid.size_y() as f32),
        None => (0.0, 0.0),
    };
    let max_x = (grid_w * state.zoom - state.size.width as f32).max(0.0);
    let max_y = (grid_h * state.zoom - state.size.height as f32).max(0.0);

    state.view_offset[0] = state.view_offset[0].clamp(0.0, max_x);
    state.view_offset[1] = state.view_offset[1].clamp(0.0, max_y);
}

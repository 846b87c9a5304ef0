// Declare modules directly in the binary crate root
pub mod grid;
pub mod input;
pub mod menu;
pub mod patterns;
pub mod render;
pub mod save;
pub mod session;
pub mod state;

// Use types/functions from the declared modules
use crate::state::State;

use std::sync::Arc;
use winit::{
    event::{Event, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::Window,
};

const WINDOW_WIDTH: f64 = 1024.0;
const WINDOW_HEIGHT: f64 = 768.0;

async fn run(event_loop: EventLoop<()>, window: Arc<Window>) {
    let mut state = State::new(window).await;

    event_loop
        .run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent {
                    window_id,
                    ref event,
                } if window_id == state.window.id() => {
                    // Pass window-specific events to egui_winit first
                    let response = state.egui_winit_state.on_window_event(&state.window, event);

                    if response.repaint {
                        state.window.request_redraw();
                    }

                    // If egui consumed the event, skip further processing
                    // unless it was a Resize event, which must be handled
                    // regardless.
                    let consumed_by_egui =
                        response.consumed && !matches!(event, WindowEvent::Resized(_));
                    if consumed_by_egui {
                        return;
                    }

                    match event {
                        WindowEvent::CloseRequested => {
                            window_target.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            state.resize(*new_size);
                        }
                        WindowEvent::KeyboardInput {
                            event: key_event, ..
                        } => {
                            if let Some(cmd) = input::parse_key(key_event) {
                                let was_in_sim = state.session.is_in_sim();
                                if state.session.handle_command(cmd) {
                                    window_target.exit();
                                    return;
                                }
                                if !was_in_sim && state.session.is_in_sim() {
                                    state.reset_view();
                                }
                            }
                        }
                        WindowEvent::MouseInput {
                            state: element_state,
                            button,
                            ..
                        } => {
                            input::handle_mouse_input(&mut state, *button, *element_state);
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            input::handle_cursor_move(&mut state, *position);
                        }
                        WindowEvent::CursorLeft { .. } => {
                            input::handle_cursor_left(&mut state);
                        }
                        WindowEvent::MouseWheel { delta, .. } => {
                            let scroll_amount = match delta {
                                MouseScrollDelta::LineDelta(_, y) => *y,
                                MouseScrollDelta::PixelDelta(pos) => {
                                    if pos.y.abs() > 0.0 {
                                        (pos.y / 20.0) as f32
                                    } else {
                                        0.0
                                    }
                                }
                            };
                            if scroll_amount != 0.0 && state.session.is_in_sim() {
                                input::handle_zoom(&mut state, scroll_amount);
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            // Step the simulation (if due) and render the
                            // grid; egui draws on the returned frame.
                            let output_frame = match state.update_and_render() {
                                Ok(frame) => frame,
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::OutOfMemory) => {
                                    // Surface lost or OOM: resize() was
                                    // called internally if Lost. Skip the
                                    // frame and request a redraw.
                                    log::warn!("Skipping frame due to surface error.");
                                    state.window.request_redraw();
                                    return;
                                }
                                Err(err) => {
                                    // Timeout/Outdated are temporary; skip
                                    // the frame and request a redraw.
                                    log::warn!("Skipping frame due to surface {:?}", err);
                                    state.window.request_redraw();
                                    return;
                                }
                            };

                            let output_view = output_frame
                                .texture
                                .create_view(&wgpu::TextureViewDescriptor::default());

                            // Begin egui frame
                            let raw_input =
                                state.egui_winit_state.take_egui_input(&state.window);
                            let egui_ctx = state.egui_ctx.clone();
                            egui_ctx.begin_frame(raw_input);

                            let was_in_sim = state.session.is_in_sim();
                            let exit_requested = menu::draw(&egui_ctx, &mut state);
                            if !was_in_sim && state.session.is_in_sim() {
                                state.reset_view();
                            }

                            // End egui frame
                            let full_output = egui_ctx.end_frame();
                            let paint_jobs = egui_ctx.tessellate(
                                full_output.shapes,
                                state.window.scale_factor() as f32,
                            );
                            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                                size_in_pixels: [state.config.width, state.config.height],
                                pixels_per_point: state.window.scale_factor() as f32,
                            };

                            // Upload egui data to GPU
                            let mut encoder = state.device.create_command_encoder(
                                &wgpu::CommandEncoderDescriptor {
                                    label: Some("egui Encoder"),
                                },
                            );
                            for (id, image_delta) in &full_output.textures_delta.set {
                                state.egui_renderer.update_texture(
                                    &state.device,
                                    &state.queue,
                                    *id,
                                    image_delta,
                                );
                            }
                            let _tdelta = state.egui_renderer.update_buffers(
                                &state.device,
                                &state.queue,
                                &mut encoder,
                                &paint_jobs,
                                &screen_descriptor,
                            );
                            state.egui_winit_state.handle_platform_output(
                                &state.window,
                                full_output.platform_output,
                            );

                            // Render egui on top of the grid render
                            {
                                let mut render_pass =
                                    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                                        label: Some("egui Render Pass"),
                                        color_attachments: &[Some(
                                            wgpu::RenderPassColorAttachment {
                                                view: &output_view,
                                                resolve_target: None,
                                                ops: wgpu::Operations {
                                                    load: wgpu::LoadOp::Load,
                                                    store: wgpu::StoreOp::Store,
                                                },
                                            },
                                        )],
                                        depth_stencil_attachment: None,
                                        timestamp_writes: None,
                                        occlusion_query_set: None,
                                    });

                                state.egui_renderer.render(
                                    &mut render_pass,
                                    &paint_jobs,
                                    &screen_descriptor,
                                );
                            }

                            // Free texture delta
                            for id in &full_output.textures_delta.free {
                                state.egui_renderer.free_texture(id);
                            }

                            // Submit egui command buffer and present
                            state.queue.submit(Some(encoder.finish()));
                            output_frame.present();

                            if exit_requested {
                                window_target.exit();
                            }
                        }
                        _ => (),
                    }
                }
                Event::AboutToWait => {
                    state.window.request_redraw();
                }
                _ => (),
            }
        })
        .unwrap();
}

fn main() {
    env_logger::init();
    let event_loop = EventLoop::new().unwrap();

    let initial_size = winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT);

    let window = Arc::new(
        winit::window::WindowBuilder::new()
            .with_title("Game of Life")
            .with_inner_size(initial_size)
            .build(&event_loop)
            .unwrap(),
    );

    pollster::block_on(run(event_loop, window));
}

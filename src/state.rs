use crate::render::{
    create_render_bind_group, create_render_bind_group_layout, GridParams, ViewParams,
    DEFAULT_ZOOM,
};
use crate::patterns::Pattern;
use crate::session::{Screen, Session};
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalPosition, window::Window};
use std::sync::Arc;

// GUI Imports
use egui::Context as EguiContext;
use egui_wgpu::Renderer as EguiWgpuRenderer;
use egui_winit::State as EguiWinitState;

/// Initial capacity of the cell snapshot buffer, in cells.
const INITIAL_SNAPSHOT_CAPACITY: usize = 1 << 16;

pub struct State {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    pub session: Session,

    // --- Grid display resources ---
    /// CPU staging for the per-frame cell snapshot (1.0 alive, 0.5 ghost,
    /// 0.0 dead), reused between frames.
    cell_snapshot: Vec<f32>,
    cell_buffer: wgpu::Buffer,
    /// Allocated snapshot buffer size in cells; grows monotonically like
    /// the grid itself.
    cell_buffer_capacity: usize,
    grid_param_buffer: wgpu::Buffer,
    view_param_buffer: wgpu::Buffer,
    render_pipeline: wgpu::RenderPipeline,
    render_bind_group_layout: wgpu::BindGroupLayout,
    render_bind_group: wgpu::BindGroup,
    // --- End grid display ---

    pub zoom: f32,
    pub view_offset: [f32; 2], // Current view offset (in screen pixels)
    pub is_left_mouse_pressed: bool,
    pub is_right_mouse_pressed: bool,
    pub is_middle_mouse_pressed: bool,
    pub last_mouse_pos: Option<PhysicalPosition<f64>>,
    pub cursor_pos: Option<PhysicalPosition<f64>>, // For zoom centering

    // GUI state
    pub egui_ctx: EguiContext,
    pub egui_winit_state: EguiWinitState,
    pub egui_renderer: EguiWgpuRenderer,
    pub selected_pattern: usize,
}

impl State {
    pub async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        log::info!("Initializing wgpu...");

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window.clone()).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .expect("Failed to find an appropriate adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps.formats[0];

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![surface_format.into()],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Grid display resources. The snapshot buffer starts at a fixed
        // capacity and is regrown when a larger grid needs uploading.
        let cell_buffer = Self::create_cell_buffer(&device, INITIAL_SNAPSHOT_CAPACITY);

        let grid_param_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Parameters"),
            contents: bytemuck::bytes_of(&GridParams {
                width: 0,
                height: 0,
                _pad: [0; 2],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let initial_zoom = DEFAULT_ZOOM;
        let initial_view_offset = [0.0, 0.0];
        let view_param_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("View Parameters"),
            contents: bytemuck::bytes_of(&ViewParams {
                zoom: initial_zoom,
                show_ghosts: 1,
                view_offset: initial_view_offset,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let render_shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Render Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../render.wgsl").into()),
        });

        let render_bind_group_layout = create_render_bind_group_layout(&device);
        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&render_bind_group_layout],
                push_constant_ranges: &[],
            });
        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &render_shader_module,
                entry_point: "vs_main",
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &render_shader_module,
                entry_point: "fs_main",
                targets: &[Some(config.format.into())],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });
        let render_bind_group = create_render_bind_group(
            &device,
            &render_bind_group_layout,
            &grid_param_buffer,
            &cell_buffer,
            &view_param_buffer,
        );

        log::info!("Initializing egui...");
        let egui_ctx = EguiContext::default();
        let egui_winit_state =
            EguiWinitState::new(egui_ctx.clone(), egui_ctx.viewport_id(), &window, None, None);
        let egui_renderer = EguiWgpuRenderer::new(&device, config.format, None, 1);
        log::info!("egui initialized.");

        log::info!("wgpu initialized successfully.");

        Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            session: Session::new(),
            cell_snapshot: Vec::new(),
            cell_buffer,
            cell_buffer_capacity: INITIAL_SNAPSHOT_CAPACITY,
            grid_param_buffer,
            view_param_buffer,
            render_pipeline,
            render_bind_group_layout,
            render_bind_group,
            zoom: initial_zoom,
            view_offset: initial_view_offset,
            is_left_mouse_pressed: false,
            is_right_mouse_pressed: false,
            is_middle_mouse_pressed: false,
            last_mouse_pos: None,
            cursor_pos: None,
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            selected_pattern: 0,
        }
    }

    fn create_cell_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Cell Snapshot Buffer"),
            size: (capacity * std::mem::size_of::<f32>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            log::info!("Reconfigured surface to {}x{}", new_size.width, new_size.height);
        } else {
            log::warn!(
                "Ignoring resize to zero dimensions: {}x{}",
                new_size.width,
                new_size.height
            );
        }
    }

    /// Resets zoom and pan to the defaults. Called when a simulation opens.
    pub fn reset_view(&mut self) {
        self.zoom = DEFAULT_ZOOM;
        self.view_offset = [0.0, 0.0];
    }

    /// Grows the snapshot buffer if `cells` does not fit, recreating the
    /// bind group that references it.
    fn ensure_cell_capacity(&mut self, cells: usize) {
        if cells <= self.cell_buffer_capacity {
            return;
        }
        let new_capacity = cells.next_power_of_two();
        log::debug!(
            "Growing cell snapshot buffer: {} -> {} cells",
            self.cell_buffer_capacity,
            new_capacity
        );
        self.cell_buffer = Self::create_cell_buffer(&self.device, new_capacity);
        self.cell_buffer_capacity = new_capacity;
        self.render_bind_group = create_render_bind_group(
            &self.device,
            &self.render_bind_group_layout,
            &self.grid_param_buffer,
            &self.cell_buffer,
            &self.view_param_buffer,
        );
    }

    /// Encodes the grid's current state into the snapshot buffer and
    /// updates the display uniforms.
    fn upload_snapshot(&mut self) {
        let Some(grid) = &self.session.grid else {
            return;
        };
        let (width, height) = (grid.size_x(), grid.size_y());
        self.cell_snapshot.clear();
        self.cell_snapshot.reserve((width as usize) * (height as usize));
        for row in grid.rows() {
            self.cell_snapshot.extend(row.iter().map(|cell| {
                if cell.state {
                    1.0
                } else if cell.was_alive {
                    0.5
                } else {
                    0.0
                }
            }));
        }

        self.ensure_cell_capacity(self.cell_snapshot.len());
        if !self.cell_snapshot.is_empty() {
            self.queue
                .write_buffer(&self.cell_buffer, 0, bytemuck::cast_slice(&self.cell_snapshot));
        }
        self.queue.write_buffer(
            &self.grid_param_buffer,
            0,
            bytemuck::bytes_of(&GridParams {
                width,
                height,
                _pad: [0; 2],
            }),
        );
    }

    /// Advances the simulation if a tick is due, renders the grid on the
    /// simulation screens, and returns the surface texture for egui to
    /// draw on.
    pub fn update_and_render(&mut self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.session.tick();

        // The grid stays visible behind the in-simulation menu overlay.
        let grid_visible =
            matches!(self.session.screen, Screen::Sim { .. } | Screen::SimMenu)
                && self.session.grid.is_some();

        if grid_visible {
            self.upload_snapshot();
            self.queue.write_buffer(
                &self.view_param_buffer,
                0,
                bytemuck::bytes_of(&ViewParams {
                    zoom: self.zoom,
                    show_ghosts: self.session.settings.show_ghosts as u32,
                    view_offset: self.view_offset,
                }),
            );
        }

        let output_frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost) => {
                log::warn!("Surface lost, recreating...");
                self.resize(self.size);
                return Err(wgpu::SurfaceError::Lost);
            }
            Err(e) => {
                log::error!("Failed to acquire next swap chain texture: {:?}", e);
                return Err(e);
            }
        };

        let output_view = output_frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut render_encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = render_encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &output_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if grid_visible {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.render_bind_group, &[]);
                render_pass.draw(0..3, 0..1); // Draw full-screen triangle
            }
        }
        self.queue.submit(Some(render_encoder.finish()));

        // Return the frame so egui can render to it
        Ok(output_frame)
    }

    /// Paints cells under the cursor: left button revives, right button
    /// kills. Painting outside the current bounds grows the grid.
    pub fn paint_cells(&mut self, screen_pos: PhysicalPosition<f64>, alive: bool) {
        if !self.session.is_in_sim() {
            return;
        }
        // Convert screen pos to grid coordinate under current zoom & offset
        let x_world = ((screen_pos.x as f32) + self.view_offset[0]) / self.zoom;
        let y_world = ((screen_pos.y as f32) + self.view_offset[1]) / self.zoom;
        let gx = x_world.floor() as i64;
        let gy = y_world.floor() as i64;

        let brush = self.session.settings.brush_radius as i64;
        let Some(grid) = &mut self.session.grid else {
            return;
        };
        // Square brush of size (2*R+1)^2; positions left of / above the
        // grid are skipped rather than written.
        for by in -brush..=brush {
            for bx in -brush..=brush {
                let (cx, cy) = (gx + bx, gy + by);
                if cx < 0 || cy < 0 {
                    continue;
                }
                let write = if alive {
                    grid.set_alive(cx as u32, cy as u32)
                } else {
                    grid.set_dead(cx as u32, cy as u32)
                };
                if let Err(err) = write {
                    log::error!("paint failed: {err}");
                    self.session.status = Some(format!("Grid growth failed: {err}"));
                    return;
                }
            }
        }
    }

    /// Places a seed pattern with its top-left corner at the cell in the
    /// center of the current view.
    pub fn place_pattern(&mut self, pattern: Pattern) {
        let cx = ((self.size.width as f32 / 2.0 + self.view_offset[0]) / self.zoom).floor();
        let cy = ((self.size.height as f32 / 2.0 + self.view_offset[1]) / self.zoom).floor();
        let (cx, cy) = (cx.max(0.0) as u32, cy.max(0.0) as u32);
        let Some(grid) = &mut self.session.grid else {
            return;
        };
        if let Err(err) = pattern.place(grid, cx, cy) {
            log::error!("pattern placement failed: {err}");
            self.session.status = Some(format!("Grid growth failed: {err}"));
        }
    }
}

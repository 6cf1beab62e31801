use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;
use std::path::Path;

use cgmath::Matrix4;

use log::info;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{ElementState, Event, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use gl_wrapper::geometry::{Geometry, GeometryBuilder, GeometryError, VertexLayout};
use gl_wrapper::program::{LinkError, Program, ProgramBuilder};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::shader::{CompileError, ShaderStage, ShaderUnit};
use gl_wrapper::texture::{Texture2D, TextureError};

use crate::args::Args;
use crate::assets::{self, AssetError};
use crate::frame::{self, FrameClock};

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;

/// Interleaved quad vertices: position (2), color (3), texture coordinate (2).
#[rustfmt::skip]
const QUAD_VERTICES: [f32; 28] = [
    -0.5,  0.5,   1.0, 0.0, 0.0,   0.0, 0.0,
     0.5,  0.5,   0.0, 1.0, 0.0,   1.0, 0.0,
     0.5, -0.5,   0.0, 0.0, 1.0,   1.0, 1.0,
    -0.5, -0.5,   1.0, 1.0, 1.0,   0.0, 1.0,
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
}

impl App {
    /// Opens the fixed-size window, creates a core 3.2 context, makes it
    /// current, and loads the GL function pointers.
    pub fn new() -> Self {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT)))
            .with_resizable(false)
            .with_title("Textured quad");
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |mut configs| configs.next().unwrap())
            .unwrap();

        let handle = window.as_ref().map(|w| w.raw_window_handle());
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 2))))
            .with_profile(GlProfile::Core)
            .build(handle);

        let gl_window = GlWindow::new(window.unwrap(), &gl_config);

        let gl_context = unsafe {
            gl_display
                .create_context(&gl_config, &context_attr)
                .unwrap()
        }
        .make_current(&gl_window.surface)
        .unwrap();

        gl::load_with(|s| {
            gl_display
                .get_proc_address(CString::new(s).unwrap().as_c_str())
                .cast()
        });

        info!("created {WINDOW_WIDTH}x{WINDOW_HEIGHT} window with a core 3.2 context");

        Self {
            event_loop,
            gl_context,
            gl_window,
        }
    }

    /// Runs the frame loop until the window reports a close request or
    /// Escape asks the loop to exit on its next poll.
    pub fn run(self, scene: Scene) -> ! {
        let mut renderer = GlRenderer::new();

        renderer.use_program(&scene.program);

        // samplers and camera do not change for the lifetime of the run
        push_i32(&scene.program, scene.program.uniform_slot("tex_base"), 0);
        push_i32(&scene.program, scene.program.uniform_slot("tex_overlay"), 1);
        push_mat4(
            &scene.program,
            scene.program.uniform_slot("view"),
            frame::view_matrix(),
        );
        push_mat4(
            &scene.program,
            scene.program.uniform_slot("proj"),
            frame::projection_matrix(WINDOW_WIDTH, WINDOW_HEIGHT),
        );

        let clock = FrameClock::start();

        self.event_loop
            .run(move |event, _window_target, control_flow| {
                *control_flow = ControlFlow::Poll;
                match event {
                    Event::MainEventsCleared => {
                        self.gl_window.window.request_redraw();
                    }
                    Event::RedrawRequested(_) => {
                        renderer.clear_color(0.0, 0.0, 0.0);

                        let elapsed = clock.elapsed_secs();

                        push_mat4(&scene.program, scene.uniforms.model, frame::model_matrix(elapsed));
                        push_f32(&scene.program, scene.uniforms.blend, frame::blend_factor(elapsed));

                        renderer.draw(&scene.quad, &scene.program);

                        self.gl_window
                            .surface
                            .swap_buffers(&self.gl_context)
                            .unwrap();
                    }
                    Event::WindowEvent { event, .. } => match event {
                        WindowEvent::KeyboardInput { input, .. } => {
                            if input.virtual_keycode == Some(VirtualKeyCode::Escape)
                                && input.state == ElementState::Pressed
                            {
                                control_flow.set_exit();
                            }
                        }
                        WindowEvent::CloseRequested => control_flow.set_exit(),
                        _ => (),
                    },
                    _ => (),
                }
            })
    }
}

/// Everything the frame loop draws with, built once during setup.
pub struct Scene {
    program: Program,
    quad: Geometry,
    _base: Texture2D,
    _overlay: Texture2D,
    uniforms: UniformSlots,
}

/// Per-frame uniform slots, resolved once after link.
struct UniformSlots {
    model: Option<i32>,
    blend: Option<i32>,
}

impl Scene {
    /// Compiles and links the shader pair, uploads the quad through the
    /// layout binder, and loads both textures onto their units.
    pub fn load(args: &Args) -> Result<Self, SetupError> {
        let vert = ShaderUnit::compile(&args.vertex_shader, ShaderStage::Vertex)?;
        let frag = ShaderUnit::compile(&args.fragment_shader, ShaderStage::Fragment)?;

        let program = ProgramBuilder::new(vert, frag)
            .with_frag_output("out_color", 0)
            .build()?;

        let quad = GeometryBuilder::new(&QUAD_VERTICES)
            .layout(
                VertexLayout::new()
                    .with("position", 2)
                    .with("color", 3)
                    .with("texcoord", 2),
            )
            .indices(&QUAD_INDICES)
            .build(&program)?;

        let base = load_texture(&args.base_texture, 0)?;
        let overlay = load_texture(&args.overlay_texture, 1)?;

        let uniforms = UniformSlots {
            model: program.uniform_slot("model"),
            blend: program.uniform_slot("blend_factor"),
        };

        Ok(Self {
            program,
            quad,
            _base: base,
            _overlay: overlay,
            uniforms,
        })
    }
}

fn load_texture(path: &Path, unit: u32) -> Result<Texture2D, SetupError> {
    let decoded = assets::decode_rgb8(path)?;

    info!(
        "loaded {path:?} ({}x{}) onto texture unit {unit}",
        decoded.width, decoded.height
    );

    Ok(Texture2D::from_rgb8(
        unit,
        decoded.width,
        decoded.height,
        &decoded.pixels,
    )?)
}

fn push_mat4(program: &Program, slot: Option<i32>, matrix: Matrix4<f32>) {
    if let Some(slot) = slot {
        program.set_mat4(slot, matrix.as_ref());
    }
}

fn push_f32(program: &Program, slot: Option<i32>, value: f32) {
    if let Some(slot) = slot {
        program.set_f32(slot, value);
    }
}

fn push_i32(program: &Program, slot: Option<i32>, value: i32) {
    if let Some(slot) = slot {
        program.set_i32(slot, value);
    }
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Decode(#[from] AssetError),
    #[error(transparent)]
    Texture(#[from] TextureError),
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Self {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).unwrap(),
            NonZeroU32::new(height).unwrap(),
        );

        let surface = unsafe {
            config
                .display()
                .create_window_surface(config, &attrs)
                .unwrap()
        };

        Self { window, surface }
    }
}

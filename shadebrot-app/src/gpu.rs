//! Fragment-shader renderer on the eframe glow context.
//!
//! Draws into an offscreen framebuffer and reads the pixels back, so the
//! result is an ordinary [`RenderBuffer`] shown the same way as CPU output.

use std::sync::Arc;

use eframe::glow::{self, HasContext};
use tracing::{debug, error, info};

use shadebrot_core::{FrameParams, Preset};
use shadebrot_render::{ColorRamp, RenderBuffer};

use crate::error::{AppError, Result};
use crate::shader;

/// Offscreen color target sized to the canvas.
struct RenderTarget {
    framebuffer: glow::Framebuffer,
    texture: glow::Texture,
    width: u32,
    height: u32,
}

#[derive(Default)]
struct Uniforms {
    translate: Option<glow::UniformLocation>,
    scale: Option<glow::UniformLocation>,
    aspect: Option<glow::UniformLocation>,
    max_iters: Option<glow::UniformLocation>,
    resolution: Option<glow::UniformLocation>,
    ramp: Option<glow::UniformLocation>,
}

/// GL objects for one preset's shader program.
pub struct GpuRenderer {
    gl: Arc<glow::Context>,
    program: glow::Program,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ramp_texture: glow::Texture,
    uniforms: Uniforms,
    target: Option<RenderTarget>,
}

impl GpuRenderer {
    /// Compile and link the shaders for `preset` and upload its ramp.
    pub fn new(gl: Arc<glow::Context>, preset: &Preset, ramp: &ColorRamp) -> Result<Self> {
        let fragment = shader::fragment_source(preset);
        unsafe {
            let program = compile_program(&gl, shader::VERTEX_SOURCE, &fragment)?;

            let uniforms = Uniforms {
                translate: gl.get_uniform_location(program, "u_translate"),
                scale: gl.get_uniform_location(program, "u_scale"),
                aspect: gl.get_uniform_location(program, "u_aspect"),
                max_iters: gl.get_uniform_location(program, "u_max_iters"),
                resolution: gl.get_uniform_location(program, "u_resolution"),
                ramp: gl.get_uniform_location(program, "u_ramp"),
            };

            let (vao, vbo) = match create_triangle(&gl) {
                Ok(objects) => objects,
                Err(e) => {
                    gl.delete_program(program);
                    return Err(e);
                }
            };

            let ramp_texture = match gl.create_texture() {
                Ok(t) => t,
                Err(e) => {
                    gl.delete_program(program);
                    gl.delete_vertex_array(vao);
                    gl.delete_buffer(vbo);
                    return Err(AppError::Gl(format!("failed to create ramp texture: {e}")));
                }
            };

            let mut renderer = Self {
                gl,
                program,
                vao,
                vbo,
                ramp_texture,
                uniforms,
                target: None,
            };
            renderer.upload_ramp(ramp);
            info!(preset = %preset.name, "GPU backend ready");
            Ok(renderer)
        }
    }

    /// Replace the lookup texture with `ramp`.
    pub fn upload_ramp(&mut self, ramp: &ColorRamp) {
        let bytes = ramp.rgba_bytes();
        let gl = &self.gl;
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(self.ramp_texture));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                ramp.len() as i32,
                1,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(&bytes)),
            );
            gl.bind_texture(glow::TEXTURE_2D, None);
        }
        debug!(len = ramp.len(), "Uploaded color ramp");
    }

    /// Draw one frame and read it back, top row first.
    pub fn render(&mut self, frame: &FrameParams) -> Result<RenderBuffer> {
        let (width, height) = (frame.width, frame.height);
        let framebuffer = self.ensure_target(width, height)?;
        let gl = Arc::clone(&self.gl);
        let mut pixels = vec![0u8; width as usize * height as usize * 4];

        unsafe {
            let mut prev_viewport = [0i32; 4];
            gl.get_parameter_i32_slice(glow::VIEWPORT, &mut prev_viewport);

            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));
            gl.viewport(0, 0, width as i32, height as i32);
            gl.use_program(Some(self.program));
            gl.bind_vertex_array(Some(self.vao));
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.ramp_texture));

            let vp = &frame.viewport;
            gl.uniform_2_f32(
                self.uniforms.translate.as_ref(),
                vp.offset.re as f32,
                vp.offset.im as f32,
            );
            gl.uniform_1_f32(self.uniforms.scale.as_ref(), vp.scale as f32);
            gl.uniform_1_f32(self.uniforms.aspect.as_ref(), vp.aspect_ratio as f32);
            gl.uniform_1_i32(
                self.uniforms.max_iters.as_ref(),
                frame.escape.max_iterations().min(i32::MAX as u32) as i32,
            );
            gl.uniform_2_f32(self.uniforms.resolution.as_ref(), width as f32, height as f32);
            gl.uniform_1_i32(self.uniforms.ramp.as_ref(), 0);

            gl.draw_arrays(glow::TRIANGLES, 0, 3);

            let draw_error = gl.get_error();
            if draw_error == glow::NO_ERROR {
                gl.read_pixels(
                    0,
                    0,
                    width as i32,
                    height as i32,
                    glow::RGBA,
                    glow::UNSIGNED_BYTE,
                    glow::PixelPackData::Slice(Some(&mut pixels)),
                );
            }

            gl.bind_texture(glow::TEXTURE_2D, None);
            gl.bind_vertex_array(None);
            gl.use_program(None);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.viewport(prev_viewport[0], prev_viewport[1], prev_viewport[2], prev_viewport[3]);

            if draw_error != glow::NO_ERROR {
                return Err(AppError::Gl(format!("draw failed with error 0x{draw_error:X}")));
            }
        }

        Ok(RenderBuffer::from_bottom_up(width, height, pixels)?)
    }

    /// (Re)create the offscreen target when the canvas size changes.
    fn ensure_target(&mut self, width: u32, height: u32) -> Result<glow::Framebuffer> {
        if let Some(t) = &self.target {
            if t.width == width && t.height == height {
                return Ok(t.framebuffer);
            }
        }
        self.release_target();

        let gl = &self.gl;
        unsafe {
            let texture = gl
                .create_texture()
                .map_err(|e| AppError::Gl(format!("failed to create target texture: {e}")))?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(None),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);

            let framebuffer = match gl.create_framebuffer() {
                Ok(fb) => fb,
                Err(e) => {
                    gl.bind_texture(glow::TEXTURE_2D, None);
                    gl.delete_texture(texture);
                    return Err(AppError::Gl(format!("failed to create framebuffer: {e}")));
                }
            };
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(texture),
                0,
            );
            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.bind_texture(glow::TEXTURE_2D, None);

            if status != glow::FRAMEBUFFER_COMPLETE {
                gl.delete_framebuffer(framebuffer);
                gl.delete_texture(texture);
                return Err(AppError::Gl(format!("framebuffer incomplete: 0x{status:X}")));
            }

            debug!(width, height, "Created offscreen target");
            self.target = Some(RenderTarget {
                framebuffer,
                texture,
                width,
                height,
            });
            Ok(framebuffer)
        }
    }

    fn release_target(&mut self) {
        if let Some(t) = self.target.take() {
            unsafe {
                self.gl.delete_framebuffer(t.framebuffer);
                self.gl.delete_texture(t.texture);
            }
        }
    }

    /// Delete every GL object. Must run while the context is still current.
    pub fn destroy(mut self) {
        self.release_target();
        unsafe {
            self.gl.delete_texture(self.ramp_texture);
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_program(self.program);
        }
    }
}

/// Vertex array and buffer holding [`shader::FULLSCREEN_TRIANGLE`].
unsafe fn create_triangle(gl: &glow::Context) -> Result<(glow::VertexArray, glow::Buffer)> {
    let vao = gl
        .create_vertex_array()
        .map_err(|e| AppError::Gl(format!("failed to create vertex array: {e}")))?;
    let vbo = match gl.create_buffer() {
        Ok(b) => b,
        Err(e) => {
            gl.delete_vertex_array(vao);
            return Err(AppError::Gl(format!("failed to create vertex buffer: {e}")));
        }
    };

    let bytes: Vec<u8> = shader::FULLSCREEN_TRIANGLE
        .iter()
        .flat_map(|v| v.to_ne_bytes())
        .collect();

    gl.bind_vertex_array(Some(vao));
    gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
    gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, &bytes, glow::STATIC_DRAW);
    gl.enable_vertex_attrib_array(0);
    gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, 0, 0);
    gl.bind_vertex_array(None);
    gl.bind_buffer(glow::ARRAY_BUFFER, None);

    Ok((vao, vbo))
}

/// Compile both stages and link them. The compiler log is attached to the
/// error and logged.
unsafe fn compile_program(
    gl: &glow::Context,
    vertex: &str,
    fragment: &str,
) -> Result<glow::Program> {
    let program = gl
        .create_program()
        .map_err(|e| AppError::Gl(format!("failed to create program: {e}")))?;

    let stages = [
        (glow::VERTEX_SHADER, "vertex", vertex),
        (glow::FRAGMENT_SHADER, "fragment", fragment),
    ];
    let mut shaders = Vec::with_capacity(stages.len());

    for (kind, stage, source) in stages {
        let shader = match gl.create_shader(kind) {
            Ok(s) => s,
            Err(e) => {
                delete_all(gl, program, &shaders);
                return Err(AppError::Gl(format!("failed to create {stage} shader: {e}")));
            }
        };
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            error!("{stage} shader compile error:\n{log}");
            gl.delete_shader(shader);
            delete_all(gl, program, &shaders);
            return Err(AppError::ShaderCompile { stage, log });
        }
        gl.attach_shader(program, shader);
        shaders.push(shader);
    }

    gl.link_program(program);
    if !gl.get_program_link_status(program) {
        let log = gl.get_program_info_log(program);
        error!("shader link error:\n{log}");
        delete_all(gl, program, &shaders);
        return Err(AppError::ProgramLink(log));
    }

    for shader in shaders {
        gl.detach_shader(program, shader);
        gl.delete_shader(shader);
    }
    Ok(program)
}

unsafe fn delete_all(gl: &glow::Context, program: glow::Program, shaders: &[glow::Shader]) {
    for &shader in shaders {
        gl.detach_shader(program, shader);
        gl.delete_shader(shader);
    }
    gl.delete_program(program);
}

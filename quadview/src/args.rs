use clap::Parser;

use std::path::PathBuf;

#[derive(Debug, Parser)]
pub struct Args {
    /// Path to the vertex shader source
    #[arg(long, default_value_os_t = PathBuf::from("shaders/vertex_shader.glsl"))]
    pub vertex_shader: PathBuf,
    /// Path to the fragment shader source
    #[arg(long, default_value_os_t = PathBuf::from("shaders/fragment_shader.glsl"))]
    pub fragment_shader: PathBuf,
    /// Image sampled on texture unit 0
    #[arg(long, default_value_os_t = PathBuf::from("assets/sample.png"))]
    pub base_texture: PathBuf,
    /// Image sampled on texture unit 1
    #[arg(long, default_value_os_t = PathBuf::from("assets/sample2.png"))]
    pub overlay_texture: PathBuf,
}

use thiserror::Error;

/// Errors raised by the windowed frontend and its GPU backend.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{stage} shader failed to compile:\n{log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("shader program failed to link:\n{0}")]
    ProgramLink(String),

    #[error("OpenGL error: {0}")]
    Gl(String),

    #[error(transparent)]
    Render(#[from] shadebrot_render::RenderError),

    #[error(transparent)]
    Core(#[from] shadebrot_core::CoreError),
}

pub type Result<T> = std::result::Result<T, AppError>;

//! # Shader Forge (Binary)
//!
//! Main executable entry point.

fn main() -> std::process::ExitCode {
    shader_forge_app::run()
}

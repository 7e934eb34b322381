// Main entry point that forwards to the shader-forge-app binary
fn main() -> std::process::ExitCode {
    // Exit with the same code as the app
    shader_forge_app::run()
}

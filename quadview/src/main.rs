use clap::Parser;

use log::error;

mod app;
mod args;
mod assets;
mod frame;

use gl_wrapper::program::LinkError;
use gl_wrapper::shader::CompileError;

use app::{App, Scene, SetupError};
use args::Args;

fn main() {
    env_logger::init();

    let args = <Args as Parser>::parse();

    let app = App::new();

    let scene = match Scene::load(&args) {
        Ok(scene) => scene,
        Err(e) => {
            // driver diagnostics go to stdout, the failure itself to the log
            match &e {
                SetupError::Compile(CompileError::CompilationFailed { shader, .. }) => {
                    println!("{}", shader.info_log());
                }
                SetupError::Link(LinkError::LinkFailed(log)) => {
                    println!("{log}");
                }
                _ => (),
            }

            error!("setup failed: {e}");
            std::process::exit(1);
        }
    };

    app.run(scene);
}

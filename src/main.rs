extern crate env_logger;
extern crate hello_triangles;
#[macro_use]
extern crate log;

use hello_triangles::Config;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match hello_triangles::run(Config::default()) {
        Ok(stats) => debug!("rendered {} frames", stats.frames),
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}

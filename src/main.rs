mod app;
mod cli;

use clap::Parser;

use cli::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("masonry_gallery=info".parse().unwrap())
                .add_directive("mgallery=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = app::run(cli) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

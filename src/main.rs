use loopcarousel::app::CarouselApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("loopcarousel=info".parse().unwrap()),
        )
        .init();

    let app = CarouselApp::new();
    std::process::exit(app.run());
}

use harness::cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // Interrupt causes an immediate exit; the handler lives only for the
    // duration of this invocation.
    let exit_code = tokio::select! {
        code = cli::run(&args) => code,
        _ = tokio::signal::ctrl_c() => 130,
    };

    std::process::exit(exit_code);
}

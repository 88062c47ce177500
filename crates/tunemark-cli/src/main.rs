use tunemark_core::logging;

mod cli;

#[tokio::main]
async fn main() {
    // File logging first; stderr if the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = cli::run_from_args().await {
        eprintln!("tunemark error: {:#}", err);
        std::process::exit(1);
    }
}

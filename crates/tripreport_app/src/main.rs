mod platform;

fn main() -> std::process::ExitCode {
    if let Err(err) = platform::run_app() {
        eprintln!("tripreport failed: {err}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

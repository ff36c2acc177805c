fn main() {
    if let Err(e) = speedcmp_cli::run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

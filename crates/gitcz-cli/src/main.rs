fn main() {
    if let Err(error) = gitcz_cli::run() {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}

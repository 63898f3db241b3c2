fn main() {
    if let Err(err) = userop::cli::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

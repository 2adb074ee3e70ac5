fn main() {
    if let Err(e) = geminal::cli::main() {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

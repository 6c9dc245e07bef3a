fn main() {
    if let Err(e) = bmap_decoder::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

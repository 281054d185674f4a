fn main() {
    if let Err(e) = marquee::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

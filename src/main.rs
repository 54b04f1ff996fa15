fn main() {
    if let Err(err) = canvas_mindmap::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

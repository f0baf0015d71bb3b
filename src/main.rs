use std::process;

fn main() {
    if let Err(err) = paceline::app::run() {
        eprintln!("fatal: {err}");
        process::exit(1);
    }
}

use std::process;

fn main() {
    process::exit(baler_cli::run());
}

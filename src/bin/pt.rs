//! Short alias for the `promptitecture` command.

fn main() {
    std::process::exit(promptitecture::cli_main());
}

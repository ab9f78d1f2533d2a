fn main() {
    std::process::exit(promptitecture::cli_main());
}

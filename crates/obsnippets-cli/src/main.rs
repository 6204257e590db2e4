fn main() {
    obsnippets_cli::run_main();
}

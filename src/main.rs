fn main() {
    let cli = social_extract::cli::parse();
    let code = social_extract::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}

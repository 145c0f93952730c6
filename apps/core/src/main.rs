use clap::Parser;

fn main() {
    let cli = cmdsearch_core::runtime::Cli::parse();

    if let Err(error) = cmdsearch_core::runtime::run(cli) {
        eprintln!("[cmdsearch-core] {error}");
        std::process::exit(1);
    }
}

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the four recipe CSV tables
    #[arg(short, long, default_value = "data")]
    pub data_dir: String,

    /// Address to bind the HTTP server on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    pub bind: String,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

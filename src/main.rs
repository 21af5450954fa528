mod cli;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match cli::run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("pgcompare: {err:#}");
            ExitCode::from(2)
        }
    }
}

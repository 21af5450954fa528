use anyhow::Result;
use clap::{Parser, Subcommand};
use pgcompare::api::{self, CompareOptions, SaveOptions};
use pgcompare::report;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pgcompare")]
#[command(about = "Compare the schemas of two PostgreSQL databases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two databases or saved snapshot files and show differences
    Compare {
        /// First side: connection URL, or path to a saved snapshot
        target_a: String,
        /// Second side: connection URL, or path to a saved snapshot
        target_b: String,
        /// Schemas to compare (default: all non-system schemas)
        #[arg(long = "schema")]
        schemas: Vec<String>,
        /// Ignore all partitions (relations that have parents)
        #[arg(long)]
        ignore_partitions: bool,
    },

    /// Capture a database schema snapshot to a file
    Save {
        /// Connection URL of the database to capture
        database: String,
        /// Output file for the snapshot
        output: String,
        /// Schemas to capture (default: all non-system schemas)
        #[arg(long = "schema")]
        schemas: Vec<String>,
        /// Ignore all partitions (relations that have parents)
        #[arg(long)]
        ignore_partitions: bool,
    },
}

/// Exit status: 0 = no differences, 1 = differences found. Operational
/// failures bubble up as errors and exit with 2 from `main`.
pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            target_a,
            target_b,
            schemas,
            ignore_partitions,
        } => {
            let mut options = CompareOptions::new(target_a, target_b).with_schemas(schemas);
            if ignore_partitions {
                options = options.ignore_partitions();
            }

            let result = api::compare(options).await?;
            for line in &result.lines {
                println!("{line}");
            }
            println!("{}", report::summary(result.count));

            Ok(if result.is_identical {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }

        Commands::Save {
            database,
            output,
            schemas,
            ignore_partitions,
        } => {
            let mut options = SaveOptions::new(database, output).with_schemas(schemas);
            if ignore_partitions {
                options = options.ignore_partitions();
            }

            let result = api::save(options).await?;
            println!(
                "Wrote {} ({} objects, fingerprint {})",
                result.path, result.object_count, result.fingerprint
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

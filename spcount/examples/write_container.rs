//! Convert any supported input into a `.csc` container

use std::path::PathBuf;

use clap::Parser;
use spcount::{ContainerFile, ReadOptions, Representation, SpcountError};

#[derive(Parser, Debug)]
#[command(name = "write_container")]
#[command(about = "Convert a sparse count matrix into a memory-mapped CSC container")]
#[command(version)]
struct Args {
    /// Input file or 10x directory
    input: PathBuf,

    /// Output `.csc` path
    output: PathBuf,

    /// Genome group for legacy inputs
    #[arg(short, long)]
    genome: Option<String>,
}

fn main() -> Result<(), SpcountError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let mut options = ReadOptions::default().with_representation(Representation::Svt);
    if let Some(genome) = args.genome {
        options = options.with_genome(genome);
    }

    let matrix = spcount::read_sparse_matrix(&args.input, &options)?
        .into_svt()
        .ok_or(SpcountError::Usage("expected an SVT matrix"))?;
    spcount::write_container(&args.output, &matrix)?;

    let container = ContainerFile::open(&args.output)?;
    tracing::info!(
        output = %args.output.display(),
        datasets = container.dataset_paths().len(),
        "wrote {} x {} matrix",
        matrix.nrow(),
        matrix.ncol()
    );
    for path in container.dataset_paths() {
        println!("{path}");
    }
    Ok(())
}

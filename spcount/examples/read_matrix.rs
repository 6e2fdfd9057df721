//! Read a sparse count matrix and print a summary or its host object
//!
//! ```text
//! cargo run --example read_matrix -- filtered_feature_bc_matrix
//! cargo run --example read_matrix -- counts.csv --representation coo --json
//! ```

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use spcount::{HostObject, ReadOptions, Representation, SpcountError};

#[derive(Parser, Debug)]
#[command(name = "read_matrix")]
#[command(about = "Read a sparse count matrix from CSV, Matrix-Market, a 10x bundle or a CSC container")]
#[command(version)]
struct Args {
    /// Input file or 10x directory
    input: PathBuf,

    /// Output representation (coo or svt)
    #[arg(short, long)]
    representation: Option<Representation>,

    /// JSON file holding read options
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Genome group for legacy containers
    #[arg(short, long)]
    genome: Option<String>,

    /// Print the host object as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), SpcountError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut options = match &args.options {
        Some(path) => ReadOptions::from_json_file(path)?,
        None => ReadOptions::default(),
    };
    if let Some(representation) = args.representation {
        options = options.with_representation(representation);
    }
    if let Some(genome) = args.genome {
        options = options.with_genome(genome);
    }

    let start = Instant::now();
    let matrix = spcount::read_sparse_matrix(&args.input, &options)?;
    tracing::info!(elapsed = ?start.elapsed(), "read {}", args.input.display());

    if args.json {
        println!("{}", HostObject::from(&matrix).to_json()?);
        return Ok(());
    }

    let (nrow, ncol, nnz) = (matrix.nrow(), matrix.ncol(), matrix.nnz());
    println!("Matrix Information:");
    println!("   Representation: {}", matrix.representation());
    println!("   Dimensions: {nrow} x {ncol}");
    println!("   Non-zeros: {nnz}");
    if nrow > 0 && ncol > 0 {
        println!(
            "   Density: {:.6}%",
            nnz as f64 / (nrow as f64 * ncol as f64) * 100.0
        );
    }

    let dimnames = matrix.dimnames();
    for (axis, names) in [("Rows", &dimnames.rows), ("Columns", &dimnames.cols)] {
        match names {
            Some(names) => {
                let preview: Vec<&str> = names.iter().take(3).map(String::as_str).collect();
                println!("   {axis}: {} ...", preview.join(", "));
            }
            None => println!("   {axis}: unlabelled"),
        }
    }

    if let Some(svt) = matrix.as_svt() {
        let lacunar = svt.columns().iter().filter(|c| c.is_lacunar()).count();
        let empty = svt.columns().iter().filter(|c| c.is_empty()).count();
        println!("   Lacunar columns: {lacunar}");
        println!("   Empty columns: {empty}");
    }
    Ok(())
}

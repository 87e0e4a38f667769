//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// clinirag - clinical question answering over a local vector index
#[derive(Parser, Debug)]
#[command(name = "clinirag")]
#[command(version)]
#[command(about = "Answer clinical queries from a local corpus with remote fallback", long_about = None)]
pub struct Args {
    /// Configuration file path (defaults to ~/.clinirag/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the vector index from a directory of text documents
    Build {
        /// Directory of source documents (.txt / .md)
        #[arg(value_name = "DOCS_DIR")]
        docs_dir: PathBuf,

        /// Chunk window length in characters
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Characters shared between consecutive chunks
        #[arg(long)]
        chunk_overlap: Option<usize>,
    },

    /// Answer a query against the built corpus
    Query {
        /// The clinical question
        #[arg(value_name = "QUESTION")]
        question: String,

        /// Maximum number of local chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Frame the answer for healthcare professionals
        #[arg(long)]
        professional: bool,
    },

    /// Display current configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_command() {
        let args = Args::parse_from(["clinirag", "build", "docs/", "--chunk-size", "400"]);
        match args.command {
            Commands::Build {
                docs_dir,
                chunk_size,
                chunk_overlap,
            } => {
                assert_eq!(docs_dir, PathBuf::from("docs/"));
                assert_eq!(chunk_size, Some(400));
                assert!(chunk_overlap.is_none());
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn test_parse_query_command() {
        let args = Args::parse_from(["clinirag", "query", "paracetamol dosage", "-k", "3"]);
        match args.command {
            Commands::Query {
                question,
                top_k,
                professional,
            } => {
                assert_eq!(question, "paracetamol dosage");
                assert_eq!(top_k, Some(3));
                assert!(!professional);
            }
            _ => panic!("expected query command"),
        }
    }
}

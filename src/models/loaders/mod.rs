pub mod fasta_loader;

pub use fasta_loader::{is_query_file, load_queries, load_query, scan_query_files};

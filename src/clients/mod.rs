pub mod blast_client;

pub use blast_client::BlastClient;

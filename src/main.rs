//! repo-to-chunks: split a directory tree into fixed-size text chunks
//!
//! Every included text file is written into `chunk<N>.txt` files of a fixed
//! capacity, with delimiter lines marking where each file begins, ends, or
//! continues across a chunk boundary.

use anyhow::Result;

fn main() -> Result<()> {
    repo_to_chunks::cli::run()
}

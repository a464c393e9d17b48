use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// Audio transcription and summarization server
#[derive(Debug, Parser)]
#[command(name = "koe", about = "Transcribe uploaded audio and summarize the transcript")]
pub struct Args {
    /// Path to configuration file; defaults and environment only when omitted
    #[arg(short, long, env = "KOE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "KOE_LISTEN")]
    pub listen: Option<SocketAddr>,
}

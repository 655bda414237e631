//! Keyforge command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # Hash, streaming each argument into the digest in order
//! keyforge digest --algorithm sha512 6162 63
//!
//! # Parent of two 32-byte child hashes
//! keyforge root --algorithm sha256 <LEFT> <RIGHT>
//!
//! # Encrypt, then decrypt the printed ciphertext || tag
//! keyforge seal --key <KEY> --nonce <NONCE> --aad 6864 68656c6c6f
//! keyforge open --key <KEY> --nonce <NONCE> --aad 6864 <SEALED>
//!
//! # Background jobs
//! keyforge pbkdf2 --password 70617373 --salt 73616c74 --iterations 100000
//! keyforge --max-jobs 2 rsa-keygen --bits 2048
//! ```
//!
//! All binary arguments and outputs are hex.

mod commands;
mod error;

use std::io::Write;

use clap::{Parser, Subcommand};
use commands::{Algorithm, Prf};
use error::CliError;
use keyforge_worker::{Executor, ExecutorConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Keyforge crypto toolkit
#[derive(Parser, Debug)]
#[command(name = "keyforge")]
#[command(about = "Digests, ChaCha20-Poly1305 and background key jobs")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Maximum concurrent background jobs (defaults to available cores)
    #[arg(long, global = true)]
    max_jobs: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hash the concatenation of the given inputs
    Digest {
        /// Hash function
        #[arg(short, long, value_enum, default_value = "sha512")]
        algorithm: Algorithm,

        /// Input chunks, absorbed in order
        data: Vec<String>,
    },

    /// Hash two child nodes into their parent
    Root {
        /// Hash function
        #[arg(short, long, value_enum, default_value = "sha512")]
        algorithm: Algorithm,

        /// Left child (exactly one digest long)
        left: String,

        /// Right child (exactly one digest long)
        right: String,
    },

    /// Encrypt and authenticate with ChaCha20-Poly1305
    Seal {
        /// 32-byte key
        #[arg(short, long)]
        key: String,

        /// 8, 12 or 24-byte nonce
        #[arg(short, long)]
        nonce: String,

        /// Associated data
        #[arg(short, long, default_value = "")]
        aad: String,

        /// Plaintext
        plaintext: String,
    },

    /// Verify and decrypt ciphertext followed by its 16-byte tag
    Open {
        /// 32-byte key
        #[arg(short, long)]
        key: String,

        /// 8, 12 or 24-byte nonce
        #[arg(short, long)]
        nonce: String,

        /// Associated data
        #[arg(short, long, default_value = "")]
        aad: String,

        /// Ciphertext || tag
        sealed: String,
    },

    /// Derive a key with PBKDF2
    Pbkdf2 {
        /// PRF hash
        #[arg(long, value_enum, default_value = "sha256")]
        prf: Prf,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Salt
        #[arg(short, long, default_value = "")]
        salt: String,

        /// Iteration count
        #[arg(short, long, default_value = "100000")]
        iterations: u32,

        /// Output length in bytes
        #[arg(short, long, default_value = "32")]
        length: usize,
    },

    /// Generate an RSA key pair
    RsaKeygen {
        /// Modulus size in bits
        #[arg(short, long, default_value = "2048")]
        bits: usize,

        /// Public exponent
        #[arg(short, long, default_value = "65537")]
        exponent: u64,
    },
}

impl Args {
    fn executor_config(&self) -> ExecutorConfig {
        match self.max_jobs {
            Some(max_jobs) => ExecutorConfig { max_jobs },
            None => ExecutorConfig::default(),
        }
    }
}

async fn run(args: Args) -> Result<String, CliError> {
    let config = args.executor_config();

    match args.command {
        Command::Digest { algorithm, data } => commands::digest(algorithm, &data),
        Command::Root { algorithm, left, right } => commands::root(algorithm, &left, &right),
        Command::Seal { key, nonce, aad, plaintext } => {
            commands::seal(&key, &nonce, &aad, &plaintext)
        },
        Command::Open { key, nonce, aad, sealed } => commands::open(&key, &nonce, &aad, &sealed),
        Command::Pbkdf2 { prf, password, salt, iterations, length } => {
            let executor = Executor::current(config)?;
            commands::pbkdf2(&executor, prf, &password, &salt, iterations, length).await
        },
        Command::RsaKeygen { bits, exponent } => {
            let executor = Executor::current(config)?;
            commands::rsa_keygen(&executor, bits, exponent).await
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::debug!(command = ?args.command, "Keyforge starting");

    let output = run(args).await.inspect_err(|e| tracing::error!("{e}"))?;
    writeln!(std::io::stdout().lock(), "{output}").map_err(CliError::from)?;

    Ok(())
}

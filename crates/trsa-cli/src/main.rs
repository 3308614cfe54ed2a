//! Threshold RSA CLI
//!
//! Runs a full signing round in one process: generate a key set, prepare
//! the document, sign with every share, verify each share, combine, and
//! check the result like a plain RSA verifier would.

use anyhow::{bail, Result};
use clap::Parser;
use rand::rngs::OsRng;
use std::path::PathBuf;
use tracing::{info, Level};

use trsa_core::combine::combine_shares;
use trsa_core::keygen::generate_keys;
use trsa_core::pkcs1::{prepare_document, rsa_verify, HashKind};
use trsa_core::sign::sign_share;
use trsa_core::types::KeyParams;
use trsa_core::verify::verify_share;
use trsa_core::wire;

/// Threshold RSA signing demo
#[derive(Parser)]
#[command(name = "trsa")]
#[command(about = "Shoup threshold RSA signatures")]
#[command(version)]
struct Cli {
    /// Message to sign
    #[arg(short, long, default_value = "Hello world!")]
    message: String,

    /// Threshold (shares needed to sign)
    #[arg(short = 'k', long, default_value_t = 3)]
    threshold: u16,

    /// Group size (total number of shares)
    #[arg(short = 'l', long, default_value_t = 5)]
    group_size: u16,

    /// RSA modulus size in bits
    #[arg(short = 's', long, default_value_t = 1024)]
    key_size: u32,

    /// Optional directory to store the key set
    #[arg(short, long)]
    dest: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let mut rng = OsRng;

    let params = KeyParams::new(cli.key_size, cli.threshold, cli.group_size)?;
    let (shares, meta) = generate_keys(&params, &mut rng)?;

    if let Some(dest) = &cli.dest {
        std::fs::create_dir_all(dest)?;
        for share in &shares {
            let path = dest.join(format!("keyshare.{}.json", share.id));
            std::fs::write(&path, serde_json::to_string_pretty(share)?)?;
        }
        let meta_path = dest.join("metainfo.b64");
        std::fs::write(&meta_path, wire::serialize_key_metainfo(&meta))?;
        info!(path = ?dest, "key set saved");
    }

    println!("Message: {}", cli.message);

    let block = prepare_document(cli.message.as_bytes(), HashKind::Sha256, &meta)?;
    let doc = wire::int_from_bytes(&block);
    println!("Prepared document: {}", hex::encode(&block));

    // each share signs; the shares travel through the wire format as they
    // would between real parties
    let mut sigs = Vec::with_capacity(shares.len());
    for share in &shares {
        let sig = sign_share(share, &doc, &meta, &mut rng)?;
        let sig = wire::deserialize_signature_share(&wire::serialize_signature_share(&sig))?;
        if !verify_share(&sig, &doc, &meta) {
            bail!("share {} failed verification", sig.id);
        }
        info!(id = sig.id, "share signed and verified");
        sigs.push(sig);
    }

    let y = combine_shares(&sigs[..cli.threshold as usize], &doc, &meta)?;

    if !rsa_verify(&y, cli.message.as_bytes(), HashKind::Sha256, &meta) {
        bail!("combined signature failed the RSA check");
    }

    println!("Signature: {}", hex::encode(wire::int_to_bytes(&y)));

    Ok(())
}

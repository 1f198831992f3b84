//! Example: Client-side secret encryption
//!
//! Generates a key, shows the envelope format, and (when `ENVASE_API_URL`
//! is set) stores a secret that the server only ever sees as ciphertext.
//!
//! ```bash
//! cargo run -p envase --example encryption
//!
//! # Against a live API
//! ENVASE_API_URL=https://api.envase.dev ENVASE_TOKEN=... ENVASE_PROJECT_ID=... \
//!     cargo run -p envase --example encryption
//! ```

use envase::logging::{init_tracing, LogFormat};
use envase::{EncryptionService, EnvaseClient, SetSecretParams};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("envase=debug", LogFormat::Pretty);

    let key = EncryptionService::generate_key();
    let service = EncryptionService::new(&key)?;
    println!("key fingerprint: {}", service.key_fingerprint());

    let envelope = service.encrypt("sk_live_51H8xyzABC")?;
    println!("envelope: {envelope}");
    println!("decrypted: {}", service.decrypt(&envelope)?);

    let (Ok(mut config), Ok(project_id)) =
        (envase::config::load_from_env(), std::env::var("ENVASE_PROJECT_ID"))
    else {
        println!("\nset ENVASE_API_URL, ENVASE_TOKEN and ENVASE_PROJECT_ID to store a secret");
        return Ok(());
    };
    config.encryption_key.get_or_insert(key);
    config.enable_encryption = true;

    let client = EnvaseClient::new(config)?;
    let secret = client
        .secrets()
        .set(&SetSecretParams {
            project_id,
            key: "EXAMPLE_API_KEY".into(),
            value: "sk_live_51H8xyzABC".into(),
            ..Default::default()
        })
        .await?;
    println!("\nstored {} (version {}) encrypted at rest", secret.key, secret.version);

    Ok(())
}

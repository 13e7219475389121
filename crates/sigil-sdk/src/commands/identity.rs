//! Identity derivation and identity-file handling.

use std::path::Path;

use eyre::Context as _;
use secrecy::SecretSlice;
use sigil_core::identity::Identity;
use sigil_core::schema::identity_file::IdentityFile;
use zeroize::Zeroizing;

/// Read secret material (a wallet signature) from a file.
///
/// Accepts either raw signature bytes or a hex-encoded signature (the
/// form wallets typically hand back); hex is detected and decoded.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub async fn read_secret_material(path: &Path) -> eyre::Result<SecretSlice<u8>> {
    let raw = Zeroizing::new(
        tokio::fs::read(path)
            .await
            .wrap_err_with(|| format!("Failed to read signature file {}", path.display()))?,
    );

    if let Some(decoded) = decode_hex_text(&raw) {
        return Ok(SecretSlice::from(decoded.to_vec()));
    }
    Ok(SecretSlice::from(raw.to_vec()))
}

fn decode_hex_text(raw: &[u8]) -> Option<Zeroizing<Vec<u8>>> {
    let text = std::str::from_utf8(raw).ok()?.trim();
    let trimmed = text.strip_prefix("0x").unwrap_or(text);
    if trimmed.is_empty() {
        return None;
    }
    hex::decode(trimmed).ok().map(Zeroizing::new)
}

/// Derive an identity from secret material.
///
/// # Errors
/// Returns an error for empty or malformed material.
pub fn derive_identity(material: &SecretSlice<u8>) -> eyre::Result<Identity> {
    let identity = Identity::derive(material).wrap_err("Failed to derive identity")?;
    tracing::info!(commitment = %identity.commitment(), "derived identity");
    Ok(identity)
}

/// Write an identity secrets file. Handle the output like key material.
///
/// # Errors
/// Returns an error if serialization or the write fails.
pub async fn write_identity_file(path: &Path, identity: &Identity) -> eyre::Result<()> {
    let file = IdentityFile::from(identity);
    let json = serde_json::to_vec_pretty(&file).wrap_err("Failed to serialize identity")?;
    tokio::fs::write(path, json)
        .await
        .wrap_err_with(|| format!("Failed to write identity file {}", path.display()))?;
    tracing::warn!(path = %path.display(), "wrote identity secrets; protect this file");
    Ok(())
}

/// Load an identity from a secrets file, recomputing the commitment.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub async fn load_identity_file(path: &Path) -> eyre::Result<Identity> {
    let bytes = tokio::fs::read(path)
        .await
        .wrap_err_with(|| format!("Failed to read identity file {}", path.display()))?;
    let file: IdentityFile =
        serde_json::from_slice(&bytes).wrap_err("Failed to parse identity file")?;
    Ok(Identity::from(file))
}

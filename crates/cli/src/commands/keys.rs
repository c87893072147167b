//! Signing key commands.
//!
//! # Usage
//!
//! ```bash
//! # Generate a fresh key into a file (never printed)
//! sc-cli keygen --out signer.key
//!
//! # Show the address of the configured SIGNER_PRIVATE_KEY
//! sc-cli address
//! ```

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use rand::RngCore;
use secrecy::ExposeSecret;
use storechain_gateway::chain::TransactionSigner;
use storechain_gateway::config::AccountConfig;

use super::CommandError;

/// Generate a random signing key.
///
/// Retries on the vanishingly rare byte strings that are not valid scalars.
#[must_use]
pub fn generate() -> TransactionSigner {
    let mut rng = rand::rng();
    loop {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        if let Ok(signer) = TransactionSigner::from_bytes(&bytes) {
            return signer;
        }
    }
}

/// Write `signer`'s key to a new file at `path`, readable by the owner only.
///
/// # Errors
///
/// Returns `CommandError::KeyExists` if `path` exists, or `CommandError::Io`
/// if the file cannot be written.
pub fn write_key(path: &Path, signer: &TransactionSigner) -> Result<(), CommandError> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::AlreadyExists {
            CommandError::KeyExists(path.to_path_buf())
        } else {
            CommandError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let secret = signer.export_secret();
    writeln!(file, "{}", secret.expose_secret()).map_err(|source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `keygen --out <file>`
///
/// # Errors
///
/// As [`write_key`].
pub fn keygen(out: &Path) -> Result<(), CommandError> {
    let signer = generate();
    write_key(out, &signer)?;
    tracing::info!(address = %signer.address(), path = %out.display(), "Key written");
    Ok(())
}

/// `address`
///
/// # Errors
///
/// Returns an error if the configuration or key cannot be loaded.
pub fn address() -> Result<(), CommandError> {
    let config = AccountConfig::from_env()?;
    let signer = TransactionSigner::from_secret(&config.signer_key)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", signer.address());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use secrecy::SecretString;

    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("sc-cli-{}.key", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(generate().address(), generate().address());
    }

    #[test]
    fn test_written_key_loads_back() {
        let path = scratch_path();
        let signer = generate();

        write_key(&path, &signer).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let loaded = TransactionSigner::from_secret(&SecretString::from(contents)).unwrap();
        assert_eq!(loaded.address(), signer.address());
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let path = scratch_path();
        std::fs::write(&path, "keep me").unwrap();

        let err = write_key(&path, &generate()).unwrap_err();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, CommandError::KeyExists(_)));
        assert_eq!(contents, "keep me");
    }

    #[cfg(unix)]
    #[test]
    fn test_key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let path = scratch_path();
        write_key(&path, &generate()).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(mode & 0o777, 0o600);
    }
}

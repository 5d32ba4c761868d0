//! TLS certificate loading.
//!
//! Certificates and keys are PEM files on disk, loaded once before the
//! listener binds. Handshakes are tokio-rustls' job; this module only builds
//! the `ServerConfig` the acceptor runs with.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use tokio_rustls::rustls::ServerConfig;

use crate::error::Error;

/// Builds a rustls server config from a PEM certificate-chain file and a PEM
/// private-key file (PKCS#8, PKCS#1 or SEC1).
pub(crate) fn server_config(cert_file: &Path, key_file: &Path) -> Result<ServerConfig, Error> {
    let mut reader = BufReader::new(File::open(cert_file)?);
    let certs = rustls_pemfile::certs(&mut reader).collect::<Result<Vec<_>, _>>()?;
    if certs.is_empty() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("no certificates found in {}", cert_file.display()),
        )));
    }

    let mut reader = BufReader::new(File::open(key_file)?);
    let key = rustls_pemfile::private_key(&mut reader)?.ok_or_else(|| {
        Error::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("no private key found in {}", key_file.display()),
        ))
    })?;

    let mut config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)?;
    // The connection builder speaks both protocols; advertise both.
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cert_file_is_an_io_error() {
        let err = server_config(
            Path::new("/nonexistent/cert.pem"),
            Path::new("/nonexistent/key.pem"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn non_pem_content_is_rejected_before_serving() {
        let path = std::env::temp_dir().join("remux-tls-test-garbage.pem");
        std::fs::write(&path, "not a pem file").unwrap();

        let err = server_config(&path, &path).unwrap_err();
        assert!(matches!(err, Error::Io(_)));

        std::fs::remove_file(&path).ok();
    }
}

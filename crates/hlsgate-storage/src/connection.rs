//! Connection string parsing.
//!
//! Connection strings are `;`-separated `Key=Value` pairs. Keys are matched
//! case-insensitively; values keep everything after the first `=`, so base64
//! account keys survive intact.

use std::fmt;
use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::azure::{AzureAccount, Credential};
use crate::error::{Result, StorageError};

/// Account name of the local storage emulator.
pub const DEV_ACCOUNT_NAME: &str = "devstoreaccount1";

/// Well-known, public key of the local storage emulator.
pub const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

/// Blob endpoint of the local storage emulator.
pub const DEV_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// Backend selected by a connection string.
#[derive(Debug, Clone)]
pub enum StoreKind {
    Azure(AzureAccount),
    Local(PathBuf),
}

/// A parsed connection string.
#[derive(Clone)]
pub struct ConnectionString {
    pairs: Vec<(String, String)>,
}

impl ConnectionString {
    /// Split a connection string into key/value pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use hlsgate_storage::ConnectionString;
    ///
    /// let cs = ConnectionString::parse("AccountName=media;AccountKey=a2V5").unwrap();
    /// assert_eq!(cs.get("accountname"), Some("media"));
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                StorageError::config(format!("connection string segment '{part}' is not Key=Value"))
            })?;
            pairs.push((key.trim().to_string(), value.trim().to_string()));
        }
        if pairs.is_empty() {
            return Err(StorageError::config("connection string is empty"));
        }
        Ok(Self { pairs })
    }

    /// Look up a value by key, ignoring case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Short backend label for logs.
    pub fn backend_name(&self) -> &'static str {
        if self.flag("UseLocalFilesystem") {
            "filesystem"
        } else if self.flag("UseDevelopmentStorage") {
            "azure-emulator"
        } else {
            "azure"
        }
    }

    /// Resolve the backend and its parameters.
    pub fn kind(&self) -> Result<StoreKind> {
        if self.flag("UseLocalFilesystem") {
            let root = self
                .get("Root")
                .filter(|r| !r.is_empty())
                .ok_or_else(|| StorageError::config("UseLocalFilesystem requires Root"))?;
            let root = PathBuf::from(shellexpand::tilde(root).as_ref());
            return Ok(StoreKind::Local(root));
        }

        if self.flag("UseDevelopmentStorage") {
            return Ok(StoreKind::Azure(AzureAccount {
                endpoint: DEV_BLOB_ENDPOINT.to_string(),
                credential: Credential::SharedKey {
                    account: DEV_ACCOUNT_NAME.to_string(),
                    key: decode_key(DEV_ACCOUNT_KEY)?,
                },
            }));
        }

        let account_name = self.get("AccountName").filter(|v| !v.is_empty());
        let endpoint = match self.get("BlobEndpoint").filter(|v| !v.is_empty()) {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => {
                let account = account_name.ok_or_else(|| {
                    StorageError::config("connection string needs AccountName or BlobEndpoint")
                })?;
                let protocol = self.get("DefaultEndpointsProtocol").unwrap_or(DEFAULT_PROTOCOL);
                let suffix = self.get("EndpointSuffix").unwrap_or(DEFAULT_ENDPOINT_SUFFIX);
                format!("{protocol}://{account}.blob.{suffix}")
            }
        };
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(StorageError::config(format!(
                "blob endpoint '{endpoint}' must start with http:// or https://"
            )));
        }

        let credential = if let Some(sas) = self.get("SharedAccessSignature") {
            Credential::Sas(sas.trim_start_matches('?').to_string())
        } else if let Some(key) = self.get("AccountKey") {
            let account = account_name
                .ok_or_else(|| StorageError::config("AccountKey requires AccountName"))?;
            Credential::SharedKey {
                account: account.to_string(),
                key: decode_key(key)?,
            }
        } else {
            Credential::Anonymous
        };

        Ok(StoreKind::Azure(AzureAccount {
            endpoint,
            credential,
        }))
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only keys; values may hold account keys or SAS tokens.
        let keys: Vec<&str> = self.pairs.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("ConnectionString").field("keys", &keys).finish()
    }
}

fn decode_key(key: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(key)
        .map_err(|e| StorageError::config(format!("AccountKey is not valid base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn azure(raw: &str) -> AzureAccount {
        match ConnectionString::parse(raw).unwrap().kind().unwrap() {
            StoreKind::Azure(account) => account,
            other => panic!("expected azure, got {other:?}"),
        }
    }

    #[test]
    fn parses_account_key_connection_string() {
        let account = azure(
            "DefaultEndpointsProtocol=https;AccountName=media;AccountKey=c2VjcmV0;EndpointSuffix=core.windows.net",
        );
        assert_eq!(account.endpoint, "https://media.blob.core.windows.net");
        match account.credential {
            Credential::SharedKey { account, key } => {
                assert_eq!(account, "media");
                assert_eq!(key, b"secret");
            }
            other => panic!("unexpected credential {other:?}"),
        }
    }

    #[test]
    fn defaults_protocol_and_suffix() {
        let account = azure("AccountName=media;AccountKey=c2VjcmV0");
        assert_eq!(account.endpoint, "https://media.blob.core.windows.net");
    }

    #[test]
    fn parses_sas_connection_string() {
        let account =
            azure("BlobEndpoint=https://media.blob.core.windows.net/;SharedAccessSignature=?sv=2022&sig=abc%3D");
        assert_eq!(account.endpoint, "https://media.blob.core.windows.net");
        assert!(matches!(account.credential, Credential::Sas(ref s) if s == "sv=2022&sig=abc%3D"));
    }

    #[test]
    fn anonymous_when_no_credential() {
        let account = azure("BlobEndpoint=http://localhost:9000/account");
        assert!(matches!(account.credential, Credential::Anonymous));
    }

    #[test]
    fn development_storage_uses_emulator_defaults() {
        let account = azure("UseDevelopmentStorage=true");
        assert_eq!(account.endpoint, DEV_BLOB_ENDPOINT);
        assert!(matches!(account.credential, Credential::SharedKey { ref account, .. } if account == DEV_ACCOUNT_NAME));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let cs = ConnectionString::parse("accountname=media; ACCOUNTKEY=c2VjcmV0 ;").unwrap();
        assert_eq!(cs.get("AccountName"), Some("media"));
        assert_eq!(cs.get("AccountKey"), Some("c2VjcmV0"));
    }

    #[test]
    fn local_filesystem() {
        let cs = ConnectionString::parse("UseLocalFilesystem=true;Root=/srv/media").unwrap();
        assert_eq!(cs.backend_name(), "filesystem");
        assert!(matches!(cs.kind().unwrap(), StoreKind::Local(ref p) if p == std::path::Path::new("/srv/media")));
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!(ConnectionString::parse("").is_err());
        assert!(ConnectionString::parse(";;").is_err());
        assert!(ConnectionString::parse("AccountName").is_err());

        let cs = ConnectionString::parse("AccountName=media;AccountKey=***").unwrap();
        assert!(matches!(cs.kind(), Err(StorageError::Config(_))));

        let cs = ConnectionString::parse("AccountKey=c2VjcmV0;BlobEndpoint=https://x").unwrap();
        assert!(matches!(cs.kind(), Err(StorageError::Config(_))));

        let cs = ConnectionString::parse("BlobEndpoint=ftp://x").unwrap();
        assert!(matches!(cs.kind(), Err(StorageError::Config(_))));

        let cs = ConnectionString::parse("UseLocalFilesystem=true").unwrap();
        assert!(matches!(cs.kind(), Err(StorageError::Config(_))));
    }

    #[test]
    fn debug_hides_values() {
        let cs = ConnectionString::parse("AccountName=media;AccountKey=c2VjcmV0").unwrap();
        let debug = format!("{cs:?}");
        assert!(debug.contains("AccountKey"));
        assert!(!debug.contains("c2VjcmV0"));
    }
}

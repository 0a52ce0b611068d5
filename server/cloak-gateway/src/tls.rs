//! TLS certificate bootstrap.
//!
//! Certificates are either read from disk or, when `auto_generate` is set,
//! issued locally: an RSA key is generated, a leaf certificate with the
//! configured SANs is signed by the root CA (itself generated first when
//! `root_generate` is set), and the PEMs are written back to the
//! configured paths with 10-year validity.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;

use anyhow::Context;
use axum_server::tls_rustls::RustlsConfig;
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose,
    Ia5String, IsCa, KeyPair, SanType,
};
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub enabled: bool,
    /// Generate the server certificate instead of reading it from disk.
    pub auto_generate: bool,
    pub cert_file: String,
    pub key_file: String,
    /// Generate a self-signed root instead of reading one from disk.
    pub root_generate: bool,
    pub root_cert_file: String,
    pub root_key_file: String,
    pub sans: Vec<String>,
    pub key_bits: u32,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            auto_generate: false,
            cert_file: "certs/server.crt".into(),
            key_file: "certs/server.key".into(),
            root_generate: false,
            root_cert_file: "certs/root.crt".into(),
            root_key_file: "certs/root.key".into(),
            sans: vec!["localhost".into()],
            key_bits: 4096,
        }
    }
}

struct GeneratedCert {
    cert_pem: String,
    key_pem: String,
}

pub async fn rustls_server_config(config: &TlsConfig) -> anyhow::Result<RustlsConfig> {
    let (cert_pem, key_pem) = if config.auto_generate {
        let generated = generate_server_cert(config)?;
        (
            generated.cert_pem.into_bytes(),
            generated.key_pem.into_bytes(),
        )
    } else {
        (
            std::fs::read(&config.cert_file)
                .with_context(|| format!("failed to read {}", config.cert_file))?,
            std::fs::read(&config.key_file)
                .with_context(|| format!("failed to read {}", config.key_file))?,
        )
    };

    RustlsConfig::from_pem(cert_pem, key_pem)
        .await
        .context("failed to build rustls config")
}

fn generate_server_cert(config: &TlsConfig) -> anyhow::Result<GeneratedCert> {
    let (root_cert_pem, root_key_pem) = if config.root_generate {
        let root = generate_root(config.key_bits)?;
        write_pem(&config.root_cert_file, &root.cert_pem)?;
        write_pem(&config.root_key_file, &root.key_pem)?;
        info!(cert = %config.root_cert_file, "root certificate generated");
        (root.cert_pem, root.key_pem)
    } else {
        (
            std::fs::read_to_string(&config.root_cert_file)
                .with_context(|| format!("failed to read {}", config.root_cert_file))?,
            std::fs::read_to_string(&config.root_key_file)
                .with_context(|| format!("failed to read {}", config.root_key_file))?,
        )
    };

    let leaf = issue_leaf(config, &root_cert_pem, &root_key_pem)?;
    write_pem(&config.cert_file, &leaf.cert_pem)?;
    write_pem(&config.key_file, &leaf.key_pem)?;
    info!(cert = %config.cert_file, sans = ?config.sans, "server certificate generated");

    Ok(leaf)
}

fn generate_root(key_bits: u32) -> anyhow::Result<GeneratedCert> {
    let key = rsa_key_pair(key_bits)?;

    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, "cloak");
    dn.push(DnType::CommonName, "cloak root");
    params.distinguished_name = dn;
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.not_before = time::OffsetDateTime::now_utc();
    params.not_after = ten_years_out();

    let cert = params
        .self_signed(&key)
        .context("root certificate generation failed")?;

    Ok(GeneratedCert {
        cert_pem: cert.pem(),
        key_pem: key.serialize_pem(),
    })
}

fn issue_leaf(
    config: &TlsConfig,
    root_cert_pem: &str,
    root_key_pem: &str,
) -> anyhow::Result<GeneratedCert> {
    let root_key = KeyPair::from_pem(root_key_pem).context("failed to parse root key")?;
    let root_params = CertificateParams::from_ca_cert_pem(root_cert_pem)
        .context("failed to parse root certificate")?;
    let root_cert = root_params
        .self_signed(&root_key)
        .context("failed to rebuild root certificate for signing")?;

    let leaf_key = rsa_key_pair(config.key_bits)?;

    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, "cloak");
    dn.push(DnType::CommonName, "localhost");
    params.distinguished_name = dn;
    params.not_before = time::OffsetDateTime::now_utc();
    params.not_after = ten_years_out();
    params.extended_key_usages = vec![
        ExtendedKeyUsagePurpose::ServerAuth,
        ExtendedKeyUsagePurpose::ClientAuth,
    ];

    let mut sans = Vec::with_capacity(config.sans.len() + 2);
    for dns in &config.sans {
        let name = Ia5String::try_from(dns.as_str())
            .map_err(|e| anyhow::anyhow!("invalid SAN '{dns}': {e}"))?;
        sans.push(SanType::DnsName(name));
    }
    sans.push(SanType::IpAddress(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    sans.push(SanType::IpAddress(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    params.subject_alt_names = sans;

    let cert = params
        .signed_by(&leaf_key, &root_cert, &root_key)
        .context("leaf certificate signing failed")?;

    Ok(GeneratedCert {
        cert_pem: cert.pem(),
        key_pem: leaf_key.serialize_pem(),
    })
}

fn ten_years_out() -> time::OffsetDateTime {
    time::OffsetDateTime::now_utc() + time::Duration::days(3650)
}

fn rsa_key_pair(bits: u32) -> anyhow::Result<KeyPair> {
    let mut rng = rand::thread_rng();
    let private_key =
        RsaPrivateKey::new(&mut rng, bits as usize).context("RSA key generation failed")?;
    let pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .context("RSA key encoding failed")?;
    KeyPair::from_pem(&pem).context("failed to load generated RSA key")
}

fn write_pem(path: &str, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {path}"))
}

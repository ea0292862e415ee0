//! Authenticode certificate summaries
//!
//! goblin exposes the attribute-certificate table as raw PKCS#7 blobs.
//! This module unwraps the SignedData structure, summarizes each embedded
//! X.509 certificate standalone, and checks the content digest embedded in
//! the signature against a digest recomputed over the file's signed byte
//! ranges. No chain building and no trust decisions happen here.

use chrono::{DateTime, Utc};
use cms::cert::CertificateChoices;
use cms::content_info::ContentInfo;
use cms::signed_data::{SignedData, SignerIdentifier};
use der::asn1::OctetString;
use der::{Any, Decode, Sequence};
use goblin::pe::PE;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use x509_cert::spki::AlgorithmIdentifierOwned;
use x509_cert::time::Time;
use x509_cert::Certificate;

use super::model::CertificateSummary;

const OID_MD5: &str = "1.2.840.113549.2.5";
const OID_SHA1: &str = "1.3.14.3.2.26";
const OID_SHA256: &str = "2.16.840.1.101.3.4.2.1";

/// SpcIndirectDataContent ::= SEQUENCE { data, messageDigest }
///
/// The Authenticode content type; only the digest half is of interest.
#[derive(Sequence)]
struct SpcIndirectDataContent {
    data: Any,
    message_digest: DigestInfo,
}

/// DigestInfo ::= SEQUENCE { digestAlgorithm, digest }
#[derive(Sequence)]
struct DigestInfo {
    algorithm: AlgorithmIdentifierOwned,
    digest: OctetString,
}

/// Summarize every X.509 certificate embedded in the image's attribute
/// certificate table.
pub fn summarize(pe: &PE<'_>) -> Vec<CertificateSummary> {
    let mut summaries = Vec::new();
    for attribute_cert in &pe.certificates {
        summarize_blob(attribute_cert.certificate, pe, &mut summaries);
    }
    summaries
}

fn summarize_blob(blob: &[u8], pe: &PE<'_>, summaries: &mut Vec<CertificateSummary>) {
    let Ok(content) = ContentInfo::from_der(blob) else {
        return;
    };
    let Ok(signed) = content.content.decode_as::<SignedData>() else {
        return;
    };

    // The digest over the signed portion of the file, as stored in the
    // SpcIndirectDataContent the publisher signed.
    let embedded = signed
        .encap_content_info
        .econtent
        .as_ref()
        .and_then(|econtent| econtent.decode_as::<SpcIndirectDataContent>().ok())
        .map(|spc| {
            (
                spc.message_digest.algorithm.oid.to_string(),
                spc.message_digest.digest.as_bytes().to_vec(),
            )
        });

    let signature_valid = match &embedded {
        Some((oid, digest)) => signed_ranges_digest(pe, oid)
            .map(|computed| &computed == digest)
            .unwrap_or(false),
        None => false,
    };
    let (hash_algorithm, hash_hex) = match &embedded {
        Some((oid, digest)) => (algorithm_name(oid), hex::encode(digest)),
        None => ("unknown".to_string(), String::new()),
    };

    let Some(certificates) = &signed.certificates else {
        return;
    };
    for choice in certificates.0.iter() {
        let CertificateChoices::Certificate(certificate) = choice else {
            continue;
        };
        summaries.push(summarize_certificate(
            certificate,
            &signed,
            signature_valid,
            &hash_algorithm,
            &hash_hex,
        ));
    }
}

fn summarize_certificate(
    certificate: &Certificate,
    signed: &SignedData,
    signature_valid: bool,
    hash_algorithm: &str,
    hash_hex: &str,
) -> CertificateSummary {
    let tbs = &certificate.tbs_certificate;

    let is_signer = signed.signer_infos.0.iter().any(|signer| match &signer.sid {
        SignerIdentifier::IssuerAndSerialNumber(named) => {
            named.issuer == tbs.issuer && named.serial_number == tbs.serial_number
        }
        _ => false,
    });

    CertificateSummary {
        issuer: tbs.issuer.to_string(),
        subject: tbs.subject.to_string(),
        not_before: validity_time(tbs.validity.not_before),
        not_after: validity_time(tbs.validity.not_after),
        serial_number: hex::encode(tbs.serial_number.as_bytes()),
        public_key_algorithm: algorithm_name(
            &tbs.subject_public_key_info.algorithm.oid.to_string(),
        ),
        signature_algorithm: algorithm_name(&certificate.signature_algorithm.oid.to_string()),
        signature_valid,
        is_signer,
        content_hash_algorithm: hash_algorithm.to_string(),
        content_hash: hash_hex.to_string(),
    }
}

/// Digest the byte ranges Authenticode signs: the whole file minus the
/// checksum field, the security data directory entry and the certificate
/// table itself. goblin tracks the excluded ranges during parsing.
fn signed_ranges_digest(pe: &PE<'_>, algorithm_oid: &str) -> Option<Vec<u8>> {
    match algorithm_oid {
        OID_SHA256 => {
            let mut hasher = Sha256::new();
            for range in pe.authenticode_ranges() {
                hasher.update(range);
            }
            Some(hasher.finalize().to_vec())
        }
        OID_SHA1 => {
            let mut hasher = Sha1::new();
            for range in pe.authenticode_ranges() {
                hasher.update(range);
            }
            Some(hasher.finalize().to_vec())
        }
        OID_MD5 => {
            let mut context = md5::Context::new();
            for range in pe.authenticode_ranges() {
                context.consume(range);
            }
            Some(context.compute().0.to_vec())
        }
        _ => None,
    }
}

fn validity_time(time: Time) -> Option<DateTime<Utc>> {
    let seconds = i64::try_from(time.to_unix_duration().as_secs()).ok()?;
    DateTime::<Utc>::from_timestamp(seconds, 0)
}

fn algorithm_name(oid: &str) -> String {
    match oid {
        "1.2.840.113549.1.1.1" => "RSA".to_string(),
        "1.2.840.113549.1.1.5" => "SHA-1 with RSA".to_string(),
        "1.2.840.113549.1.1.11" => "SHA-256 with RSA".to_string(),
        "1.2.840.113549.1.1.12" => "SHA-384 with RSA".to_string(),
        "1.2.840.113549.1.1.13" => "SHA-512 with RSA".to_string(),
        "1.2.840.10045.2.1" => "ECDSA".to_string(),
        "1.2.840.10045.4.3.2" => "ECDSA with SHA-256".to_string(),
        "1.2.840.10045.4.3.3" => "ECDSA with SHA-384".to_string(),
        OID_MD5 => "MD5".to_string(),
        OID_SHA1 => "SHA-1".to_string(),
        OID_SHA256 => "SHA-256".to_string(),
        "2.16.840.1.101.3.4.2.2" => "SHA-384".to_string(),
        "2.16.840.1.101.3.4.2.3" => "SHA-512".to_string(),
        other => other.to_string(),
    }
}

// crates/grid-manager-core/src/core/mod.rs
// ============================================================================
// Module: Grid Manager Core Types
// Description: Keys, certificates, authority state, and decision data models.
// Purpose: Provide stable, serializable types for trust and placement.
// Dependencies: ed25519-dalek, serde, serde_jcs, sha2, thiserror
// ============================================================================

//! ## Overview
//! Core types define the Grid Manager authority, the certificates it issues,
//! the client trust policy, and the inputs and outputs of peer selection and
//! connection status reporting. Runtime modules operate on these types.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod authority;
pub mod certificate;
pub mod encoding;
pub mod hashing;
pub mod identifiers;
pub mod keys;
pub mod placement;
pub mod status;
pub mod time;
pub mod trust;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use authority::AuthorityError;
pub use authority::GridManagerConfig;
pub use authority::Roster;
pub use authority::SigningPolicy;
pub use certificate::CertificateBody;
pub use certificate::CertificateError;
pub use certificate::MAX_CERTIFICATE_BYTES;
pub use certificate::SignedCertificate;
pub use encoding::EncodingError;
pub use encoding::base32_decode;
pub use encoding::base32_encode;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use identifiers::InvalidServerName;
pub use identifiers::IssuerLabel;
pub use identifiers::MAX_SERVER_NAME_LENGTH;
pub use identifiers::ServerId;
pub use identifiers::ServerName;
pub use identifiers::ShareNumber;
pub use keys::KeyError;
pub use keys::PRIVATE_KEY_PREFIX;
pub use keys::PUBLIC_KEY_PREFIX;
pub use keys::PrivateKey;
pub use keys::PublicKey;
pub use keys::SignatureError;
pub use placement::MAX_TOTAL_SHARES;
pub use placement::PlacementError;
pub use placement::PlacementPlan;
pub use placement::PlacementRequest;
pub use placement::ShareAssignment;
pub use placement::UnhappinessError;
pub use status::ConnectionStatus;
pub use status::ListenerStatus;
pub use status::ReconnectionInfo;
pub use status::ReconnectionState;
pub use time::Timestamp;
pub use trust::ServerDescriptor;
pub use trust::ServerTrust;
pub use trust::TrustMode;
pub use trust::TrustPolicy;

//! Embedded creation bytecode of the deployable contracts.
//!
//! The hex files under `artifacts/` are the compiler output the bindings were
//! generated from. Constructor arguments are appended to the creation code at
//! deployment time.

use alloy_primitives::{hex, Bytes};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("{0}: unknown artifact")]
    Unknown(String),

    #[error("{0}: creation bytecode not found")]
    Empty(&'static str),

    #[error("{0}: invalid creation bytecode")]
    InvalidHex(&'static str),
}

/// A contract whose creation bytecode ships with this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    UpgradeGovernor,
    SecurityCouncil,
    KromaMintableERC20Factory,
    ProtocolVault,
}

impl Artifact {
    pub const ALL: [Self; 4] = [
        Self::UpgradeGovernor,
        Self::SecurityCouncil,
        Self::KromaMintableERC20Factory,
        Self::ProtocolVault,
    ];

    /// Solidity contract name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::UpgradeGovernor => "UpgradeGovernor",
            Self::SecurityCouncil => "SecurityCouncil",
            Self::KromaMintableERC20Factory => "KromaMintableERC20Factory",
            Self::ProtocolVault => "ProtocolVault",
        }
    }

    /// Look up an artifact by its exact contract name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    const fn raw(self) -> &'static str {
        match self {
            Self::UpgradeGovernor => include_str!("../artifacts/UpgradeGovernor.hex"),
            Self::SecurityCouncil => include_str!("../artifacts/SecurityCouncil.hex"),
            Self::KromaMintableERC20Factory => {
                include_str!("../artifacts/KromaMintableERC20Factory.hex")
            }
            Self::ProtocolVault => include_str!("../artifacts/ProtocolVault.hex"),
        }
    }

    /// Decoded creation bytecode.
    pub fn creation_code(self) -> Result<Bytes, ArtifactError> {
        decode_bytecode(self.name(), self.raw())
    }

    /// Creation bytecode followed by the ABI-encoded constructor arguments.
    pub fn deploy_code(self, constructor_args: &[u8]) -> Result<Bytes, ArtifactError> {
        let mut code = self.creation_code()?.to_vec();
        code.extend_from_slice(constructor_args);
        Ok(code.into())
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Artifact {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ArtifactError::Unknown(s.to_string()))
    }
}

pub(crate) fn decode_bytecode(name: &'static str, raw: &str) -> Result<Bytes, ArtifactError> {
    let code = raw.trim();
    let digits = code.strip_prefix("0x").unwrap_or(code);
    if digits.is_empty() {
        return Err(ArtifactError::Empty(name));
    }

    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|_| ArtifactError::InvalidHex(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use alloy_sol_types::SolValue;

    #[test]
    fn test_all_artifacts_decode() {
        for artifact in Artifact::ALL {
            let code = artifact.creation_code().unwrap();
            assert!(!code.is_empty(), "{artifact} has no code");
            // free memory pointer setup opens with a PUSHn
            assert!((0x60..=0x7f).contains(&code[0]), "{artifact} does not start with a PUSH");
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            Artifact::from_name("ProtocolVault"),
            Some(Artifact::ProtocolVault)
        );
        assert_eq!(Artifact::from_name("protocolvault"), None);
        assert_eq!(
            "Nope".parse::<Artifact>(),
            Err(ArtifactError::Unknown("Nope".to_string()))
        );
        for artifact in Artifact::ALL {
            assert_eq!(artifact.to_string().parse::<Artifact>(), Ok(artifact));
        }
    }

    #[test]
    fn test_deploy_code_appends_constructor_args() {
        let recipient = Address::repeat_byte(0x42);
        let args = recipient.abi_encode();

        let code = Artifact::ProtocolVault.creation_code().unwrap();
        let deploy = Artifact::ProtocolVault.deploy_code(&args).unwrap();

        assert_eq!(deploy.len(), code.len() + 32);
        assert_eq!(&deploy[..code.len()], &code[..]);
        assert_eq!(&deploy[code.len()..], &args[..]);
    }

    #[test]
    fn test_decode_bytecode_rejects_bad_input() {
        assert_eq!(decode_bytecode("X", ""), Err(ArtifactError::Empty("X")));
        assert_eq!(decode_bytecode("X", "0x"), Err(ArtifactError::Empty("X")));
        assert_eq!(
            decode_bytecode("X", "0x6080f"),
            Err(ArtifactError::InvalidHex("X"))
        );
        assert_eq!(
            decode_bytecode("X", "0x60zz"),
            Err(ArtifactError::InvalidHex("X"))
        );
        assert_eq!(
            decode_bytecode("X", "6080\n").unwrap(),
            Bytes::from(vec![0x60, 0x80])
        );
    }
}

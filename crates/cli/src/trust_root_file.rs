//! On-disk representation of the persisted L4 trust root and the genesis
//! validator set it's bootstrapped from (spec §4.6: "written once at
//! initialization; immutable thereafter").

use serde::{Deserialize, Serialize};
use std::path::Path;
use verity_layers::l4::TrustRoot;
use verity_types::{PublicKey, Validator, ValidatorSet};

#[derive(Debug, Serialize, Deserialize)]
struct FileValidator {
    address: String,
    key_type: String,
    pubkey: String,
    voting_power: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct FileValidatorSet {
    height: u64,
    validators: Vec<FileValidator>,
    total_power: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct FileTrustRoot {
    genesis_hash: String,
    genesis_validators: FileValidatorSet,
}

fn encode_validator(v: &Validator) -> FileValidator {
    let (key_type, pubkey) = match &v.pubkey {
        PublicKey::Ed25519(bytes) => ("ed25519".to_string(), hex::encode(bytes)),
        PublicKey::Bls12381(bytes) => ("bls12381".to_string(), hex::encode(bytes)),
    };
    FileValidator {
        address: hex::encode(&v.address),
        key_type,
        pubkey,
        voting_power: v.voting_power,
    }
}

fn decode_validator(f: &FileValidator) -> Result<Validator, String> {
    let address = hex::decode(&f.address).map_err(|e| format!("validator.address: {e}"))?;
    let pubkey_bytes = hex::decode(&f.pubkey).map_err(|e| format!("validator.pubkey: {e}"))?;
    let pubkey = match f.key_type.as_str() {
        "ed25519" => {
            let arr: [u8; 32] = pubkey_bytes
                .try_into()
                .map_err(|_| "ed25519 public key must be 32 bytes".to_string())?;
            PublicKey::Ed25519(arr)
        }
        "bls12381" => PublicKey::Bls12381(pubkey_bytes),
        other => return Err(format!("unknown key_type '{other}'")),
    };
    Ok(Validator::new(address, pubkey, f.voting_power))
}

pub fn load_validator_set(path: &Path) -> Result<ValidatorSet, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    let file: FileValidatorSet =
        serde_json::from_str(&text).map_err(|e| format!("parsing {}: {e}", path.display()))?;
    let validators = file
        .validators
        .iter()
        .map(decode_validator)
        .collect::<Result<Vec<_>, _>>()?;
    ValidatorSet::new(file.height, validators, file.total_power).map_err(|e| e.to_string())
}

pub fn load(path: &Path) -> Result<TrustRoot, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    let file: FileTrustRoot =
        serde_json::from_str(&text).map_err(|e| format!("parsing {}: {e}", path.display()))?;

    let genesis_hash = verity_types::Hash::from_hex(&file.genesis_hash).map_err(|e| e.to_string())?;
    let validators = file
        .genesis_validators
        .validators
        .iter()
        .map(decode_validator)
        .collect::<Result<Vec<_>, _>>()?;
    let genesis_validators = ValidatorSet::new(
        file.genesis_validators.height,
        validators,
        file.genesis_validators.total_power,
    )
    .map_err(|e| e.to_string())?;

    Ok(TrustRoot {
        genesis_hash,
        genesis_validators,
    })
}

pub fn save(path: &Path, root: &TrustRoot) -> Result<(), String> {
    let file = FileTrustRoot {
        genesis_hash: root.genesis_hash.to_hex(),
        genesis_validators: FileValidatorSet {
            height: root.genesis_validators.height,
            validators: root.genesis_validators.validators.iter().map(encode_validator).collect(),
            total_power: root.genesis_validators.total_power,
        },
    };
    let text = serde_json::to_string_pretty(&file).map_err(|e| e.to_string())?;
    std::fs::write(path, text).map_err(|e| format!("writing {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_types::{KeyPair, KeyType};

    #[test]
    fn round_trips_a_trust_root_through_json() {
        let dir = std::env::temp_dir();
        let path = dir.join("verity_cli_test_trust_root.json");

        let kp = KeyPair::from_seed(KeyType::Ed25519, &[7u8; 32]);
        let validator = Validator::new(vec![7u8; 20], kp.public_key(), 100);
        let set = ValidatorSet::new(0, vec![validator], 100).unwrap();
        let root = TrustRoot {
            genesis_hash: set.merkle_root(),
            genesis_validators: set,
        };

        save(&path, &root).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.genesis_hash, root.genesis_hash);
        assert_eq!(loaded.genesis_validators, root.genesis_validators);

        std::fs::remove_file(&path).ok();
    }
}

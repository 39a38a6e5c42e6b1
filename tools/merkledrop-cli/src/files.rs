use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cosmwasm_std::Coin;
use merkledrop::msg::ExecuteMsg;
use merkledrop_common::{ClaimEntry, RawAccountList};
use serde::Serialize;

/// Proof file: recipient address -> claim entry.
pub type ProofFile = BTreeMap<String, ClaimEntry>;

/// An execute message together with the funds that must accompany it.
#[derive(Debug, Serialize)]
pub struct TxOutput<'a> {
    pub msg: &'a ExecuteMsg,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub funds: Vec<Coin>,
}

pub fn render(msg: &ExecuteMsg, funds: Vec<Coin>) -> Result<String> {
    serde_json::to_string_pretty(&TxOutput { msg, funds }).context("Failed to encode message")
}

pub fn read_account_list(path: &Path) -> Result<RawAccountList> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read account list {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Could not parse account list {}", path.display()))
}

pub fn read_proof_file(path: &Path) -> Result<ProofFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read proof file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Could not parse proof file {}", path.display()))
}

/// Write `value` as pretty JSON next to `path`, then rename into place, so a
/// crash never leaves a half-written proof file behind.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value).context("Failed to encode JSON")?;

    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid output path {}", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, json)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err).with_context(|| format!("Failed to move output to {}", path.display()));
    }

    Ok(())
}

//! Loading table configuration and parsing command-line bet specs.

use std::path::Path;

use anyhow::{Context, Result};
use wheelhouse_types::{BetValue, Pocket, TableConfig, WheelType};

/// Read a YAML table config. Missing fields take their defaults.
pub fn load_table_config(path: &Path) -> Result<TableConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read table config {}", path.display()))?;
    let config: TableConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse table config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid table config {}", path.display()))?;
    Ok(config)
}

/// Parse a bet value: `7` for a single number, `1-2` or `1,2` for a split pair, `00` for
/// double zero.
pub fn parse_bet_value(raw: &str) -> Result<BetValue, String> {
    let number = |part: &str| -> Result<i32, String> {
        let part = part.trim();
        if part == "00" {
            return Ok(i32::from(Pocket::DOUBLE_ZERO.value()));
        }
        part.parse::<i32>()
            .map_err(|_| format!("invalid bet value: {raw}"))
    };
    match raw.split_once(|c: char| c == '-' || c == ',') {
        Some((a, b)) => Ok(BetValue::Pair([number(a)?, number(b)?])),
        None => Ok(BetValue::Single(number(raw)?)),
    }
}

/// Parse a comma-separated spin list such as `1,2,0,00`.
pub fn parse_spins(raw: &str, wheel: WheelType) -> Result<Vec<Pocket>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| -> Result<Pocket> {
            let pocket: Pocket = part
                .parse()
                .map_err(|err| anyhow::anyhow!("invalid spin {part}: {err}"))?;
            anyhow::ensure!(
                wheel.contains(pocket),
                "spin {pocket} does not exist on a {wheel} wheel"
            );
            Ok(pocket)
        })
        .collect()
}

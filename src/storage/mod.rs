//! Storage module for timeline registries and cursor snapshots
//!
//! This module provides save/load functionality using JSON serialization.

use crate::runtime::CursorSnapshot;
use crate::types::TimelineRegistry;

/// Save a registry to bytes using JSON serialization
pub fn save_registry(registry: &TimelineRegistry) -> anyhow::Result<Vec<u8>> {
    let json = serde_json::to_string_pretty(registry)?;
    Ok(json.into_bytes())
}

/// Load a registry from bytes using JSON deserialization
pub fn load_registry(bytes: &[u8]) -> anyhow::Result<TimelineRegistry> {
    let json = std::str::from_utf8(bytes)?;
    let registry = serde_json::from_str(json)?;
    Ok(registry)
}

/// Save a cursor snapshot to bytes
pub fn save_snapshot(snapshot: &CursorSnapshot) -> anyhow::Result<Vec<u8>> {
    let json = serde_json::to_string_pretty(snapshot)?;
    Ok(json.into_bytes())
}

/// Load a cursor snapshot from bytes
pub fn load_snapshot(bytes: &[u8]) -> anyhow::Result<CursorSnapshot> {
    let json = std::str::from_utf8(bytes)?;
    let snapshot = serde_json::from_str(json)?;
    Ok(snapshot)
}

use anyhow::Result;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::store::kv::KeyValueStore;

pub const STORAGE_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub data: T,
}

/// Read `key`, unwrapping the `{version, data}` envelope when present and
/// accepting a bare legacy payload otherwise. Every failure yields `fallback`.
pub fn load<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str, fallback: T) -> T {
    let raw = match kv.get(key) {
        Ok(Some(raw)) if !raw.trim().is_empty() => raw,
        Ok(_) => return fallback,
        Err(e) => {
            warn!(key, error = %e, "storage read failed, using fallback");
            return fallback;
        }
    };

    let parsed: Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(key, error = %e, "stored value is not JSON, using fallback");
            return fallback;
        }
    };

    let payload = match parsed {
        Value::Object(mut obj) if obj.contains_key("version") => {
            let version = obj.get("version").and_then(Value::as_u64).unwrap_or(0);
            let Some(data) = obj.remove("data") else {
                warn!(key, version, "envelope without data, using fallback");
                return fallback;
            };
            upgrade(version, data)
        }
        legacy => {
            debug!(key, "loaded legacy value without envelope");
            legacy
        }
    };

    match serde_json::from_value(payload) {
        Ok(v) => v,
        Err(e) => {
            warn!(key, error = %e, "stored value has unexpected shape, using fallback");
            fallback
        }
    }
}

/// Write `value` wrapped in the current envelope.
pub fn save<T: Serialize>(kv: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let envelope = Envelope {
        version: STORAGE_VERSION,
        data: value,
    };
    kv.set(key, &serde_json::to_string(&envelope)?)?;
    debug!(key, "saved");
    Ok(())
}

/// Migrate an enveloped payload written by `version` to the current layout.
/// Version 1 is the only layout so far.
fn upgrade(version: u64, data: Value) -> Value {
    if version != u64::from(STORAGE_VERSION) {
        debug!(version, "no migration registered for stored version");
    }
    data
}

use crate::core::errors::ExchangeError;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

/// Spot request parameters. The map keeps keys in byte-wise order, which is
/// the order the spot signature is computed in.
pub type SpotParams = BTreeMap<String, String>;

pub const SPOT_API_KEY_PARAM: &str = "api_key";
pub const SPOT_TIME_PARAM: &str = "time";
pub const SPOT_SIGN_PARAM: &str = "sign";

/// Build the string that the spot MD5 is computed over.
///
/// Every non-empty value contributes `key || value` in ascending key order,
/// followed by the raw secret. Empty values are skipped here even though they
/// are still transmitted.
pub fn spot_sign_payload(params: &SpotParams, secret_key: &str) -> String {
    let mut payload = String::new();
    for (key, value) in params {
        if !value.is_empty() {
            payload.push_str(key);
            payload.push_str(value);
        }
    }
    payload.push_str(secret_key);
    payload
}

/// Lower-case hex MD5 of the spot sign payload (32 characters).
pub fn spot_signature(params: &SpotParams, secret_key: &str) -> String {
    let digest = Md5::digest(spot_sign_payload(params, secret_key).as_bytes());
    hex::encode(digest)
}

/// Sign a spot parameter map.
///
/// Consumes `params` and returns it with `api_key`, `time` and `sign`
/// added, ready to be rendered as a query string or form body.
pub fn sign_spot(
    mut params: SpotParams,
    api_key: &str,
    secret_key: &str,
    timestamp: u64,
) -> SpotParams {
    params.insert(SPOT_API_KEY_PARAM.to_string(), api_key.to_string());
    params.insert(SPOT_TIME_PARAM.to_string(), timestamp.to_string());

    let sign = spot_signature(&params, secret_key);
    params.insert(SPOT_SIGN_PARAM.to_string(), sign);
    params
}

/// Message signed by the futures scheme: `timestamp || method || path[?query]`.
pub fn futures_sign_message(method: &str, path: &str, query_string: &str, timestamp: u64) -> String {
    if query_string.is_empty() {
        format!("{}{}{}", timestamp, method, path)
    } else {
        format!("{}{}{}?{}", timestamp, method, path, query_string)
    }
}

/// Lower-case hex HMAC-SHA256 over [`futures_sign_message`] (64 characters).
///
/// The timestamp is an argument, so the same inputs always give the same
/// signature.
pub fn sign_futures(
    method: &str,
    path: &str,
    query_string: &str,
    timestamp: u64,
    secret_key: &str,
) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;

    mac.update(futures_sign_message(method, path, query_string, timestamp).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

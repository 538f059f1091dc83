//! Password hashing with scrypt (N=16384, r=16, p=1, dkLen=64).
//! Output format: "hex(salt):hex(key)" with a random 16-byte salt.

use rand::RngCore;
use scrypt::{Params, scrypt};

use crate::app_error::{AppError, AppResult};

pub fn hash_password(password: &str) -> AppResult<String> {
    let mut salt_bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut salt_bytes);
    let salt_hex = hex::encode(salt_bytes);

    let key = derive_key(password, &salt_hex)?;
    Ok(format!("{}:{}", salt_hex, hex::encode(key)))
}

pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let (salt, key_hex) = hash
        .split_once(':')
        .ok_or_else(|| AppError::Internal("Invalid password hash format".into()))?;

    let expected_key = hex::decode(key_hex)
        .map_err(|e| AppError::Internal(format!("Invalid hex in password hash: {e}")))?;

    let derived_key = derive_key(password, salt)?;

    Ok(constant_time_equal(&derived_key, &expected_key))
}

fn derive_key(password: &str, salt: &str) -> AppResult<Vec<u8>> {
    // N=16384 -> log2(N)=14
    let params = Params::new(14, 16, 1, 64)
        .map_err(|e| AppError::Internal(format!("Invalid scrypt params: {e}")))?;

    let mut output = vec![0u8; 64];
    scrypt(password.as_bytes(), salt.as_bytes(), &params, &mut output)
        .map_err(|e| AppError::Internal(format!("scrypt failed: {e}")))?;

    Ok(output)
}

fn constant_time_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

use crate::error::AppError;
use rand::RngCore;

pub fn hash_password(salt: &str, password: &str) -> Result<String, AppError> {
    Ok(bcrypt::hash_with_salt(
        password,
        bcrypt::DEFAULT_COST,
        salt.as_bytes()
            .try_into()
            .map_err(|_| AppError::Others("salt must be 16 bytes".to_string()))?,
    )?
    .to_string())
}

fn gen_random_string(size: usize) -> String {
    let mut rand = rand::rng();
    let mut dest = vec![0; size / 2];

    rand.fill_bytes(&mut dest);
    hex::encode(dest)
}

pub fn gen_salt() -> String {
    gen_random_string(16)
}

/// Constant-time check of a candidate password against a stored bcrypt hash.
pub fn check_password(expected_hash: &str, candidate: &str) -> Result<(), AppError> {
    if bcrypt::verify(candidate, expected_hash)? {
        return Ok(());
    }
    Err(AppError::InvalidCredentials)
}

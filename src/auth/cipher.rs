// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session cookie sealing.
//!
//! The cookie value is `base64url(nonce || ciphertext || tag)` under
//! AES-256-GCM. The key is derived from `ENCRYPTION_SECRET_KEY`; a binding
//! value derived from `ENCRYPTION_IV` is authenticated as associated data.
//! Both derivations run once, when the [`SessionCipher`] is built at startup.
//!
//! Every seal draws a fresh random nonce, so sealing the same phone number
//! twice yields two different cookie values.

use std::num::NonZeroU32;

use base64ct::{Base64UrlUnpadded, Encoding};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use crate::config::SessionSecrets;
use crate::models::PhoneNumber;

/// Fixed salt for both derivations.
const KDF_SALT: &[u8] = b"card-portal/session-cookie/v1";

const KDF_ITERATIONS: u32 = 100_000;

const KEY_LEN: usize = 32;
const BINDING_LEN: usize = 16;
const TAG_LEN: usize = 16;

/// Errors raised while sealing or opening a session cookie.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("cookie value is not valid base64url")]
    Encoding,

    #[error("cookie value is too short")]
    Truncated,

    #[error("cookie failed authentication")]
    Authentication,

    #[error("cookie plaintext is not a phone number")]
    InvalidPlaintext,

    #[error("random number generator failure")]
    Random,

    #[error("session key could not be constructed")]
    Key,
}

/// Immutable cookie cipher derived from the configured secrets.
pub struct SessionCipher {
    key: LessSafeKey,
    binding: [u8; BINDING_LEN],
    rng: SystemRandom,
}

impl std::fmt::Debug for SessionCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCipher").finish_non_exhaustive()
    }
}

impl SessionCipher {
    /// Derive key and binding value from the two configured secrets.
    pub fn derive(secrets: &SessionSecrets) -> Result<Self, CipherError> {
        let mut key_bytes = [0u8; KEY_LEN];
        derive_into(secrets.secret_key.as_bytes(), &mut key_bytes);

        let mut binding = [0u8; BINDING_LEN];
        derive_into(secrets.iv_secret.as_bytes(), &mut binding);

        let unbound = UnboundKey::new(&AES_256_GCM, &key_bytes).map_err(|_| CipherError::Key)?;

        Ok(Self {
            key: LessSafeKey::new(unbound),
            binding,
            rng: SystemRandom::new(),
        })
    }

    /// Seal a phone number into a cookie value.
    pub fn seal(&self, phone: &PhoneNumber) -> Result<String, CipherError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CipherError::Random)?;

        let mut in_out = phone.as_str().as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::from(&self.binding),
                &mut in_out,
            )
            .map_err(|_| CipherError::Authentication)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);

        Ok(Base64UrlUnpadded::encode_string(&sealed))
    }

    /// Open a cookie value back into the phone number it carries.
    pub fn open(&self, value: &str) -> Result<PhoneNumber, CipherError> {
        let sealed =
            Base64UrlUnpadded::decode_vec(value.trim()).map_err(|_| CipherError::Encoding)?;

        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::Truncated);
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| CipherError::Truncated)?;

        let mut in_out = ciphertext.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::from(&self.binding), &mut in_out)
            .map_err(|_| CipherError::Authentication)?;

        let text = std::str::from_utf8(plaintext).map_err(|_| CipherError::InvalidPlaintext)?;
        PhoneNumber::parse(text).ok_or(CipherError::InvalidPlaintext)
    }
}

fn derive_into(secret: &[u8], out: &mut [u8]) {
    let iterations = NonZeroU32::new(KDF_ITERATIONS).unwrap_or(NonZeroU32::MIN);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        KDF_SALT,
        secret,
        out,
    );
}

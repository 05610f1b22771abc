//! Credential adapters: token signing, password hashing, one-time code
//! delivery and external identity verification.

mod bcrypt_hasher;
mod introspection;
mod jwt_codec;
mod otp_senders;

pub use bcrypt_hasher::BcryptPasswordHasher;
pub use introspection::{IntrospectionClient, IntrospectionIdentityProvider};
pub use jwt_codec::JwtTokenCodec;
pub use otp_senders::{FIXED_OTP, FixedOtpSender, RandomOtpSender};

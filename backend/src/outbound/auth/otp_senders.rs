//! Development one-time code senders. Neither contacts a carrier.

use async_trait::async_trait;
use rand::Rng;
use tracing::info;

use crate::domain::ports::{DeliveredOtp, OtpDeliveryError, OtpSender};
use crate::domain::{MobileNumber, OtpCode};

/// Code issued by [`FixedOtpSender`].
pub const FIXED_OTP: &str = "123456";

/// Always issues [`FIXED_OTP`] and reveals it in the response hint.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedOtpSender;

#[async_trait]
impl OtpSender for FixedOtpSender {
    async fn send(&self, mobile: &MobileNumber) -> Result<DeliveredOtp, OtpDeliveryError> {
        let code = OtpCode::parse(FIXED_OTP)
            .map_err(|err| OtpDeliveryError::delivery(err.to_string()))?;
        info!(mobile = %mobile, otp = FIXED_OTP, "mock otp issued");
        Ok(DeliveredOtp {
            code,
            hint: Some(format!("For testing, use OTP: {FIXED_OTP}")),
        })
    }
}

/// Issues a random six-digit code without a hint.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOtpSender;

#[async_trait]
impl OtpSender for RandomOtpSender {
    async fn send(&self, mobile: &MobileNumber) -> Result<DeliveredOtp, OtpDeliveryError> {
        let digits = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
        let code =
            OtpCode::parse(&digits).map_err(|err| OtpDeliveryError::delivery(err.to_string()))?;
        info!(mobile = %mobile, "otp issued");
        Ok(DeliveredOtp { code, hint: None })
    }
}

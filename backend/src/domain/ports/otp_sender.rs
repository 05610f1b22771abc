//! Port for generating and delivering one-time login codes.

use async_trait::async_trait;

use crate::domain::{MobileNumber, OtpCode};

use super::define_port_error;

define_port_error! {
    /// Failures raised by OTP delivery adapters.
    pub enum OtpDeliveryError {
        /// The code could not be generated or handed to the carrier.
        Delivery { message: String } => "otp delivery failed: {message}",
    }
}

/// A code handed to the citizen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredOtp {
    /// The code to store a digest of.
    pub code: OtpCode,
    /// Text echoed to the client, used only by development adapters.
    pub hint: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpSender: Send + Sync {
    /// Generate a code for `mobile` and deliver it.
    async fn send(&self, mobile: &MobileNumber) -> Result<DeliveredOtp, OtpDeliveryError>;
}

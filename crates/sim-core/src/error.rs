//! Validation failures reported at order admission.

/// Why an order was refused at admission.
///
/// Rejections are reported through the notifier and the admission
/// outcome; they are never panics. The messages are the human-readable
/// reasons recorded in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// Order quantity was zero.
    #[error("order quantity must be positive")]
    ZeroQuantity,

    /// Limit or stop-limit order with a zero limit price.
    #[error("limit price must be positive")]
    ZeroLimitPrice,

    /// Stop or stop-limit order with a zero stop price.
    #[error("stop price must be positive")]
    ZeroStopPrice,

    /// Sell stop-limit whose stop price is below its limit price; it
    /// could never arm into a valid sell.
    #[error("sell stop-limit with stop price below limit price")]
    StopBelowLimit,

    /// Buy stop-limit whose stop price is above its limit price.
    #[error("buy stop-limit with stop price above limit price")]
    StopAboveLimit,
}

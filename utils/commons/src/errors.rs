use super::*;

/// The custom errors the auction contracts can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Sender is not allowed to perform this operation (Error code: -4).
    Unauthorized,
    /// No auction instance exists under this identifier (Error code: -5).
    UnknownAuction,
    /// Operation attempted outside its valid lifecycle state (Error code: -6).
    InvalidAuctionState,
    /// The bidding window has not ended yet (Error code: -7).
    AuctionStillActive,
    /// The bidding window is not open (Error code: -8).
    BiddingClosed,
    /// Bid does not strictly exceed the current threshold (Error code: -9).
    BidTooLow,
    /// No bid asset has been configured for this auction (Error code: -10).
    BidAssetNotSet,
    /// The supplied asset is not the configured bid asset (Error code: -11).
    BidAssetMismatch,
    /// The supplied asset is not escrowed by this auction (Error code: -12).
    LotMismatch,
    /// Bidding window bounds are inconsistent (Error code: -13).
    InvalidBiddingWindow,
    /// Payment does not cover the auction creation fees (Error code: -14).
    InsufficientFee,
    /// Withdrawal exceeds the available balance (Error code: -15).
    InsufficientBalance,
    /// Only account addresses can perform this action (Error code: -16).
    OnlyAccountAddress,
    /// This function must only be called by a contract (Error code: -17).
    ContractOnly,
    /// Amount must be non-zero (Error code: -18).
    ZeroAmount,
    /// Failed to invoke a contract (Error code: -19).
    InvokeContractError,
    /// Failed to invoke a transfer (Error code: -20).
    InvokeTransferError,
    /// Incompatible contract (Error code: -21).
    Incompatible,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to contract invocations to CustomContractError.
impl<T> From<CallContractError<T>> for CustomContractError {
    fn from(_cce: CallContractError<T>) -> Self {
        Self::InvokeContractError
    }
}

/// Mapping errors related to CCD transfers to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::InvokeTransferError
    }
}

/// Mapping CustomContractError to ContractError.
impl From<CustomContractError> for ContractError {
    fn from(c: CustomContractError) -> Self {
        Cis2Error::Custom(c)
    }
}

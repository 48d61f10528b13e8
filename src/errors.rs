use concordium_std::*;

/// The custom errors the contract can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Token is already listed for sale (Error code: -4).
    ItemAlreadyListed,
    /// Sender is not the token owner or the listing seller (Error code: -5).
    InvalidOwner,
    /// Marketplace is not an approved operator for the token (Error code: -6).
    NotApprovedForMarketplace,
    /// Token is not listed for sale (Error code: -7).
    NotListed,
    /// Listing price must be above zero (Error code: -8).
    PriceMustBeAboveZero,
    /// The attached amount is lower than the listed price (Error code: -9).
    PriceNotMet,
    /// No proceeds to withdraw (Error code: -10).
    NoProceeds,
    /// Token or CCD transfer failed (Error code: -11).
    TransferFailed,
    /// Only account addresses can use the marketplace (Error code: -12).
    OnlyAccountAddress,
    /// Failed to invoke the token contract (Error code: -13).
    InvokeContractError,
    /// Incompatible token contract (Error code: -14).
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
        Self::TransferFailed
    }
}

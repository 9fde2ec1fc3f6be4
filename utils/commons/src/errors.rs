use super::*;

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
    /// Caller is not the current owner of the token (Error code: -4).
    NotOwner,
    /// Listings must have a price above zero (Error code: -5).
    PriceMustBeAboveZero,
    /// Token is already listed for sale (Error code: -6).
    AlreadyListed,
    /// Marketplace is not approved to transfer the token on the owner's
    /// behalf (Error code: -7).
    NotApprovedForMarketplace,
    /// Token is not listed for sale (Error code: -8).
    NotListed,
    /// Attached amount is below the listing price (Error code: -9).
    PriceNotMet,
    /// Caller has no proceeds to withdraw (Error code: -10).
    NoProceeds,
    /// Failed to transfer CCD out of the contract (Error code: -11).
    TransferFailed,
    /// Only account addresses can call this function (Error code: -12).
    OnlyAccountAddress,
    /// Failed to invoke a contract (Error code: -13).
    InvokeContractError,
    /// Incompatible collection contract (Error code: -14).
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

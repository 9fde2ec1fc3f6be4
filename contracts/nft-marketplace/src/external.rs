use commons::{ContractTokenId, Token};
use concordium_std::*;

/// Parameter for the `listItem` entrypoint.
#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct ListParams {
    /// Token to list for sale.
    pub token: Token,
    /// Asking price. Must be above zero.
    pub price: Amount,
}

/// Parameter for the `updateListing` entrypoint.
#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct UpdateListingParams {
    /// Token whose listing is updated.
    pub token: Token,
    /// New asking price. Must be above zero.
    pub new_price: Amount,
}

/// Parameter of the collection contract's `isApproved` query.
#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct ApprovalQueryParams {
    /// Token the approval refers to.
    pub id: ContractTokenId,
    /// Operator whose transfer approval is queried.
    pub operator: Address,
}

use super::*;

/// Contract token ID type.
pub type ContractTokenId = TokenIdVec;

/// NFT identified by the collection contract that minted it and the token ID
/// within that collection. Used as the listing key by the marketplace.
#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq)]
pub struct Token {
    /// NFT collection contract address.
    pub contract: ContractAddress,
    /// Token ID within the collection.
    pub id: ContractTokenId,
}

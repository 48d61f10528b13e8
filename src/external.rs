use concordium_cis1::TokenIdVec;
use concordium_std::*;

/// Identity of a listable token: the token contract together with the token
/// id inside it.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub struct Token {
    /// Token contract address.
    pub contract: ContractAddress,
    /// Token identifier.
    pub id: TokenIdVec,
}

/// Parameter for the `listItem` and `updateListing` entrypoints.
#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct ListParams {
    /// Token to list.
    pub token: Token,
    /// Listing price.
    pub price: Amount,
}

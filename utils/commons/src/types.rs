use super::*;

pub type ContractResult<A> = Result<A, ContractError>;

/// Token identifier type used across the auction contracts.
pub type ContractTokenId = TokenIdVec;

/// Token amount type used across the auction contracts.
pub type ContractTokenAmount = TokenAmountU64;

/// Wrapping the custom errors in a type with CIS2 errors.
pub type ContractError = Cis2Error<CustomContractError>;

/// Identifier of an auction instance record held by the auction house.
pub type AuctionId = u64;

/// A CIS-2 asset position: the token contract together with one of its token ids.
#[derive(Debug, Clone, Serialize, SchemaType, PartialEq, Eq)]
pub struct Token {
    /// Address of the CIS-2 contract managing the token.
    pub contract: ContractAddress,
    /// Token identifier within that contract.
    pub id: ContractTokenId,
}
